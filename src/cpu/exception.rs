//! Exception entry as a value, not a routine (`spec.md` §4.9, Design Notes).
//!
//! Executors never call into exception entry directly. Instead every
//! executor returns an [`Outcome`]; the dispatch loop in
//! [`crate::cpu::decode`] is the only call site for [`enter_exception`]. This
//! keeps the bank-switch/SPSR-save/CPSR-rewrite sequence in one place and
//! makes executors trivially testable without a full CPU fixture.

use serde::{Deserialize, Serialize};

use crate::cpu::Cpu;
use crate::cpu::modes::Mode;

/// What an executor did, from the dispatch loop's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The executor ran normally; the dispatch loop should advance PC to
    /// `enter_real_PC + 4` unless the executor already wrote R15 itself
    /// (tracked separately — see [`Outcome::Branched`]).
    Continue,
    /// The executor already wrote the program counter (branch, BX,
    /// data-processing with `Rd=R15`); the dispatch loop must not
    /// post-increment PC.
    Branched,
    /// The instruction raised an architectural exception; the dispatch loop
    /// must run exception entry for `kind` before continuing.
    Raise(ExceptionKind),
}

/// The four architectural faults this core can raise on its own (`spec.md`
/// §7). IRQ/FIQ line sampling is out of scope (`spec.md` §1), so those
/// vectors are never reached through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExceptionKind {
    Undefined,
    SoftwareInterrupt,
    PrefetchAbort,
    DataAbort,
}

impl ExceptionKind {
    #[must_use]
    pub const fn target_mode(self) -> Mode {
        match self {
            Self::Undefined => Mode::Undefined,
            Self::SoftwareInterrupt => Mode::Supervisor,
            Self::PrefetchAbort | Self::DataAbort => Mode::Abort,
        }
    }

    /// Exception vector address (`spec.md` §4.9).
    #[must_use]
    pub const fn vector(self) -> u32 {
        match self {
            Self::Undefined => 0x0000_0004,
            Self::SoftwareInterrupt => 0x0000_0008,
            Self::PrefetchAbort => 0x0000_000C,
            Self::DataAbort => 0x0000_0010,
        }
    }
}

/// Runs exception entry for `kind`, per `spec.md` §4.9:
///
/// 1. `target_mode` is never USR/SYS by construction (enforced by the enum
///    above); this is asserted defensively as the host-level invariant
///    violation named in `spec.md` §7.
/// 2. `R14_target := return_link`.
/// 3. `SPSR_target := CPSR` (captured *before* the mode bits are rewritten).
/// 4. `CPSR`'s low byte becomes `target_mode | I=1 | F=(1 if target is FIQ
///    else 0)`; bits `[31:8]` (NZCV and the reserved field) are preserved
///    verbatim.
/// 5. `PC := vector`.
pub fn enter_exception(cpu: &mut Cpu, kind: ExceptionKind, return_link: u32) {
    let target_mode = kind.target_mode();
    assert!(
        !matches!(target_mode, Mode::User | Mode::System),
        "invariant violation: exception target mode must never be USR/SYS"
    );

    tracing::debug!(
        ?kind,
        return_link = format_args!("{return_link:#010x}"),
        vector = format_args!("{:#010x}", kind.vector()),
        "entering exception"
    );

    cpu.registers.write(target_mode, 14, return_link);

    let old_cpsr = cpu.cpsr;
    let spsr_slot = crate::cpu::modes::spsr_index(target_mode)
        .expect("every exception target mode has an SPSR bank");
    cpu.spsr[spsr_slot] = old_cpsr;

    let mut new_cpsr = old_cpsr;
    new_cpsr.set_mode(target_mode);
    new_cpsr.set_irq_disable(true);
    new_cpsr.set_fiq_disable(matches!(target_mode, Mode::Fiq));
    cpu.cpsr = new_cpsr;

    cpu.registers.set_pc(kind.vector());
}
