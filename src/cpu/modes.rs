//! Processor modes and the register-banking lookup tables.
//!
//! The architectural register `R_mode[i]` is resolved through two small
//! constant tables rather than per-mode struct fields or back-pointers:
//! `mode -> bank_id`, then `(bank_id, i) -> physical_index` into the flat
//! 31-slot register file. See [`crate::cpu::registers`] for the store this
//! feeds.

use serde::{Deserialize, Serialize};

/// A processor mode, encoded as the low 5 bits of CPSR/SPSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    User = 0x10,
    Fiq = 0x11,
    Irq = 0x12,
    Supervisor = 0x13,
    Abort = 0x17,
    Undefined = 0x1B,
    System = 0x1F,
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> Self {
        mode as u32
    }
}

impl TryFrom<u32> for Mode {
    type Error = u32;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits & 0b1_1111 {
            0x10 => Ok(Self::User),
            0x11 => Ok(Self::Fiq),
            0x12 => Ok(Self::Irq),
            0x13 => Ok(Self::Supervisor),
            0x17 => Ok(Self::Abort),
            0x1B => Ok(Self::Undefined),
            0x1F => Ok(Self::System),
            other => Err(other),
        }
    }
}

/// Number of register banks: user/system, svc, abt, und, irq, fiq.
pub const BANK_COUNT: usize = 6;

const BANK_USR_SYS: usize = 0;
const BANK_SVC: usize = 1;
const BANK_ABT: usize = 2;
const BANK_UND: usize = 3;
const BANK_IRQ: usize = 4;
const BANK_FIQ: usize = 5;

/// Maps a mode to its register bank id.
#[must_use]
pub const fn bank_of(mode: Mode) -> usize {
    match mode {
        Mode::User | Mode::System => BANK_USR_SYS,
        Mode::Supervisor => BANK_SVC,
        Mode::Abort => BANK_ABT,
        Mode::Undefined => BANK_UND,
        Mode::Irq => BANK_IRQ,
        Mode::Fiq => BANK_FIQ,
    }
}

/// `(bank_id, register_index)` -> physical slot in `R[0..31]`.
///
/// Matches the banking table from `spec.md` §3: FIQ shares only r0-r7 and
/// r15 with user; SVC/ABT/UND/IRQ share r0-r12 and r15 with user.
const PHYSICAL_INDEX: [[u8; 16]; BANK_COUNT] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15], // user/sys
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 16, 17, 15], // svc
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 18, 19, 15], // abt
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 20, 21, 15], // und
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 22, 23, 15], // irq
    [0, 1, 2, 3, 4, 5, 6, 7, 24, 25, 26, 27, 28, 29, 30, 15], // fiq
];

/// Resolves `R_mode[i]` to its physical slot in the flat register file.
#[must_use]
pub const fn physical_index(mode: Mode, i: u8) -> usize {
    PHYSICAL_INDEX[bank_of(mode)][i as usize] as usize
}

/// Resolves a mode's SPSR bank slot. `None` for USR/SYS, which have no
/// SPSR. See `DESIGN.md` for why slot 0 is the only reserved index (an
/// Open Question resolution against `spec.md`'s Data Model section).
#[must_use]
pub const fn spsr_index(mode: Mode) -> Option<usize> {
    match mode {
        Mode::User | Mode::System => None,
        _ => Some(bank_of(mode)),
    }
}
