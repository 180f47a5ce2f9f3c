//! The ARMv4 CPU core: state, the fetch/decode/execute loop, reset, and the
//! persistent-state codec (`spec.md` §3, §4.10, §4.11, §6).

pub mod alu;
pub mod branch;
pub mod bus;
pub mod condition;
pub mod decode;
pub mod exception;
pub mod load_store;
pub mod modes;
pub mod multiply;
pub mod psr;
pub mod psr_transfer;
pub mod registers;
pub mod shifter;

use crate::bitwise;
use crate::cpu::bus::MemoryBus;
use crate::cpu::condition::Condition;
use crate::cpu::exception::{ExceptionKind, Outcome, enter_exception};
use crate::cpu::modes::{BANK_COUNT, Mode};
use crate::cpu::psr::Psr;
use crate::cpu::registers::{PHYSICAL_REGISTER_COUNT, RegisterFile};
use crate::error::StateError;

const SAVE_MAGIC: [u8; 4] = *b"AC4S";
const SAVE_VERSION: u32 = 1;
const SAVE_LAYOUT_LEN: usize = 4 + 4 + PHYSICAL_REGISTER_COUNT * 4 + 4 + BANK_COUNT * 4 + 8;

/// The persistent CPU state plus the scratch counters `spec.md` §3 carries
/// alongside it. Everything else (per-instruction snapshot, execution
/// quota) lives on the stack of [`Cpu::execute`] for the duration of one
/// call, never as a struct field.
#[derive(Debug, Clone)]
pub struct Cpu {
    pub registers: RegisterFile,
    pub cpsr: Psr,
    pub spsr: [Psr; BANK_COUNT],
    pub inst_executed_total: u64,
    pub inst_executed_in_current_call: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Builds a CPU with all state zeroed. This is not a power-on reset —
    /// [`Cpu::hw_reset`] establishes the documented boot CPSR — it's just an
    /// inert starting point for a host that hasn't reset yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: RegisterFile::default(),
            cpsr: Psr::default(),
            spsr: [Psr::default(); BANK_COUNT],
            inst_executed_total: 0,
            inst_executed_in_current_call: 0,
        }
    }

    /// Hardware reset (`spec.md` §4.11): zero all `R`, `CPSR := 0x000000D3`
    /// (SVC, I=1, F=1), clear every SPSR slot and both counters, `PC := 0`.
    pub fn hw_reset(&mut self) {
        self.registers.zero();
        self.cpsr = Psr::from_bits(0x0000_00D3);
        self.spsr = [Psr::default(); BANK_COUNT];
        self.inst_executed_total = 0;
        self.inst_executed_in_current_call = 0;
        tracing::debug!("hardware reset");
    }

    /// Runs instructions until `inst_executed_in_current_call` reaches
    /// `limit`, returning the number of instructions attempted this call
    /// (`spec.md` §4.10 step 7, §6 `cpu_execute`).
    pub fn execute<B: MemoryBus>(&mut self, bus: &mut B, limit: u64) -> u64 {
        self.inst_executed_in_current_call = 0;
        while self.inst_executed_in_current_call < limit {
            self.step(bus);
        }
        self.inst_executed_in_current_call
    }

    fn step<B: MemoryBus>(&mut self, bus: &mut B) {
        let entry_mode = self.cpsr.mode().unwrap_or_else(|| {
            tracing::error!(cpsr = format_args!("{:#010x}", self.cpsr.bits()), "CPSR mode field is invalid; degrading to User for this instruction");
            Mode::User
        });
        let enter_pc = self.registers.pc();

        let inst = bus.fetch_inst_u32(enter_pc);
        let outcome = if bus.take_abort() {
            Outcome::Raise(ExceptionKind::PrefetchAbort)
        } else {
            self.dispatch_one(bus, inst, entry_mode, enter_pc)
        };

        match outcome {
            Outcome::Continue => self.registers.set_pc(enter_pc.wrapping_add(4)),
            Outcome::Branched => {}
            Outcome::Raise(kind) => {
                let return_link = enter_pc.wrapping_add(4);
                enter_exception(self, kind, return_link);
            }
        }

        self.inst_executed_total = self.inst_executed_total.wrapping_add(1);
        self.inst_executed_in_current_call = self.inst_executed_in_current_call.wrapping_add(1);
    }

    fn dispatch_one<B: MemoryBus>(&mut self, bus: &mut B, inst: u32, entry_mode: Mode, enter_pc: u32) -> Outcome {
        let cond_field = bitwise::bits(inst, 31, 28);
        if cond_field == 0b1111 {
            tracing::debug!("cond field is 0b1111 (reserved NV); raising Undefined");
            return Outcome::Raise(ExceptionKind::Undefined);
        }
        if !self.cpsr.can_execute(Condition::from(cond_field)) {
            return Outcome::Continue;
        }
        decode::dispatch(self, bus, inst, entry_mode, enter_pc)
    }

    /// Serializes the persistent subset of CPU state (`spec.md` §6). Scratch
    /// fields are never included; there are none to include since they're
    /// not struct fields in this design.
    #[must_use]
    pub fn save_state(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SAVE_LAYOUT_LEN);
        out.extend_from_slice(&SAVE_MAGIC);
        out.extend_from_slice(&SAVE_VERSION.to_le_bytes());
        for slot in 0..PHYSICAL_REGISTER_COUNT {
            out.extend_from_slice(&self.registers.physical(slot).to_le_bytes());
        }
        out.extend_from_slice(&self.cpsr.bits().to_le_bytes());
        for bank in &self.spsr {
            out.extend_from_slice(&bank.bits().to_le_bytes());
        }
        out.extend_from_slice(&self.inst_executed_total.to_le_bytes());
        out
    }

    /// Restores state written by [`Cpu::save_state`]. Validates magic and
    /// version before touching `self`; on any failure `self` is left
    /// untouched. `inst_executed_in_current_call` is always re-zeroed, since
    /// it's per-call scratch rather than part of the documented layout.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        if bytes.len() < SAVE_LAYOUT_LEN {
            return Err(StateError::Truncated { expected: SAVE_LAYOUT_LEN, actual: bytes.len() });
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != SAVE_MAGIC {
            return Err(StateError::BadMagic(magic));
        }
        let version = read_u32(bytes, 4);
        if version != SAVE_VERSION {
            return Err(StateError::UnsupportedVersion(version));
        }

        let mut cursor = 8;
        let mut registers = RegisterFile::default();
        for slot in 0..PHYSICAL_REGISTER_COUNT {
            registers.set_physical(slot, read_u32(bytes, cursor));
            cursor += 4;
        }
        let cpsr = Psr::from_bits(read_u32(bytes, cursor));
        cursor += 4;
        let mut spsr = [Psr::default(); BANK_COUNT];
        for bank in &mut spsr {
            *bank = Psr::from_bits(read_u32(bytes, cursor));
            cursor += 4;
        }
        let inst_executed_total = read_u64(bytes, cursor);

        self.registers = registers;
        self.cpsr = cpsr;
        self.spsr = spsr;
        self.inst_executed_total = inst_executed_total;
        self.inst_executed_in_current_call = 0;
        Ok(())
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}
