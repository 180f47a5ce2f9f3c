//! Row discrimination per DDI 0100I Figure A3-1 (`spec.md` §4.10 step 5).
//!
//! This module resolves one fetched 32-bit word, after condition checking,
//! into a call to exactly one executor from [`crate::cpu::alu`],
//! [`crate::cpu::branch`], [`crate::cpu::multiply`], [`crate::cpu::psr_transfer`],
//! or [`crate::cpu::load_store`]. The priority order below follows the
//! reference decoder's own disambiguation order: patterns that are subsets
//! of a wider field (BX inside the `000` group, SWP inside the multiply
//! group, halfword transfer inside the same group again) are tested before
//! the wider fallback they'd otherwise be swallowed by.

use crate::bitwise::Bits;
use crate::cpu::Cpu;
use crate::cpu::alu::{self, AluOp};
use crate::cpu::branch;
use crate::cpu::bus::MemoryBus;
use crate::cpu::exception::Outcome;
use crate::cpu::load_store::{self, HalfwordKind, TransferSize};
use crate::cpu::modes::Mode;
use crate::cpu::multiply;
use crate::cpu::psr_transfer::{self, PsrSelector};
use crate::cpu::shifter::{self, ShiftKind};

fn field(inst: u32, hi: u32, lo: u32) -> u32 {
    inst.get_bits(lo..=hi)
}

/// Resolves a data-processing/addressing-mode operand 2 in register form
/// with an immediate shift amount (`spec.md` §4.3 Form A). `Rm = R15` reads
/// as `PC + 8` here, per spec; this is the one register read in the whole
/// decoder that gets the pipelining bump.
fn form_a(cpu: &Cpu, mode: Mode, inst: u32, carry_in: bool) -> (u32, bool) {
    let rm_idx = field(inst, 3, 0) as u8;
    let rm = if rm_idx == 15 {
        cpu.registers.read(mode, 15).wrapping_add(8)
    } else {
        cpu.registers.read(mode, rm_idx)
    };
    let kind = ShiftKind::from(field(inst, 6, 5));
    let amount = field(inst, 11, 7);
    shifter::immediate_shift(kind, amount, rm, carry_in)
}

fn form_b(cpu: &Cpu, mode: Mode, inst: u32, carry_in: bool) -> (u32, bool) {
    let rm = cpu.registers.read(mode, field(inst, 3, 0) as u8);
    let rs_idx = field(inst, 11, 8) as u8;
    let amount = cpu.registers.read(mode, rs_idx) & 0xFF;
    let kind = ShiftKind::from(field(inst, 6, 5));
    shifter::register_shift(kind, amount, rm, carry_in)
}

fn form_c(inst: u32, carry_in: bool) -> (u32, bool) {
    let rot = field(inst, 11, 8);
    let imm8 = field(inst, 7, 0);
    shifter::rotated_immediate(rot, imm8, carry_in)
}

fn data_processing_op2(cpu: &Cpu, mode: Mode, inst: u32, carry_in: bool) -> (u32, bool) {
    if inst.get_bit(25) {
        form_c(inst, carry_in)
    } else if inst.get_bit(4) {
        form_b(cpu, mode, inst, carry_in)
    } else {
        form_a(cpu, mode, inst, carry_in)
    }
}

fn is_bx(inst: u32) -> bool {
    inst & 0x0FFF_FFF0 == 0x012F_FF10
}

fn is_swap(inst: u32) -> bool {
    field(inst, 27, 23) == 0b00010 && field(inst, 21, 20) == 0b00 && field(inst, 11, 4) == 0b0000_1001
}

fn is_multiply_long(inst: u32) -> bool {
    field(inst, 27, 23) == 0b00001 && field(inst, 7, 4) == 0b1001
}

fn is_multiply(inst: u32) -> bool {
    field(inst, 27, 22) == 0b000000 && field(inst, 7, 4) == 0b1001
}

fn is_halfword_transfer(inst: u32) -> bool {
    field(inst, 27, 25) == 0b000 && inst.get_bit(7) && inst.get_bit(4) && field(inst, 6, 5) != 0b00
}

fn is_psr_transfer(inst: u32) -> bool {
    field(inst, 27, 26) == 0b00 && !inst.get_bit(20) && matches!(field(inst, 24, 21), 0x8..=0xB)
}

/// Dispatches one already-fetched, already-condition-passed instruction
/// word. `entry_mode` and `enter_pc` are the per-instruction snapshot taken
/// before this call (`spec.md` §3 "per-instruction scratch").
pub fn dispatch<B: MemoryBus>(cpu: &mut Cpu, bus: &mut B, inst: u32, entry_mode: Mode, enter_pc: u32) -> Outcome {
    if is_bx(inst) {
        return branch::branch_and_exchange(cpu, entry_mode, field(inst, 3, 0) as u8);
    }
    if is_swap(inst) {
        let byte = inst.get_bit(22);
        let rn = field(inst, 19, 16) as u8;
        let rd = field(inst, 15, 12) as u8;
        let rm = field(inst, 3, 0) as u8;
        return load_store::swap(cpu, bus, entry_mode, byte, rn, rd, rm);
    }
    if is_multiply_long(inst) {
        let signed = inst.get_bit(22);
        let accumulate = inst.get_bit(21);
        let set_flags = inst.get_bit(20);
        let rd_hi = field(inst, 19, 16) as u8;
        let rd_lo = field(inst, 15, 12) as u8;
        let rs = field(inst, 11, 8) as u8;
        let rm = field(inst, 3, 0) as u8;
        return if signed {
            multiply::smull(cpu, entry_mode, set_flags, accumulate, rd_hi, rd_lo, rs, rm)
        } else {
            multiply::umull(cpu, entry_mode, set_flags, accumulate, rd_hi, rd_lo, rs, rm)
        };
    }
    if is_multiply(inst) {
        let accumulate = inst.get_bit(21);
        let set_flags = inst.get_bit(20);
        let rd = field(inst, 19, 16) as u8;
        let rn = field(inst, 15, 12) as u8;
        let rs = field(inst, 11, 8) as u8;
        let rm = field(inst, 3, 0) as u8;
        return multiply::mul(cpu, entry_mode, set_flags, accumulate, rd, rn, rs, rm);
    }
    if is_halfword_transfer(inst) {
        return dispatch_halfword_transfer(cpu, bus, inst, entry_mode);
    }
    if is_psr_transfer(inst) {
        return dispatch_psr_transfer(cpu, inst, entry_mode);
    }
    if field(inst, 27, 26) == 0b00 {
        return dispatch_data_processing(cpu, inst, entry_mode);
    }
    if field(inst, 27, 25) == 0b011 && inst.get_bit(4) {
        return branch::undefined();
    }
    if field(inst, 27, 26) == 0b01 {
        return dispatch_single_data_transfer(cpu, bus, inst, entry_mode);
    }
    if field(inst, 27, 25) == 0b100 {
        // Block data transfer (LDM/STM): not implemented by this core, per
        // the row-13 resolution in `DESIGN.md`.
        return branch::undefined();
    }
    if field(inst, 27, 25) == 0b101 {
        let is_link = inst.get_bit(24);
        let offset24 = field(inst, 23, 0);
        return branch::branch(cpu, entry_mode, enter_pc, is_link, offset24);
    }
    if field(inst, 27, 25) == 0b110 {
        // Coprocessor data transfer: no coprocessor is implemented.
        return branch::undefined();
    }
    // 27:25 == 111
    if inst.get_bit(24) {
        return branch::software_interrupt();
    }
    // Coprocessor data operation / register transfer: no coprocessor.
    branch::undefined()
}

fn dispatch_data_processing(cpu: &mut Cpu, inst: u32, entry_mode: Mode) -> Outcome {
    let carry_in = cpu.cpsr.carry_flag();
    let (op2, shifter_carry) = data_processing_op2(cpu, entry_mode, inst, carry_in);
    let op = AluOp::from(field(inst, 24, 21));
    let set_flags = inst.get_bit(20);
    let rn_idx = field(inst, 19, 16) as u8;
    let rd = field(inst, 15, 12) as u8;
    let rn_value = cpu.registers.read(entry_mode, rn_idx);
    alu::execute(cpu, entry_mode, op, set_flags, rn_value, rd, op2, shifter_carry)
}

fn dispatch_psr_transfer(cpu: &mut Cpu, inst: u32, entry_mode: Mode) -> Outcome {
    let selector = PsrSelector::from(inst.get_bit(22));
    let is_msr = inst.get_bit(21);
    if is_msr {
        let whole_psr = inst.get_bit(16);
        let carry_in = cpu.cpsr.carry_flag();
        let value = if inst.get_bit(25) {
            form_c(inst, carry_in).0
        } else {
            cpu.registers.read(entry_mode, field(inst, 3, 0) as u8)
        };
        psr_transfer::msr(cpu, entry_mode, selector, whole_psr, value)
    } else {
        let rd = field(inst, 15, 12) as u8;
        psr_transfer::mrs(cpu, entry_mode, selector, rd)
    }
}

fn dispatch_single_data_transfer<B: MemoryBus>(cpu: &mut Cpu, bus: &mut B, inst: u32, entry_mode: Mode) -> Outcome {
    let pre_index = inst.get_bit(24);
    let add = inst.get_bit(23);
    let byte = inst.get_bit(22);
    let write_back_bit = inst.get_bit(21);
    let is_load = inst.get_bit(20);
    let rn = field(inst, 19, 16) as u8;
    let rd = field(inst, 15, 12) as u8;

    let offset = if inst.get_bit(25) {
        let carry_in = cpu.cpsr.carry_flag();
        form_a(cpu, entry_mode, inst, carry_in).0
    } else {
        field(inst, 11, 0)
    };

    let size = if byte { TransferSize::Byte } else { TransferSize::Word };
    load_store::single_data_transfer(cpu, bus, entry_mode, is_load, size, pre_index, add, write_back_bit, rn, rd, offset)
}

fn dispatch_halfword_transfer<B: MemoryBus>(cpu: &mut Cpu, bus: &mut B, inst: u32, entry_mode: Mode) -> Outcome {
    let pre_index = inst.get_bit(24);
    let add = inst.get_bit(23);
    let immediate_offset = inst.get_bit(22);
    let write_back_bit = inst.get_bit(21);
    let is_load = inst.get_bit(20);
    let rn = field(inst, 19, 16) as u8;
    let rd = field(inst, 15, 12) as u8;

    let offset = if immediate_offset {
        (field(inst, 11, 8) << 4) | field(inst, 3, 0)
    } else {
        cpu.registers.read(entry_mode, field(inst, 3, 0) as u8)
    };

    let kind = match field(inst, 6, 5) {
        0b01 => HalfwordKind::UnsignedHalfword,
        0b10 => HalfwordKind::SignedByte,
        _ => HalfwordKind::SignedHalfword,
    };

    load_store::halfword_transfer(cpu, bus, entry_mode, is_load, kind, pre_index, add, write_back_bit, rn, rd, offset)
}
