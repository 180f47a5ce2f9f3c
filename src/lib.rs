//! Deterministic ARMv4 instruction-level CPU interpreter core.
//!
//! This crate is the execution engine only: register banking, condition
//! evaluation, the barrel shifter, the data-processing ALU, exception
//! entry, load/store addressing, and the fetch/decode/dispatch loop. Memory
//! is an abstract collaborator (see [`cpu::bus::MemoryBus`]); Thumb,
//! coprocessors, FIQ/IRQ line sampling, and any host CLI are out of scope.

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
pub mod bitwise;

pub mod cpu;
pub mod error;
