//! Host-facing error surface.
//!
//! Architectural faults (undefined instruction, data/prefetch abort, SWI)
//! are never represented here — they are [`crate::cpu::exception::Outcome`]
//! values produced by executors and consumed by the dispatch loop. This
//! module only covers the two host-level failure rows from `spec.md` §7:
//! a malformed save blob, and a core-internal invariant violation.

use thiserror::Error;

/// Failure surface for [`crate::cpu::Cpu::load_state`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// The blob's magic bytes didn't match `b"AC4S"`.
    #[error("save state has wrong magic bytes: {0:?}")]
    BadMagic([u8; 4]),
    /// The blob's version field isn't one this crate knows how to read.
    #[error("save state has unsupported version {0}")]
    UnsupportedVersion(u32),
    /// The blob was truncated before all documented fields could be read.
    #[error("save state is truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}
