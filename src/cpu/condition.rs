//! Condition codes for ARM conditional execution.
//!
//! Every ARM instruction carries a 4-bit condition field in bits `[31:28]`.
//! Before an instruction is dispatched, its condition is tested against the
//! NZCV flags in the current CPSR (see [`crate::cpu::psr::Psr::can_execute`]);
//! on failure the instruction is skipped entirely, as if it were a NOP.
//!
//! ```text
//! ┌──────┬────────┬──────────────────────┬─────────────────┐
//! │ Code │ Suffix │ Meaning              │ Flags tested     │
//! ├──────┼────────┼──────────────────────┼─────────────────┤
//! │ 0000 │  EQ    │ Equal                │ Z=1              │
//! │ 0001 │  NE    │ Not equal            │ Z=0              │
//! │ 0010 │  CS    │ Carry set            │ C=1              │
//! │ 0011 │  CC    │ Carry clear          │ C=0              │
//! │ 0100 │  MI    │ Minus / negative     │ N=1              │
//! │ 0101 │  PL    │ Plus / non-negative  │ N=0              │
//! │ 0110 │  VS    │ Overflow set         │ V=1              │
//! │ 0111 │  VC    │ Overflow clear       │ V=0              │
//! │ 1000 │  HI    │ Unsigned higher      │ C=1 AND Z=0      │
//! │ 1001 │  LS    │ Unsigned lower/same  │ C=0 OR Z=1       │
//! │ 1010 │  GE    │ Signed >=            │ N=V              │
//! │ 1011 │  LT    │ Signed <             │ N!=V             │
//! │ 1100 │  GT    │ Signed >             │ Z=0 AND N=V      │
//! │ 1101 │  LE    │ Signed <=            │ Z=1 OR N!=V      │
//! │ 1110 │  AL    │ Always               │ (unconditional)  │
//! │ 1111 │  NV    │ Never (reserved)     │ (decodes to UND) │
//! └──────┴────────┴──────────────────────┴─────────────────┘
//! ```
//!
//! `NV` is architecturally reserved. This core never lets it reach
//! [`crate::cpu::psr::Psr::can_execute`]: the decoder raises Undefined for any
//! word with a `0b1111` condition field before a condition is ever read.

use serde::{Deserialize, Serialize};

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Condition {
    Eq = 0x0,
    Ne = 0x1,
    Cs = 0x2,
    Cc = 0x3,
    Mi = 0x4,
    Pl = 0x5,
    Vs = 0x6,
    Vc = 0x7,
    Hi = 0x8,
    Ls = 0x9,
    Ge = 0xA,
    Lt = 0xB,
    Gt = 0xC,
    Le = 0xD,
    Al = 0xE,
    Nv = 0xF,
}

impl From<u32> for Condition {
    /// Decodes the low 4 bits of `bits`. Total over `u32`: every nibble maps
    /// to a condition, including the reserved `Nv`.
    fn from(bits: u32) -> Self {
        match bits & 0b1111 {
            0x0 => Self::Eq,
            0x1 => Self::Ne,
            0x2 => Self::Cs,
            0x3 => Self::Cc,
            0x4 => Self::Mi,
            0x5 => Self::Pl,
            0x6 => Self::Vs,
            0x7 => Self::Vc,
            0x8 => Self::Hi,
            0x9 => Self::Ls,
            0xA => Self::Ge,
            0xB => Self::Lt,
            0xC => Self::Gt,
            0xD => Self::Le,
            0xE => Self::Al,
            _ => Self::Nv,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => f.write_str("EQ"),
            Self::Ne => f.write_str("NE"),
            Self::Cs => f.write_str("CS"),
            Self::Cc => f.write_str("CC"),
            Self::Mi => f.write_str("MI"),
            Self::Pl => f.write_str("PL"),
            Self::Vs => f.write_str("VS"),
            Self::Vc => f.write_str("VC"),
            Self::Hi => f.write_str("HI"),
            Self::Ls => f.write_str("LS"),
            Self::Ge => f.write_str("GE"),
            Self::Lt => f.write_str("LT"),
            Self::Gt => f.write_str("GT"),
            Self::Le => f.write_str("LE"),
            Self::Al => Ok(()),
            Self::Nv => f.write_str("_NEVER"),
        }
    }
}
