//! Program status register: NZCV flags, I/F disable bits, and mode field.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::condition::Condition;
use crate::cpu::modes::Mode;

/// A CPSR or SPSR value. Bits `[27:8]` are architecturally defined but
/// opaque to this core: they are preserved verbatim outside explicit field
/// writes, per `spec.md` §3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn sign_flag(self) -> bool {
        self.0 & (1 << 31) != 0
    }

    #[must_use]
    pub const fn zero_flag(self) -> bool {
        self.0 & (1 << 30) != 0
    }

    #[must_use]
    pub const fn carry_flag(self) -> bool {
        self.0 & (1 << 29) != 0
    }

    #[must_use]
    pub const fn overflow_flag(self) -> bool {
        self.0 & (1 << 28) != 0
    }

    pub fn set_sign_flag(&mut self, on: bool) {
        self.0 = self.0.set_bit(31, on);
    }

    pub fn set_zero_flag(&mut self, on: bool) {
        self.0 = self.0.set_bit(30, on);
    }

    pub fn set_carry_flag(&mut self, on: bool) {
        self.0 = self.0.set_bit(29, on);
    }

    pub fn set_overflow_flag(&mut self, on: bool) {
        self.0 = self.0.set_bit(28, on);
    }

    /// Sets N and Z from `result`, leaving C and V untouched. Used by the
    /// multiply family, which never updates C/V (`spec.md` §4.6).
    pub fn set_nz_from(&mut self, result: u32) {
        self.set_sign_flag(result.get_bit(31));
        self.set_zero_flag(result == 0);
    }

    #[must_use]
    pub const fn irq_disable(self) -> bool {
        self.0 & (1 << 7) != 0
    }

    #[must_use]
    pub const fn fiq_disable(self) -> bool {
        self.0 & (1 << 6) != 0
    }

    pub fn set_irq_disable(&mut self, on: bool) {
        self.0 = self.0.set_bit(7, on);
    }

    pub fn set_fiq_disable(&mut self, on: bool) {
        self.0 = self.0.set_bit(6, on);
    }

    /// Mode bits `[4:0]`. Falls back to `None` rather than panicking: the
    /// reference core treats BIOS-written zero/invalid mode fields as a
    /// degraded-but-non-fatal condition (`tracing::debug!` and carry on).
    #[must_use]
    pub fn mode(self) -> Option<Mode> {
        Mode::try_from(self.0 & 0b1_1111).ok()
    }

    /// Replaces the mode bits without validating them, mirroring the
    /// reference core's `set_mode_raw`: BIOS code sometimes writes `0` into
    /// an SPSR, and the core must not panic on that.
    pub fn set_mode_raw(&mut self, bits: u32) {
        self.0 = (self.0 & !0b1_1111) | (bits & 0b1_1111);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.set_mode_raw(mode.into());
    }

    /// Evaluates a 4-bit condition field against this PSR's NZCV flags.
    /// `0b1111` (NV) is handled one level up by the dispatcher (`spec.md`
    /// §4.10 step 3), not here; `AL` always returns true.
    #[must_use]
    pub fn can_execute(self, condition: Condition) -> bool {
        let (n, z, c, v) = (self.sign_flag(), self.zero_flag(), self.carry_flag(), self.overflow_flag());
        match condition {
            Condition::Eq => z,
            Condition::Ne => !z,
            Condition::Cs => c,
            Condition::Cc => !c,
            Condition::Mi => n,
            Condition::Pl => !n,
            Condition::Vs => v,
            Condition::Vc => !v,
            Condition::Hi => c && !z,
            Condition::Ls => !c || z,
            Condition::Ge => n == v,
            Condition::Lt => n != v,
            Condition::Gt => !z && (n == v),
            Condition::Le => z || (n != v),
            Condition::Al => true,
            Condition::Nv => false,
        }
    }
}

impl From<Mode> for Psr {
    fn from(mode: Mode) -> Self {
        let mut psr = Self(0);
        psr.set_mode(mode);
        psr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_round_trip() {
        let mut psr = Psr::default();
        psr.set_sign_flag(true);
        psr.set_zero_flag(true);
        psr.set_carry_flag(true);
        psr.set_overflow_flag(true);
        assert!(psr.sign_flag() && psr.zero_flag() && psr.carry_flag() && psr.overflow_flag());
        assert_eq!(psr.bits() >> 28, 0b1111);
    }

    #[test]
    fn mode_round_trips() {
        let mut psr = Psr::default();
        psr.set_mode(Mode::Supervisor);
        assert_eq!(psr.mode(), Some(Mode::Supervisor));
    }

    #[test]
    fn invalid_mode_bits_degrade_to_none_not_panic() {
        let psr = Psr::from_bits(0);
        assert_eq!(psr.mode(), None);
    }

    #[test]
    fn condition_eq_matches_zero_flag() {
        let mut psr = Psr::default();
        assert!(!psr.can_execute(Condition::Eq));
        psr.set_zero_flag(true);
        assert!(psr.can_execute(Condition::Eq));
    }

    #[test]
    fn condition_al_always_true_nv_always_false() {
        let psr = Psr::default();
        assert!(psr.can_execute(Condition::Al));
        assert!(!psr.can_execute(Condition::Nv));
    }

    #[test]
    fn condition_ge_lt_gt_le_signed_comparisons() {
        let mut psr = Psr::default();
        psr.set_sign_flag(true);
        psr.set_overflow_flag(true);
        assert!(psr.can_execute(Condition::Ge));
        assert!(!psr.can_execute(Condition::Lt));

        psr.set_overflow_flag(false);
        assert!(!psr.can_execute(Condition::Ge));
        assert!(psr.can_execute(Condition::Lt));
    }
}
