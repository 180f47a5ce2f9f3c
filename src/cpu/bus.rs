//! The memory/MMU collaborator (`spec.md` §1, §6). This core never touches
//! an address space directly: every fetch and data access goes through a
//! host-supplied [`MemoryBus`] implementation, which is also where
//! translation, permissions, caching and the privileged-vs-user distinction
//! for `LDRT`/`STRT` live.

/// Abstract memory/MMU backend. The core calls these methods and inspects
/// `take_abort` immediately after each access; it never retries on its own
/// (`spec.md` §7).
pub trait MemoryBus {
    /// Fetches one 4-byte instruction word at `addr`. On failure the
    /// implementation should record an abort for [`MemoryBus::take_abort`]
    /// and may return any value (the core discards it).
    fn fetch_inst_u32(&mut self, addr: u32) -> u32;

    fn data_read_u32(&mut self, addr: u32) -> u32;
    fn data_read_u8(&mut self, addr: u32) -> u8;
    fn data_write_u32(&mut self, addr: u32, value: u32);
    fn data_write_u8(&mut self, addr: u32, value: u8);

    /// Drains the abort signal the bus set during the most recent access.
    /// Must be take-not-peek: a caller that doesn't call this after every
    /// access must never observe a stale abort from an earlier one.
    fn take_abort(&mut self) -> bool;

    /// Tells the bus whether the *next* access should be evaluated under
    /// user-mode permissions even if the core is currently privileged
    /// (`LDRT`/`STRT`, `spec.md` §4.8 step 4). The core clears this after
    /// the access it was set for.
    fn set_user_mode_access(&mut self, treat_as_user: bool);
}
