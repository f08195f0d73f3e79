//! Busy-wait primitive
//!
//! The polling loop has no blocking primitive to lean on: it spins on a
//! predicate that re-reads hardware state on every call.

/// Spin until `ready` returns true.
#[inline]
pub fn spin_until(mut ready: impl FnMut() -> bool) {
    while !ready() {
        core::hint::spin_loop();
    }
}
