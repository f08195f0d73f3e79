//! Overflow tally shared between the overflow interrupt and the main loop
//!
//! The tally is written only by the overflow handler ([`OverflowTally::on_overflow`])
//! and read or reset by [`PeriodTimer`](crate::timer::PeriodTimer). Every access
//! is volatile so the polling loop always re-fetches the live value.
//!
//! A tally wider than one machine access can be torn by an overflow landing
//! between the byte reads. Such tallies are therefore only read or reset
//! while the overflow interrupt is masked; single-byte tallies are read
//! directly. See [`TallyWord::SINGLE_ACCESS`].
//!
//! The tally saturates at its maximum instead of wrapping, so a consumer that
//! polls late still sees its period as elapsed until it resets.

use core::cell::UnsafeCell;
use core::ptr;

mod sealed {
    pub trait Sealed {}
}

/// Integer types usable as an overflow tally.
pub trait TallyWord: sealed::Sealed + Copy + Ord + Default {
    /// Whether the target reads and writes the word in a single access.
    /// The target is an 8-bit machine, so only `u8` qualifies.
    const SINGLE_ACCESS: bool;

    fn saturating_inc(self) -> Self;

    fn try_from_u32(value: u32) -> Option<Self>;

    fn into_u32(self) -> u32;
}

macro_rules! tally_word {
    ($ty:ty) => {
        impl sealed::Sealed for $ty {}

        impl TallyWord for $ty {
            const SINGLE_ACCESS: bool = core::mem::size_of::<$ty>() == 1;

            #[inline]
            fn saturating_inc(self) -> Self {
                self.saturating_add(1)
            }

            #[inline]
            fn try_from_u32(value: u32) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn into_u32(self) -> u32 {
                u32::from(self)
            }
        }
    };
}

tally_word!(u8);
tally_word!(u16);
tally_word!(u32);

/// Process-wide count of counter overflows.
///
/// Meant to live in a `static` so the interrupt vector can reach it:
///
/// ```ignore
/// static TALLY: OverflowTally<u16> = OverflowTally::new(0);
///
/// #[avr_device::interrupt(atmega128a)]
/// fn TIMER0_OVF() {
///     // SAFETY: the overflow vector of the counter driving `TALLY`.
///     unsafe { TALLY.on_overflow() }
/// }
/// ```
pub struct OverflowTally<W: TallyWord> {
    value: UnsafeCell<W>,
}

// SAFETY: the only writer outside a masked section is `on_overflow`, whose
// callers promise to be the one overflow vector of a single-core target.
// Readers of multi-access words mask that interrupt first (`PeriodTimer`),
// single-access words cannot tear.
unsafe impl<W: TallyWord + Send> Sync for OverflowTally<W> {}

impl<W: TallyWord> OverflowTally<W> {
    pub const fn new(initial: W) -> Self {
        Self {
            value: UnsafeCell::new(initial),
        }
    }

    /// Overflow interrupt handler body. Increments the tally by exactly one,
    /// stopping at `W::MAX`, and does nothing else.
    ///
    /// # Safety
    ///
    /// Only call this from the overflow interrupt of the counter handed to
    /// the [`PeriodTimer`](crate::timer::PeriodTimer) reading this tally, or
    /// from code that stands in for it on the same thread. No other context
    /// may call it concurrently.
    #[inline]
    pub unsafe fn on_overflow(&self) {
        let p = self.value.get();
        ptr::write_volatile(p, ptr::read_volatile(p).saturating_inc())
    }

    /// Volatile read. Caller holds the overflow interrupt masked unless
    /// `W::SINGLE_ACCESS`.
    #[inline]
    pub(crate) fn load(&self) -> W {
        // SAFETY: see the masking contract above.
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    /// Volatile store of zero. Caller holds the overflow interrupt masked.
    #[inline]
    pub(crate) fn clear(&self) {
        // SAFETY: see the masking contract above.
        unsafe { ptr::write_volatile(self.value.get(), W::default()) }
    }
}

impl<W: TallyWord> Default for OverflowTally<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}
