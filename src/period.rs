//! Period expressed as whole overflow cycles plus a sub-cycle remainder

use crate::counter::OVERFLOW_TICKS;
use crate::error::ConfigError;
use crate::tally::TallyWord;

/// A wait interval of `overflows * 256 + remainder` counter ticks.
///
/// Splitting the wait this way reconstructs periods that are not a
/// multiple of the counter's own overflow period with tick precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodSpec<W: TallyWord = u16> {
    overflows: W,
    remainder: u8,
}

impl<W: TallyWord> PeriodSpec<W> {
    pub const fn new(overflows: W, remainder: u8) -> Self {
        Self { overflows, remainder }
    }

    /// Split a tick count into overflow cycles and remainder.
    pub fn from_ticks(ticks: u32) -> Result<Self, ConfigError> {
        let overflows = W::try_from_u32(ticks / OVERFLOW_TICKS).ok_or(ConfigError::PeriodTooLong)?;
        Ok(Self {
            overflows,
            remainder: (ticks % OVERFLOW_TICKS) as u8,
        })
    }

    /// N
    pub fn overflows(&self) -> W {
        self.overflows
    }

    /// R
    pub fn remainder(&self) -> u8 {
        self.remainder
    }

    pub fn ticks(&self) -> u64 {
        u64::from(self.overflows.into_u32()) * u64::from(OVERFLOW_TICKS) + u64::from(self.remainder)
    }

    /// Whether a `(tally, count)` snapshot has reached this period.
    ///
    /// Ordered on the pair, so a tally that has run past `N` stays elapsed
    /// whatever the live count reads.
    #[inline]
    pub fn reached(&self, overflows: W, count: u8) -> bool {
        overflows > self.overflows || (overflows == self.overflows && count >= self.remainder)
    }
}
