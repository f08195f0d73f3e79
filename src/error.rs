//! Configuration errors
//!
//! The sampling core itself has no runtime failure path: register writes
//! cannot fail and a stuck conversion hangs. Only deriving a period from
//! board parameters can be rejected.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum ConfigError {
    /// The prescaler selects no clock source, the counter would never tick.
    ClockStopped,
    /// A zero CPU clock was given.
    ZeroClock,
    /// The period needs more overflow cycles than the tally can hold.
    PeriodTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ClockStopped => f.write_str("timer clock is stopped"),
            ConfigError::ZeroClock => f.write_str("cpu clock is zero"),
            ConfigError::PeriodTooLong => f.write_str("period exceeds overflow tally range"),
        }
    }
}
