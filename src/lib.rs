//! Periodic ADC sampling on an 8-bit overflow timer
//!
//! [`PeriodTimer`] turns a free-running 8-bit counter plus its overflow
//! interrupt into a "has period P elapsed" test with tick precision, for
//! periods spanning any number of counter overflows. [`SampleScheduler`]
//! runs one blocking conversion per elapsed period and hands the reading to
//! a [`SampleSink`].
#![cfg_attr(not(test), no_std)]

pub mod acquire;
pub mod channel;
pub mod config;
pub mod console;
pub mod counter;
pub mod error;
#[cfg(feature = "atmega128")]
pub mod hal;
pub mod period;
pub mod sampler;
pub mod sim;
pub mod sink;
pub mod spin;
pub mod tally;
pub mod timer;

pub use acquire::{Acquire, Blocking, Converter};
pub use channel::{Channel, ChannelSelector};
pub use config::TimerConfig;
pub use console::Console;
pub use counter::{HardwareCounter, Prescaler, OVERFLOW_TICKS};
pub use error::ConfigError;
pub use period::PeriodSpec;
pub use sampler::{SampleScheduler, SchedulerState};
pub use sink::{ConsoleSink, SampleEvent, SampleSink, Tee, ThresholdLed};
pub use tally::{OverflowTally, TallyWord};
pub use timer::PeriodTimer;
