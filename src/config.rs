//! Configuration constants for the ATmega128 sampler firmware

use crate::counter::{Prescaler, OVERFLOW_TICKS};
use crate::error::ConfigError;
use crate::period::PeriodSpec;
use crate::tally::TallyWord;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// USART0 baud divisor for the board clock, checked at compile time.
pub const UART_UBRR: u16 = match ubrr(CPU_FREQ_HZ, UART_BAUD) {
    Some(ubrr) => ubrr,
    None => panic!("UART_BAUD is out of reach of CPU_FREQ_HZ"),
};

/// Tick rate of the sampling timer. 16MHz / 64 = 250kHz, one overflow every 1.024ms.
pub const TIMER_PRESCALER: Prescaler = Prescaler::Div64;

/// Sampling period in microseconds
pub const SAMPLE_PERIOD_US: u32 = 1_500;

/// ADC multiplexer channel sampled by the firmware
pub const SAMPLE_CHANNEL: u8 = 0;

/// Raw reading at or above which the indicator LED is lit
pub const LED_THRESHOLD: u16 = 512;

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Largest value of the 12-bit UBRR register.
const UBRR_MAX: u32 = 0x0FFF;

/// UBRR value for normal-speed asynchronous mode, `None` if `baud` cannot be
/// generated from `cpu_hz`.
pub const fn ubrr(cpu_hz: u32, baud: u32) -> Option<u16> {
    if baud == 0 {
        return None;
    }
    // cpu_hz / 16 / baud == cpu_hz / (16 * baud), without overflowing
    let divider = cpu_hz / 16 / baud;
    if divider == 0 || divider - 1 > UBRR_MAX {
        return None;
    }
    Some((divider - 1) as u16)
}

/// Validated clock setup of the period timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    cpu_hz: u32,
    prescaler: Prescaler,
}

impl TimerConfig {
    pub fn new(cpu_hz: u32, prescaler: Prescaler) -> Result<Self, ConfigError> {
        if cpu_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if prescaler.divisor().is_none() {
            return Err(ConfigError::ClockStopped);
        }
        Ok(Self { cpu_hz, prescaler })
    }

    /// Board defaults from this module.
    pub fn board() -> Result<Self, ConfigError> {
        Self::new(CPU_FREQ_HZ, TIMER_PRESCALER)
    }

    pub fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    pub fn cpu_hz(&self) -> u32 {
        self.cpu_hz
    }

    fn divisor(&self) -> u64 {
        // `new` rejected the stopped clock.
        u64::from(self.prescaler.divisor().unwrap_or(1))
    }

    /// Counter ticks in `micros`, rounded to the nearest tick.
    pub fn ticks_for_us(&self, micros: u32) -> u64 {
        let denom = self.divisor() * MICROS_PER_SECOND;
        (u64::from(micros) * u64::from(self.cpu_hz) + denom / 2) / denom
    }

    /// Length of one counter overflow, rounded to the nearest microsecond.
    pub fn overflow_period_us(&self) -> u64 {
        let cycles = u64::from(OVERFLOW_TICKS) * self.divisor() * MICROS_PER_SECOND;
        let hz = u64::from(self.cpu_hz);
        (cycles + hz / 2) / hz
    }

    /// Derive the overflow/remainder split for a period of `micros`.
    pub fn period_spec<W: TallyWord>(&self, micros: u32) -> Result<PeriodSpec<W>, ConfigError> {
        let ticks = u32::try_from(self.ticks_for_us(micros)).map_err(|_| ConfigError::PeriodTooLong)?;
        PeriodSpec::from_ticks(ticks)
    }
}
