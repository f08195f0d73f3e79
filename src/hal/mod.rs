//! ATmega128 peripherals used by the sampler firmware
//!
//! Register access goes through the `avr-device` peripheral blocks, so the
//! drivers only exist on AVR targets. The timer clock-select and interrupt
//! bit encodings do not touch hardware and are tested on the host.

#[cfg(target_arch = "avr")]
pub mod adc;
#[cfg(target_arch = "avr")]
pub mod gpio;
pub mod timer;
#[cfg(target_arch = "avr")]
pub mod uart;

// Re-export commonly used types
#[cfg(target_arch = "avr")]
pub use adc::Adc;
#[cfg(target_arch = "avr")]
pub use gpio::{board, Output};
#[cfg(target_arch = "avr")]
pub use timer::Tc8Counter;
pub use timer::{OverflowSource, Timer0, Timer2};
#[cfg(target_arch = "avr")]
pub use uart::Usart0;
