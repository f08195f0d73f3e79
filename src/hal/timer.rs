#[cfg(target_arch = "avr")]
use avr_device::atmega128a::{TC0, TC2};
#[cfg(target_arch = "avr")]
use core::marker::PhantomData;

#[cfg(target_arch = "avr")]
use crate::counter::HardwareCounter;
use crate::counter::Prescaler;

/// Clock select field, bits 2:0 of TCCR0/TCCR2.
pub const CS_MASK: u8 = 0x07;

/// One of the two 8-bit timers and the overflow interrupt it raises.
///
/// Counter register, control register, interrupt enable bit and overflow
/// flag all come from the same implementation, so the interrupt that gets
/// enabled is always the one of the counter being read.
pub trait OverflowSource {
    /// Overflow interrupt enable in TIMSK.
    const TOIE: u8;
    /// Overflow flag in TIFR.
    const TOV: u8;
    /// Prescaler reset in SFIOR.
    const PSR: u8;

    /// Clock select bits for `prescaler`, `None` if this timer lacks it.
    fn clock_select(prescaler: Prescaler) -> Option<u8>;

    /// # Safety
    ///
    /// The caller owns this timer.
    #[cfg(target_arch = "avr")]
    unsafe fn modify_control(f: impl FnOnce(u8) -> u8);

    /// # Safety
    ///
    /// The caller owns this timer.
    #[cfg(target_arch = "avr")]
    unsafe fn read_count() -> u8;

    /// # Safety
    ///
    /// The caller owns this timer.
    #[cfg(target_arch = "avr")]
    unsafe fn write_count(value: u8);
}

/// Timer/Counter 0, vector `TIMER0_OVF`.
pub struct Timer0;

/// Timer/Counter 2, vector `TIMER2_OVF`.
pub struct Timer2;

impl OverflowSource for Timer0 {
    const TOIE: u8 = 1 << 0; // TOIE0
    const TOV: u8 = 1 << 0; // TOV0
    const PSR: u8 = 1 << 1; // PSR0

    fn clock_select(prescaler: Prescaler) -> Option<u8> {
        // TC0 can run asynchronously and has the extra /32 and /128 taps
        match prescaler {
            Prescaler::Stop => Some(0),
            Prescaler::Div1 => Some(1),
            Prescaler::Div8 => Some(2),
            Prescaler::Div32 => Some(3),
            Prescaler::Div64 => Some(4),
            Prescaler::Div128 => Some(5),
            Prescaler::Div256 => Some(6),
            Prescaler::Div1024 => Some(7),
        }
    }

    #[cfg(target_arch = "avr")]
    unsafe fn modify_control(f: impl FnOnce(u8) -> u8) {
        (*TC0::ptr()).tccr0.modify(|r, w| w.bits(f(r.bits())));
    }

    #[cfg(target_arch = "avr")]
    unsafe fn read_count() -> u8 {
        (*TC0::ptr()).tcnt0.read().bits()
    }

    #[cfg(target_arch = "avr")]
    unsafe fn write_count(value: u8) {
        (*TC0::ptr()).tcnt0.write(|w| w.bits(value));
    }
}

impl OverflowSource for Timer2 {
    const TOIE: u8 = 1 << 6; // TOIE2
    const TOV: u8 = 1 << 6; // TOV2
    // shared with TC1 and TC3
    const PSR: u8 = 1 << 0; // PSR321

    fn clock_select(prescaler: Prescaler) -> Option<u8> {
        match prescaler {
            Prescaler::Stop => Some(0),
            Prescaler::Div1 => Some(1),
            Prescaler::Div8 => Some(2),
            Prescaler::Div64 => Some(3),
            Prescaler::Div256 => Some(4),
            Prescaler::Div1024 => Some(5),
            Prescaler::Div32 | Prescaler::Div128 => None,
        }
    }

    #[cfg(target_arch = "avr")]
    unsafe fn modify_control(f: impl FnOnce(u8) -> u8) {
        (*TC2::ptr()).tccr2.modify(|r, w| w.bits(f(r.bits())));
    }

    #[cfg(target_arch = "avr")]
    unsafe fn read_count() -> u8 {
        (*TC2::ptr()).tcnt2.read().bits()
    }

    #[cfg(target_arch = "avr")]
    unsafe fn write_count(value: u8) {
        (*TC2::ptr()).tcnt2.write(|w| w.bits(value));
    }
}

/// 8-bit timer in normal mode, counting 0..=255 and overflowing to 0.
///
/// TIMSK, TIFR and SFIOR are shared by all timers and reached through the
/// TC0 block.
#[cfg(target_arch = "avr")]
pub struct Tc8Counter<T> {
    _timer: PhantomData<T>,
}

#[cfg(target_arch = "avr")]
impl<T: OverflowSource> Tc8Counter<T> {
    /// Stop the timer, zero it and put it in normal mode.
    ///
    /// # Safety
    ///
    /// The caller must be the sole user of timer `T`.
    pub unsafe fn new() -> Self {
        T::modify_control(|_| 0);
        T::write_count(0);
        (*TC0::ptr()).timsk.modify(|r, w| w.bits(r.bits() & !T::TOIE));
        Self { _timer: PhantomData }
    }
}

#[cfg(target_arch = "avr")]
impl<T: OverflowSource> HardwareCounter for Tc8Counter<T> {
    fn supports(&self, prescaler: Prescaler) -> bool {
        T::clock_select(prescaler).is_some()
    }

    fn start(&mut self, prescaler: Prescaler) {
        if let Some(cs) = T::clock_select(prescaler) {
            unsafe { T::modify_control(|r| (r & !CS_MASK) | cs) };
        }
    }

    fn count(&self) -> u8 {
        unsafe { T::read_count() }
    }

    fn clear(&mut self) {
        unsafe {
            let tc0 = &*TC0::ptr();
            T::write_count(0);
            // restart the prescaler so the first tick is a full divisor away
            tc0.sfior.modify(|r, w| w.bits(r.bits() | T::PSR));
            // flags clear on writing a one, other flags stay untouched
            tc0.tifr.write(|w| w.bits(T::TOV));
        }
    }

    fn set_overflow_interrupt(&mut self, enabled: bool) {
        unsafe {
            let tc0 = &*TC0::ptr();
            if enabled {
                tc0.timsk.modify(|r, w| w.bits(r.bits() | T::TOIE));
            } else {
                tc0.timsk.modify(|r, w| w.bits(r.bits() & !T::TOIE));
            }
        }
    }
}
