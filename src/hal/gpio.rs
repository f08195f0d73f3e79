use core::convert::Infallible;
use core::marker::PhantomData;

use avr_device::atmega128a::PORTA;
use embedded_hal::digital::v2::OutputPin;

/// Push-pull output on bit `P` of port `PORT`.
pub struct Output<PORT, const P: u8> {
    _port: PhantomData<PORT>,
}

macro_rules! impl_output {
    ($PORT:ident, $ddr:ident, $port:ident) => {
        impl<const P: u8> Output<$PORT, P> {
            /// Set the DDR bit and drive the pin low.
            ///
            /// # Safety
            ///
            /// The caller must be the sole user of the pin.
            pub unsafe fn new() -> Self {
                let p = $PORT::ptr();
                (*p).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                (*p).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                Self { _port: PhantomData }
            }
        }

        impl<const P: u8> OutputPin for Output<$PORT, P> {
            type Error = Infallible;

            fn set_low(&mut self) -> Result<(), Self::Error> {
                unsafe { (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P))) };
                Ok(())
            }

            fn set_high(&mut self) -> Result<(), Self::Error> {
                unsafe { (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P))) };
                Ok(())
            }
        }
    };
}

impl_output!(PORTA, ddra, porta);

// BigAVR2 board-specific pin definitions
pub mod board {
    use super::*;

    pub type Led0 = Output<PORTA, 0>;
}
