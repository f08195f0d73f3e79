use core::convert::Infallible;

use avr_device::atmega128a::ADC;

use crate::acquire::Converter;
use crate::channel::Channel;

const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
/// ADPS2:0, 125kHz @ 16MHz
const ADPS_DIV128: u8 = 0x07;
/// REFS1:0 = 01, AVCC with external cap at AREF
const REFS_AVCC: u8 = 0x40;
const MUX_MASK: u8 = 0x1F;

/// Single-ended 10-bit converter driven by polling ADSC.
pub struct Adc {
    _private: (),
}

impl Adc {
    /// Enable the ADC with AVCC reference and a /128 clock.
    ///
    /// # Safety
    ///
    /// The caller must be the sole user of the ADC.
    pub unsafe fn new() -> Self {
        let p = ADC::ptr();
        (*p).adcsra.write(|w| w.bits(ADEN | ADPS_DIV128));
        (*p).admux.write(|w| w.bits(REFS_AVCC));
        Self { _private: () }
    }
}

impl Converter for Adc {
    fn start(&mut self, channel: Channel) {
        unsafe {
            let p = ADC::ptr();
            (*p).admux.modify(|r, w| w.bits((r.bits() & !MUX_MASK) | channel.index()));
            (*p).adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
        }
    }

    fn result(&mut self) -> nb::Result<u16, Infallible> {
        let p = ADC::ptr();
        // ADSC reads as one while the conversion is in progress
        if unsafe { (*p).adcsra.read().bits() } & ADSC != 0 {
            return Err(nb::Error::WouldBlock);
        }
        // 16-bit access reads ADCL first, which latches ADCH
        Ok(unsafe { (*p).adc.read().bits() })
    }
}
