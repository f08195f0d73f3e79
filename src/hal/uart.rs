use core::convert::Infallible;

use avr_device::atmega128a::USART0;
use embedded_hal::serial;

const UDRE0: u8 = 1 << 5;
const TXEN0: u8 = 1 << 3;
/// 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0x06;

/// Polled transmitter on USART0.
pub struct Usart0 {
    _private: (),
}

impl Usart0 {
    /// Set up 8N1 transmit with baud divisor `ubrr`
    /// (see [`config::ubrr`](crate::config::ubrr)).
    ///
    /// # Safety
    ///
    /// The caller must be the sole user of USART0.
    pub unsafe fn new(ubrr: u16) -> Self {
        let p = USART0::ptr();
        (*p).ubrr0h.write(|w| w.bits((ubrr >> 8) as u8));
        (*p).ubrr0l.write(|w| w.bits(ubrr as u8));
        (*p).ucsr0c.write(|w| w.bits(UCSZ_8N1));
        (*p).ucsr0b.write(|w| w.bits(TXEN0));
        Self { _private: () }
    }

    fn ready(&self) -> bool {
        unsafe { (*USART0::ptr()).ucsr0a.read().bits() & UDRE0 != 0 }
    }
}

impl serial::Write<u8> for Usart0 {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        if !self.ready() {
            return Err(nb::Error::WouldBlock);
        }
        unsafe { (*USART0::ptr()).udr0.write(|w| w.bits(word)) };
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if !self.ready() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}
