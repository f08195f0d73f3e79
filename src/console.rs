//! Line-oriented serial console
//!
//! Formatting goes through `ufmt`, which keeps code size manageable on the
//! 8-bit target. Transmit errors are dropped: there is nobody to report them to.

use embedded_hal::serial;
use ufmt::{uDisplay, uWrite};

pub struct Console<S> {
    serial: S,
}

impl<S: serial::Write<u8>> Console<S> {
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn write_line(&mut self, line: &str) {
        ufmt::uwrite!(self, "{}\r\n", line).ok();
    }

    pub fn info(&mut self, msg: &str) {
        ufmt::uwrite!(self, "[INF] {}\r\n", msg).ok();
    }

    // Print formatted debug info
    pub fn debug<T: uDisplay>(&mut self, msg: &str, value: T) {
        ufmt::uwrite!(self, "[DBG] {}: {}\r\n", msg, value).ok();
    }

    pub fn release(self) -> S {
        self.serial
    }
}

impl<S: serial::Write<u8>> uWrite for Console<S> {
    type Error = S::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            nb::block!(self.serial.write(byte))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::serial::{Mock, Transaction};

    #[test]
    fn info_line() {
        let expectations = [Transaction::write_many(b"[INF] ready\r\n")];
        let mut console = Console::new(Mock::new(&expectations));
        console.info("ready");
        console.release().done();
    }

    #[test]
    fn debug_line_with_value() {
        let expectations = [Transaction::write_many(b"[DBG] overflows: 61\r\n")];
        let mut console = Console::new(Mock::new(&expectations));
        console.debug("overflows", 61u16);
        console.release().done();
    }

    #[test]
    fn plain_line() {
        let expectations = [Transaction::write_many(b"ATmega128 sampler\r\n")];
        let mut console = Console::new(Mock::new(&expectations));
        console.write_line("ATmega128 sampler");
        console.release().done();
    }
}
