//! Blocking analog acquisition

use core::convert::Infallible;

use crate::channel::Channel;

/// One complete conversion: select `channel`, convert, wait, return the raw
/// reading. Never fails; a conversion that never completes hangs the caller.
pub trait Acquire {
    fn acquire(&mut self, channel: Channel) -> u16;
}

impl<F> Acquire for F
where
    F: FnMut(Channel) -> u16,
{
    fn acquire(&mut self, channel: Channel) -> u16 {
        self(channel)
    }
}

/// Converter hardware split into its start and completion steps.
pub trait Converter {
    /// Select `channel` on the multiplexer and trigger a conversion.
    fn start(&mut self, channel: Channel);

    /// `WouldBlock` until the conversion-complete flag is observed.
    fn result(&mut self) -> nb::Result<u16, Infallible>;
}

/// Spins on a [`Converter`] until each conversion completes.
pub struct Blocking<C> {
    converter: C,
}

impl<C: Converter> Blocking<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    pub fn into_inner(self) -> C {
        self.converter
    }
}

impl<C: Converter> Acquire for Blocking<C> {
    fn acquire(&mut self, channel: Channel) -> u16 {
        self.converter.start(channel);
        match nb::block!(self.converter.result()) {
            Ok(raw) => raw,
            Err(never) => match never {},
        }
    }
}
