//! Consumers of sample events

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;

use crate::channel::Channel;
use crate::console::Console;

/// One raw reading, produced once per elapsed period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleEvent {
    pub channel: Channel,
    pub raw: u16,
}

/// Receives every sample event as it is produced. Delivery happens inside
/// the sampling cycle, so a slow sink delays the next period.
pub trait SampleSink {
    fn deliver(&mut self, event: SampleEvent);
}

impl<F> SampleSink for F
where
    F: FnMut(SampleEvent),
{
    fn deliver(&mut self, event: SampleEvent) {
        self(event)
    }
}

/// Prints `ADC<channel>: <raw>` lines on a serial console.
pub struct ConsoleSink<S> {
    console: Console<S>,
}

impl<S: serial::Write<u8>> ConsoleSink<S> {
    pub fn new(console: Console<S>) -> Self {
        Self { console }
    }

    pub fn release(self) -> Console<S> {
        self.console
    }
}

impl<S: serial::Write<u8>> SampleSink for ConsoleSink<S> {
    fn deliver(&mut self, event: SampleEvent) {
        ufmt::uwrite!(&mut self.console, "ADC{}: {}\r\n", event.channel.index(), event.raw).ok();
    }
}

/// Lights an LED while the reading is at or above a threshold.
pub struct ThresholdLed<P> {
    pin: P,
    threshold: u16,
}

impl<P: OutputPin> ThresholdLed<P> {
    pub fn new(pin: P, threshold: u16) -> Self {
        Self { pin, threshold }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> SampleSink for ThresholdLed<P> {
    fn deliver(&mut self, event: SampleEvent) {
        if event.raw >= self.threshold {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }
}

/// Delivers every event to two sinks, `first` then `second`.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: SampleSink, B: SampleSink> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn release(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: SampleSink, B: SampleSink> SampleSink for Tee<A, B> {
    fn deliver(&mut self, event: SampleEvent) {
        self.first.deliver(event);
        self.second.deliver(event);
    }
}
