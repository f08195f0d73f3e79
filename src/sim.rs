//! Simulated counter and converter for host runs
//!
//! [`SimCounter`] models the behavior the period timer depends on: the
//! counter only ticks once a prescaler is selected, a wrap with the overflow
//! interrupt masked leaves the flag pending, and the pending handler runs as
//! soon as the interrupt is unmasked. Time is advanced explicitly with
//! [`SimCounter::advance`], or implicitly on every counter read with
//! [`SimCounter::set_read_drift`] to model a poll taking time.

use core::cell::Cell;
use core::convert::Infallible;

use crate::acquire::Converter;
use crate::channel::{Channel, CHANNEL_COUNT};
use crate::counter::{HardwareCounter, Prescaler};
use crate::tally::{OverflowTally, TallyWord};

pub struct SimCounter<'a, W: TallyWord> {
    vector: &'a OverflowTally<W>,
    count: Cell<u8>,
    prescaler: Cell<Prescaler>,
    overflow_irq: Cell<bool>,
    pending: Cell<bool>,
    read_drift: Cell<u8>,
    unsupported: Cell<Option<Prescaler>>,
    masked_sections: Cell<u32>,
}

impl<'a, W: TallyWord> SimCounter<'a, W> {
    /// `vector` is the tally whose handler is bound to this counter's
    /// overflow interrupt.
    pub fn new(vector: &'a OverflowTally<W>) -> Self {
        Self {
            vector,
            count: Cell::new(0),
            prescaler: Cell::new(Prescaler::Stop),
            overflow_irq: Cell::new(false),
            pending: Cell::new(false),
            read_drift: Cell::new(0),
            unsupported: Cell::new(None),
            masked_sections: Cell::new(0),
        }
    }

    /// Make `supports` refuse `prescaler`.
    pub fn reject(&self, prescaler: Prescaler) {
        self.unsupported.set(Some(prescaler));
    }

    /// Advance the counter by `ticks` after every `count()` read.
    pub fn set_read_drift(&self, ticks: u8) {
        self.read_drift.set(ticks);
    }

    pub fn tick(&self) {
        if self.prescaler.get() == Prescaler::Stop {
            return;
        }
        let next = self.count.get().wrapping_add(1);
        self.count.set(next);
        if next == 0 {
            if self.overflow_irq.get() {
                // SAFETY: the simulated vector runs on the polling thread.
                unsafe { self.vector.on_overflow() };
            } else {
                self.pending.set(true);
            }
        }
    }

    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Counter value without the read drift.
    pub fn peek(&self) -> u8 {
        self.count.get()
    }

    pub fn prescaler(&self) -> Prescaler {
        self.prescaler.get()
    }

    pub fn overflow_interrupt_enabled(&self) -> bool {
        self.overflow_irq.get()
    }

    pub fn overflow_pending(&self) -> bool {
        self.pending.get()
    }

    /// How many times the overflow interrupt was masked.
    pub fn masked_sections(&self) -> u32 {
        self.masked_sections.get()
    }
}

impl<W: TallyWord> HardwareCounter for &SimCounter<'_, W> {
    fn supports(&self, prescaler: Prescaler) -> bool {
        self.unsupported.get() != Some(prescaler)
    }

    fn start(&mut self, prescaler: Prescaler) {
        self.prescaler.set(prescaler);
    }

    fn count(&self) -> u8 {
        let value = self.count.get();
        self.advance(u32::from(self.read_drift.get()));
        value
    }

    fn clear(&mut self) {
        self.count.set(0);
        self.pending.set(false);
    }

    fn set_overflow_interrupt(&mut self, enabled: bool) {
        if !enabled && self.overflow_irq.get() {
            self.masked_sections.set(self.masked_sections.get() + 1);
        }
        self.overflow_irq.set(enabled);
        if enabled && self.pending.replace(false) {
            // SAFETY: as in `tick`.
            unsafe { self.vector.on_overflow() };
        }
    }
}

/// Converter returning a programmed reading per channel after a fixed
/// number of busy polls.
pub struct SimAdc {
    readings: [u16; CHANNEL_COUNT as usize],
    busy_polls: u8,
    remaining: u8,
    selected: Option<Channel>,
    conversions: u32,
}

impl SimAdc {
    pub fn new(busy_polls: u8) -> Self {
        Self {
            readings: [0; CHANNEL_COUNT as usize],
            busy_polls,
            remaining: 0,
            selected: None,
            conversions: 0,
        }
    }

    pub fn set_reading(&mut self, channel: Channel, raw: u16) {
        self.readings[usize::from(channel.index())] = raw;
    }

    /// Completed conversions so far.
    pub fn conversions(&self) -> u32 {
        self.conversions
    }
}

impl Converter for SimAdc {
    fn start(&mut self, channel: Channel) {
        self.selected = Some(channel);
        self.remaining = self.busy_polls;
    }

    fn result(&mut self) -> nb::Result<u16, Infallible> {
        let channel = match self.selected {
            Some(channel) => channel,
            None => return Err(nb::Error::WouldBlock),
        };
        if self.remaining > 0 {
            self.remaining -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.selected = None;
        self.conversions += 1;
        Ok(self.readings[usize::from(channel.index())])
    }
}
