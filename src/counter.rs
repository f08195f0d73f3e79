//! Free-running 8-bit hardware counter abstraction

/// Ticks per counter overflow of an 8-bit counter.
pub const OVERFLOW_TICKS: u32 = 256;

/// Clock divider between the system clock and the counter tick.
///
/// Not every timer supports every divider, see
/// [`HardwareCounter::supports`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Stop,
    Div1,
    Div8,
    Div32,
    Div64,
    Div128,
    Div256,
    Div1024,
}

impl Prescaler {
    /// System clock cycles per counter tick, `None` when the clock is stopped.
    pub const fn divisor(self) -> Option<u32> {
        match self {
            Prescaler::Stop => None,
            Prescaler::Div1 => Some(1),
            Prescaler::Div8 => Some(8),
            Prescaler::Div32 => Some(32),
            Prescaler::Div64 => Some(64),
            Prescaler::Div128 => Some(128),
            Prescaler::Div256 => Some(256),
            Prescaler::Div1024 => Some(1024),
        }
    }
}

/// One physical free-running counter and its overflow interrupt.
///
/// The counter wraps modulo [`OVERFLOW_TICKS`] and raises the overflow
/// interrupt on every wrap while it is enabled. While the interrupt is
/// masked a wrap leaves the overflow flag pending, and the handler runs as
/// soon as the interrupt is enabled again.
pub trait HardwareCounter {
    /// Whether this counter can be clocked through `prescaler`.
    fn supports(&self, prescaler: Prescaler) -> bool;

    /// Select the tick rate. The counter runs from here on.
    fn start(&mut self, prescaler: Prescaler);

    /// Live counter value.
    fn count(&self) -> u8;

    /// Zero the counter and drop a pending overflow flag.
    fn clear(&mut self);

    fn set_overflow_interrupt(&mut self, enabled: bool);
}
