//! Analog multiplexer channel selection

/// Number of single-ended inputs on the ADC multiplexer.
pub const CHANNEL_COUNT: u8 = 8;

/// Multiplexer input, always in `0..CHANNEL_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub struct Channel(u8);

impl Channel {
    /// Any value is accepted and reduced modulo [`CHANNEL_COUNT`].
    pub const fn new(index: u8) -> Self {
        Channel(index % CHANNEL_COUNT)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn next(self) -> Self {
        Channel::new(self.0 + 1)
    }
}

/// Which channel each acquisition samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSelector {
    Fixed(Channel),
    /// Sample the held channel, then move to the following one.
    Cycling(Channel),
}

impl ChannelSelector {
    pub const fn fixed(index: u8) -> Self {
        ChannelSelector::Fixed(Channel::new(index))
    }

    pub const fn cycling(start: u8) -> Self {
        ChannelSelector::Cycling(Channel::new(start))
    }

    /// Channel for the acquisition about to happen.
    pub fn current(&self) -> Channel {
        match *self {
            ChannelSelector::Fixed(ch) | ChannelSelector::Cycling(ch) => ch,
        }
    }

    /// Hand out the channel for this acquisition and advance a cycling selector.
    pub fn select(&mut self) -> Channel {
        match self {
            ChannelSelector::Fixed(ch) => *ch,
            ChannelSelector::Cycling(ch) => {
                let current = *ch;
                *ch = current.next();
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_modulo_eight() {
        assert_eq!(Channel::new(7).index(), 7);
        assert_eq!(Channel::new(8).index(), 0);
        assert_eq!(Channel::new(13).index(), 5);
        assert_eq!(Channel::new(u8::MAX).index(), 7);
    }

    #[test]
    fn cycling_wraps_after_seven() {
        let mut selector = ChannelSelector::cycling(6);
        let picked: [u8; 4] = core::array::from_fn(|_| selector.select().index());
        assert_eq!(picked, [6, 7, 0, 1]);
    }

    #[test]
    fn fixed_never_moves() {
        let mut selector = ChannelSelector::fixed(11);
        assert_eq!(selector.select(), Channel::new(3));
        assert_eq!(selector.select(), Channel::new(3));
        assert_eq!(selector.current().index(), 3);
    }
}
