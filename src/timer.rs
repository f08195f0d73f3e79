//! Period timer on top of an 8-bit overflow-interrupting counter
//!
//! The coarse part of a period is counted by the overflow handler in an
//! [`OverflowTally`], the fine part is read live from the counter. Comparing
//! the `(tally, count)` pair against a [`PeriodSpec`] gives tick precision
//! for periods far beyond a single counter overflow.

use crate::counter::{HardwareCounter, Prescaler, OVERFLOW_TICKS};
use crate::period::PeriodSpec;
use crate::tally::{OverflowTally, TallyWord};

pub struct PeriodTimer<'t, C: HardwareCounter, W: TallyWord = u16> {
    counter: C,
    tally: &'t OverflowTally<W>,
}

impl<'t, C: HardwareCounter, W: TallyWord> PeriodTimer<'t, C, W> {
    /// Take over `counter`: select the tick rate, zero counter and tally and
    /// enable the overflow interrupt feeding `tally`.
    ///
    /// # Panics
    ///
    /// If `prescaler` stops the clock or is not available on `counter`.
    /// Both are wiring mistakes, not runtime conditions.
    pub fn configure(mut counter: C, tally: &'t OverflowTally<W>, prescaler: Prescaler) -> Self {
        assert!(prescaler.divisor().is_some(), "period timer needs a running clock");
        assert!(counter.supports(prescaler), "prescaler not available on this counter");

        counter.set_overflow_interrupt(false);
        counter.start(prescaler);
        counter.clear();
        tally.clear();
        counter.set_overflow_interrupt(true);

        Self { counter, tally }
    }

    /// Run `f` with the overflow interrupt masked.
    ///
    /// Only the overflow enable is cleared, not the global interrupt flag
    /// (`avr_device::interrupt::free`). The tally races with that one
    /// interrupt alone and every other vector keeps running.
    #[inline]
    fn masked<R>(&mut self, f: impl FnOnce(&mut C, &OverflowTally<W>) -> R) -> R {
        self.counter.set_overflow_interrupt(false);
        let r = f(&mut self.counter, self.tally);
        self.counter.set_overflow_interrupt(true);
        r
    }

    /// Overflows since the last reset.
    pub fn overflows(&mut self) -> W {
        if W::SINGLE_ACCESS {
            self.tally.load()
        } else {
            self.masked(|_, tally| tally.load())
        }
    }

    /// Consistent `(overflows, count)` pair.
    ///
    /// The counter is read on both sides of the tally; a wrap in between
    /// shows up as the second read being smaller and the sample is retaken.
    pub fn snapshot(&mut self) -> (W, u8) {
        loop {
            let before = self.counter.count();
            let overflows = self.overflows();
            let after = self.counter.count();
            if before <= after {
                break (overflows, after);
            }
        }
    }

    /// Ticks since the last reset.
    pub fn elapsed_ticks(&mut self) -> u64 {
        let (overflows, count) = self.snapshot();
        u64::from(overflows.into_u32()) * u64::from(OVERFLOW_TICKS) + u64::from(count)
    }

    /// Whether `spec` has elapsed since the last reset. Stays true until
    /// [`reset`](Self::reset), however long the caller waits.
    pub fn elapsed(&mut self, spec: &PeriodSpec<W>) -> bool {
        let (overflows, count) = self.snapshot();
        spec.reached(overflows, count)
    }

    /// Start a new interval from now.
    pub fn reset(&mut self) {
        self.masked(|counter, tally| {
            counter.clear();
            tally.clear();
        });
    }

    /// Stop feeding the tally and hand the counter back.
    pub fn release(mut self) -> C {
        self.counter.set_overflow_interrupt(false);
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCounter;

    #[test]
    fn configure_starts_from_zero() {
        let tally = OverflowTally::<u16>::new(40);
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
        assert_eq!(sim.prescaler(), Prescaler::Div64);
        assert!(sim.overflow_interrupt_enabled());
        assert_eq!(timer.snapshot(), (0, 0));
    }

    #[test]
    #[should_panic(expected = "running clock")]
    fn configure_rejects_stopped_clock() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let _ = PeriodTimer::configure(&sim, &tally, Prescaler::Stop);
    }

    #[test]
    #[should_panic(expected = "not available")]
    fn configure_rejects_unsupported_prescaler() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        sim.reject(Prescaler::Div32);
        let _ = PeriodTimer::configure(&sim, &tally, Prescaler::Div32);
    }

    #[test]
    fn fires_exactly_at_threshold() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        let spec = PeriodSpec::new(2, 37);

        sim.advance(2 * 256 + 36);
        assert!(!timer.elapsed(&spec));
        sim.advance(1);
        assert!(timer.elapsed(&spec));
        assert_eq!(timer.elapsed_ticks(), 2 * 256 + 37);
    }

    #[test]
    fn stays_elapsed_until_reset() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        let spec = PeriodSpec::new(1, 200);

        sim.advance(256 + 200);
        for _ in 0..300 {
            assert!(timer.elapsed(&spec));
            sim.advance(1);
        }
        timer.reset();
        assert_eq!(timer.snapshot(), (0, 0));
        assert!(!timer.elapsed(&spec));
    }

    #[test]
    fn zero_period_is_elapsed_right_after_reset() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        timer.reset();
        assert!(timer.elapsed(&PeriodSpec::new(0, 0)));
        assert!(!timer.elapsed(&PeriodSpec::new(0, 1)));
    }

    #[test]
    fn reset_drops_overflow_pending_at_reset_time() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        sim.advance(255);
        // the wrap lands while the interrupt is masked
        let mut hw = &sim;
        hw.set_overflow_interrupt(false);
        sim.advance(1);
        assert!(sim.overflow_pending());
        timer.reset();
        assert!(!sim.overflow_pending());
        assert_eq!(timer.snapshot(), (0, 0));
    }

    #[test]
    fn wide_tally_is_read_masked() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        let before = sim.masked_sections();
        timer.overflows();
        assert_eq!(sim.masked_sections(), before + 1);
        assert!(sim.overflow_interrupt_enabled());
    }

    #[test]
    fn byte_tally_is_read_directly() {
        let tally = OverflowTally::<u8>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        let before = sim.masked_sections();
        timer.overflows();
        assert_eq!(sim.masked_sections(), before);
    }

    #[test]
    fn snapshot_retries_across_a_wrap() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        sim.advance(253);
        // every counter read costs 4 ticks, so the first sample straddles the wrap
        sim.set_read_drift(4);
        assert_eq!(timer.snapshot(), (1, 9));
    }

    #[test]
    fn release_masks_the_interrupt() {
        let tally = OverflowTally::<u16>::default();
        let sim = SimCounter::new(&tally);
        let timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
        timer.release();
        assert!(!sim.overflow_interrupt_enabled());
    }
}
