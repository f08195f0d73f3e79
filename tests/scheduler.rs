use std::cell::RefCell;

use overflow_sampler::sim::{SimAdc, SimCounter};
use overflow_sampler::{
    Blocking, Channel, ChannelSelector, HardwareCounter, OverflowTally, PeriodSpec, PeriodTimer, Prescaler, SampleEvent,
    SampleScheduler, OVERFLOW_TICKS,
};

/// Ticks until `elapsed` first reports true, polling after every tick.
fn first_elapsed_tick(spec: PeriodSpec<u16>) -> u64 {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
    let mut ticks = 0;
    while !timer.elapsed(&spec) {
        sim.tick();
        ticks += 1;
    }
    ticks
}

#[test]
fn elapses_exactly_at_overflows_times_256_plus_remainder() {
    for (n, r) in [(0, 1), (0, 255), (1, 0), (1, 1), (3, 77), (5, 255)] {
        let expected = u64::from(n) * u64::from(OVERFLOW_TICKS) + u64::from(r);
        assert_eq!(first_elapsed_tick(PeriodSpec::new(n, r)), expected, "N={} R={}", n, r);
    }
}

#[test]
fn one_and_a_half_overflow_periods() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
    let spec = PeriodSpec::new(1, 128);

    for _ in 0..384 {
        assert!(!timer.elapsed(&spec));
        sim.tick();
    }
    // 1.5 overflow periods reached
    for _ in 0..100 {
        assert!(timer.elapsed(&spec));
        sim.tick();
    }
    timer.reset();
    assert!(!timer.elapsed(&spec));
    assert_eq!(timer.snapshot(), (0, 0));
}

#[test]
fn reset_zeroes_tally_and_counter() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
    sim.advance(5 * 256 + 17);
    assert_eq!(timer.snapshot(), (5, 17));

    timer.reset();
    assert_eq!(timer.overflows(), 0);
    assert_eq!(sim.peek(), 0);
    assert!(timer.elapsed(&PeriodSpec::new(0, 0)));
    assert!(!timer.elapsed(&PeriodSpec::new(0, 1)));
}

#[test]
fn tally_counts_every_overflow_with_interleaved_reads() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);

    // uneven chunks so reads land at every phase of the counter
    let mut elapsed = 0u32;
    let mut last = timer.overflows();
    for &chunk in [1u32, 97, 255, 256, 257, 3, 511, 1000, 13].iter().cycle().take(200) {
        let wraps = (elapsed + chunk) / 256 - elapsed / 256;
        sim.advance(chunk);
        elapsed += chunk;
        let now = timer.overflows();
        assert_eq!(now, last.wrapping_add(wraps as u16));
        last = now;
    }
}

#[test]
fn overflow_pending_under_mask_is_counted_once() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
    sim.advance(255);

    // the wrap lands while the interrupt is masked
    let mut hw = &sim;
    hw.set_overflow_interrupt(false);
    sim.advance(1);
    assert!(sim.overflow_pending());

    // read under the mask, the handler runs as the mask is lifted
    assert_eq!(timer.overflows(), 0);
    assert!(!sim.overflow_pending());
    assert_eq!(timer.overflows(), 1);
    assert_eq!(timer.snapshot(), (1, 0));
}

#[test]
fn byte_tally_saturates() {
    let tally = OverflowTally::<u8>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
    sim.advance(250 * 256);
    assert_eq!(timer.overflows(), 250);
    sim.advance(10 * 256);
    assert_eq!(timer.overflows(), u8::MAX);
}

#[test]
fn late_consumer_on_byte_tally_stays_elapsed() {
    let tally = OverflowTally::<u8>::default();
    let sim = SimCounter::new(&tally);
    let mut timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div8);
    let spec = PeriodSpec::new(200, 0);

    sim.advance(200 * 256);
    assert!(timer.elapsed(&spec));

    // far enough past the period that a wrapping tally would read zero again
    sim.advance(56 * 256);
    assert!(timer.elapsed(&spec));
    sim.advance(1000 * 256 + 17);
    assert!(timer.elapsed(&spec));

    timer.reset();
    assert!(!timer.elapsed(&spec));
    assert_eq!(timer.snapshot(), (0, 0));
}

#[test]
fn missed_periods_fire_once() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
    let delivered = RefCell::new(Vec::new());
    let mut scheduler = SampleScheduler::new(
        timer,
        PeriodSpec::new(1, 10),
        ChannelSelector::fixed(0),
        |_: Channel| 7,
        |event: SampleEvent| delivered.borrow_mut().push(event),
    );

    // nobody polls for five periods
    sim.advance(5 * (256 + 10));
    assert!(scheduler.poll().is_some());
    assert!(scheduler.poll().is_none());
    sim.advance(265);
    assert!(scheduler.poll().is_none());
    sim.advance(1);
    assert!(scheduler.poll().is_some());
    drop(scheduler);
    assert_eq!(delivered.into_inner().len(), 2);
}

#[test]
fn cycling_channel_wraps_after_seven() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
    let channels = RefCell::new(Vec::new());
    let mut scheduler = SampleScheduler::new(
        timer,
        PeriodSpec::new(0, 50),
        // 250 mod 8 == 2
        ChannelSelector::cycling(250),
        |channel: Channel| u16::from(channel.index()),
        |event: SampleEvent| channels.borrow_mut().push(event.channel.index()),
    );

    for _ in 0..12 {
        sim.advance(50);
        assert!(scheduler.poll().is_some());
    }
    drop(scheduler);
    assert_eq!(channels.into_inner(), [2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5]);
}

#[test]
fn fixed_reading_is_delivered_unmodified_once_per_period() {
    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let timer = PeriodTimer::configure(&sim, &tally, Prescaler::Div64);
    let mut adc = SimAdc::new(20);
    adc.set_reading(Channel::new(5), 512);
    let delivered = RefCell::new(Vec::new());
    let spec = PeriodSpec::new(2, 44);
    let mut scheduler = SampleScheduler::new(
        timer,
        spec,
        ChannelSelector::fixed(5),
        Blocking::new(adc),
        |event: SampleEvent| delivered.borrow_mut().push(event),
    );

    let period = spec.ticks();
    let mut fired_at = Vec::new();
    for tick in 1..=(4 * period) {
        sim.tick();
        if scheduler.poll().is_some() {
            fired_at.push(tick);
        }
    }
    drop(scheduler);

    assert_eq!(fired_at, [period, 2 * period, 3 * period, 4 * period]);
    let delivered = delivered.into_inner();
    assert_eq!(delivered.len(), 4);
    assert!(delivered.iter().all(|e| e.raw == 512 && e.channel == Channel::new(5)));
}
