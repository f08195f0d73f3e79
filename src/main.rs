#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use embedded_hal::serial;
    use overflow_sampler::config::{self, TimerConfig};
    use overflow_sampler::hal::{board, Adc, Tc8Counter, Timer0, Usart0};
    use overflow_sampler::{
        Blocking, ChannelSelector, ConfigError, Console, ConsoleSink, OverflowTally, PeriodSpec, PeriodTimer,
        SampleScheduler, Tee, ThresholdLed,
    };

    static TALLY: OverflowTally<u16> = OverflowTally::new(0);

    // Must match the counter handed to the period timer (Tc8Counter<Timer0>).
    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_OVF() {
        // SAFETY: this is the overflow vector of the counter reading TALLY.
        unsafe { TALLY.on_overflow() };
    }

    #[allow(clippy::empty_loop)]
    fn halt<S: serial::Write<u8>>(console: &mut Console<S>, err: ConfigError) -> ! {
        ufmt::uwrite!(console, "[ERR] {:?}\r\n", err).ok();
        loop {}
    }

    #[avr_device::entry]
    fn main() -> ! {
        let mut console = Console::new(unsafe { Usart0::new(config::UART_UBRR) });
        console.write_line("ATmega128 sampler v0.1.0");

        let timer_config = match TimerConfig::board() {
            Ok(timer_config) => timer_config,
            Err(err) => halt(&mut console, err),
        };
        let spec: PeriodSpec<u16> = match timer_config.period_spec(config::SAMPLE_PERIOD_US) {
            Ok(spec) => spec,
            Err(err) => halt(&mut console, err),
        };
        console.debug("Overflows", spec.overflows());
        console.debug("Remainder", spec.remainder());
        #[cfg(feature = "debug")]
        console.debug("Overflow us", timer_config.overflow_period_us());

        let counter = unsafe { Tc8Counter::<Timer0>::new() };
        let timer = PeriodTimer::configure(counter, &TALLY, timer_config.prescaler());
        let adc = Blocking::new(unsafe { Adc::new() });
        let led = ThresholdLed::new(unsafe { board::Led0::new() }, config::LED_THRESHOLD);

        console.info("Sampling...");
        let sink = Tee::new(ConsoleSink::new(console), led);

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        SampleScheduler::new(timer, spec, ChannelSelector::fixed(config::SAMPLE_CHANNEL), adc, sink).run()
    }
}

/// Host build: run the sampler against the simulated counter and converter.
#[cfg(not(target_arch = "avr"))]
fn main() {
    use overflow_sampler::config::{self, TimerConfig};
    use overflow_sampler::sim::{SimAdc, SimCounter};
    use overflow_sampler::{
        Blocking, Channel, ChannelSelector, OverflowTally, PeriodSpec, PeriodTimer, SampleEvent, SampleScheduler,
    };

    let timer_config = match TimerConfig::board() {
        Ok(timer_config) => timer_config,
        Err(err) => {
            eprintln!("[ERR] {}", err);
            std::process::exit(1);
        }
    };
    let spec: PeriodSpec<u16> = match timer_config.period_spec(config::SAMPLE_PERIOD_US) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("[ERR] {}", err);
            std::process::exit(1);
        }
    };
    println!("[DBG] Overflows: {}", spec.overflows());
    println!("[DBG] Remainder: {}", spec.remainder());

    let tally = OverflowTally::<u16>::default();
    let sim = SimCounter::new(&tally);
    let timer = PeriodTimer::configure(&sim, &tally, timer_config.prescaler());

    let mut adc = SimAdc::new(13);
    for index in 0..8 {
        adc.set_reading(Channel::new(index), 128 * u16::from(index));
    }

    let mut ticks = 0u64;
    let mut scheduler = SampleScheduler::new(
        timer,
        spec,
        ChannelSelector::cycling(0),
        Blocking::new(adc),
        |event: SampleEvent| println!("ADC{}: {}", event.channel.index(), event.raw),
    );

    for _ in 0..10 * spec.ticks() {
        sim.tick();
        ticks += 1;
        if scheduler.poll().is_some() {
            println!("[INF] sampled at tick {}", ticks);
        }
    }
}
