//! Periodic blocking sampler
//!
//! Waits for the period timer, runs one blocking acquisition, hands the
//! reading to the sink and only then resets the timer. The next period is
//! therefore measured from completed work, and a slow sink stretches the
//! cycle instead of queueing readings.

use crate::acquire::Acquire;
use crate::channel::ChannelSelector;
use crate::counter::HardwareCounter;
use crate::period::PeriodSpec;
use crate::sink::{SampleEvent, SampleSink};
use crate::spin::spin_until;
use crate::tally::TallyWord;
use crate::timer::PeriodTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Waiting,
    Sampling,
}

pub struct SampleScheduler<'t, C, W, A, S>
where
    C: HardwareCounter,
    W: TallyWord,
{
    timer: PeriodTimer<'t, C, W>,
    spec: PeriodSpec<W>,
    selector: ChannelSelector,
    acquire: A,
    sink: S,
    state: SchedulerState,
}

impl<'t, C, W, A, S> SampleScheduler<'t, C, W, A, S>
where
    C: HardwareCounter,
    W: TallyWord,
    A: Acquire,
    S: SampleSink,
{
    pub fn new(
        timer: PeriodTimer<'t, C, W>,
        spec: PeriodSpec<W>,
        selector: ChannelSelector,
        acquire: A,
        sink: S,
    ) -> Self {
        Self {
            timer,
            spec,
            selector,
            acquire,
            sink,
            state: SchedulerState::Waiting,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// One check of the timer. Samples and returns the event if the period
    /// has elapsed, returns `None` right away otherwise.
    pub fn poll(&mut self) -> Option<SampleEvent> {
        if self.timer.elapsed(&self.spec) {
            Some(self.sample())
        } else {
            None
        }
    }

    fn sample(&mut self) -> SampleEvent {
        self.state = SchedulerState::Sampling;

        let channel = self.selector.select();
        let raw = self.acquire.acquire(channel);
        let event = SampleEvent { channel, raw };
        self.sink.deliver(event);

        self.timer.reset();
        self.state = SchedulerState::Waiting;
        event
    }

    fn wait(&mut self) {
        let timer = &mut self.timer;
        let spec = &self.spec;
        spin_until(|| timer.elapsed(spec));
    }

    /// Sample once per period until the process ends.
    pub fn run(mut self) -> ! {
        loop {
            self.wait();
            self.sample();
        }
    }

    /// Like [`run`](Self::run), but checks `keep_going` between periods and
    /// hands the parts back once it returns false. `keep_going` is not
    /// consulted while a period is being waited for.
    pub fn run_while(mut self, mut keep_going: impl FnMut() -> bool) -> (PeriodTimer<'t, C, W>, A, S) {
        while keep_going() {
            self.wait();
            self.sample();
        }
        (self.timer, self.acquire, self.sink)
    }
}
