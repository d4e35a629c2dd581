//! Full measurement cycle through the public API: trigger, two captured
//! edges, distance conversion, with a bench-model capture timer standing in
//! for the hardware.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use echo_ranging::{
    CaptureConfig, CaptureTimer, CaptureUnit, EchoTimer, EdgePolarity, Hcsr04, PulseWidth,
};

#[derive(Debug, Default)]
struct BenchState {
    running: bool,
    edge: Option<EdgePolarity>,
    counter: u16,
    capture: u16,
}

struct BenchTimer(Rc<RefCell<BenchState>>);

#[derive(Clone)]
struct Bench(Rc<RefCell<BenchState>>);

impl Bench {
    fn new() -> (BenchTimer, Bench) {
        let state = Rc::new(RefCell::new(BenchState::default()));
        (BenchTimer(state.clone()), Bench(state))
    }

    /// Returns true when the transition matched the armed polarity and was
    /// latched by the "hardware".
    fn edge(&self, polarity: EdgePolarity, counter_at: u16) -> bool {
        let mut s = self.0.borrow_mut();
        if !s.running || s.edge != Some(polarity) {
            return false;
        }
        s.counter = counter_at;
        s.capture = counter_at;
        true
    }

    fn armed_edge(&self) -> Option<EdgePolarity> {
        self.0.borrow().edge
    }
}

impl CaptureTimer for BenchTimer {
    fn configure(&mut self, config: CaptureConfig) {
        let mut s = self.0.borrow_mut();
        s.running = config.prescaler.divisor().is_some();
        s.edge = Some(config.edge);
        s.counter = 0;
        s.capture = 0;
    }

    fn set_edge(&mut self, edge: EdgePolarity) {
        self.0.borrow_mut().edge = Some(edge);
    }

    fn capture_value(&self) -> u16 {
        self.0.borrow().capture
    }

    fn clear_counter(&mut self) {
        self.0.borrow_mut().counter = 0;
    }

    fn clear_event(&mut self) {}

    fn shutdown(&mut self) {
        let mut s = self.0.borrow_mut();
        s.running = false;
        s.edge = None;
        s.counter = 0;
        s.capture = 0;
    }
}

struct BenchPin;

impl ErrorType for BenchPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for BenchPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct BenchDelay;

impl DelayNs for BenchDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[test]
fn full_cycle_produces_a_distance() {
    static WIDTH: PulseWidth = PulseWidth::new();
    let (timer, bench) = Bench::new();
    let mut unit = CaptureUnit::new(timer);
    unit.init(CaptureConfig::default());
    EchoTimer::new(&WIDTH).install(&mut unit);

    let mut sampler = Hcsr04::new(BenchPin, BenchDelay, &WIDTH);

    // First read races ahead of the first echo: zero.
    assert_eq!(sampler.read_distance(), 0);

    // Echo comes back: rising edge starts the interval, falling edge ends
    // it 1176 ticks later.
    assert!(bench.edge(EdgePolarity::Rising, 0));
    unit.on_capture();
    assert!(bench.edge(EdgePolarity::Falling, 1176));
    unit.on_capture();

    assert_eq!(sampler.read_distance(), 20);
    assert_eq!(bench.armed_edge(), Some(EdgePolarity::Rising));
}

#[test]
fn noise_on_the_wrong_polarity_never_corrupts_a_measurement() {
    static WIDTH: PulseWidth = PulseWidth::new();
    let (timer, bench) = Bench::new();
    let mut unit = CaptureUnit::new(timer);
    unit.init(CaptureConfig::default());
    EchoTimer::new(&WIDTH).install(&mut unit);

    assert!(bench.edge(EdgePolarity::Rising, 0));
    unit.on_capture();

    // Mid-interval rising glitches are filtered before software sees them.
    assert!(!bench.edge(EdgePolarity::Rising, 12345));
    assert!(!bench.edge(EdgePolarity::Rising, 1));

    assert!(bench.edge(EdgePolarity::Falling, 588));
    unit.on_capture();

    let mut sampler = Hcsr04::new(BenchPin, BenchDelay, &WIDTH);
    assert_eq!(sampler.read_distance(), 10);
}

#[test]
fn restart_behaves_like_first_start() {
    static WIDTH: PulseWidth = PulseWidth::new();
    let (timer, bench) = Bench::new();
    let mut unit = CaptureUnit::new(timer);
    let config = CaptureConfig::default();
    unit.init(config);
    EchoTimer::new(&WIDTH).install(&mut unit);

    assert!(bench.edge(EdgePolarity::Rising, 0));
    unit.on_capture();
    assert!(bench.edge(EdgePolarity::Falling, 294));
    unit.on_capture();
    assert_eq!(WIDTH.load(), 294);

    unit.deinit();
    assert!(!bench.edge(EdgePolarity::Rising, 7));

    unit.init(config);
    assert!(bench.edge(EdgePolarity::Rising, 0));
    unit.on_capture();
    assert!(bench.edge(EdgePolarity::Falling, 294));
    unit.on_capture();
    assert_eq!(WIDTH.load(), 294);
}
