//! Simulated capture hardware for the unit tests: a [`SimTimer`] handed to
//! the code under test, and a [`SimLine`] the test keeps to wiggle the input
//! and inspect what the "hardware" latched.

use std::cell::RefCell;
use std::rc::Rc;

use crate::capture::{CaptureConfig, CaptureTimer, ClockPrescaler, EdgePolarity};

#[derive(Debug)]
struct SimState {
    configured: bool,
    running: bool,
    edge: EdgePolarity,
    counter: u16,
    capture: u16,
    pending: bool,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            configured: false,
            running: false,
            edge: EdgePolarity::Rising,
            counter: 0,
            capture: 0,
            pending: false,
        }
    }
}

pub(crate) struct SimTimer {
    state: Rc<RefCell<SimState>>,
}

/// Test-side handle onto the same simulated hardware.
#[derive(Clone)]
pub(crate) struct SimLine {
    state: Rc<RefCell<SimState>>,
}

pub(crate) fn sim_pair() -> (SimTimer, SimLine) {
    let state = Rc::new(RefCell::new(SimState::default()));
    (
        SimTimer {
            state: state.clone(),
        },
        SimLine { state },
    )
}

impl SimLine {
    /// Drive a transition on the input line with the counter sitting at
    /// `counter_at`. Returns true when the edge matched the armed polarity
    /// and a capture event was latched. The polarity filter lives in the
    /// hardware, so a non-matching edge does nothing at all.
    pub fn edge(&self, polarity: EdgePolarity, counter_at: u16) -> bool {
        let mut s = self.state.borrow_mut();
        if !s.configured || !s.running || polarity != s.edge {
            return false;
        }
        s.counter = counter_at;
        s.capture = counter_at;
        s.pending = true;
        true
    }

    pub fn armed_edge(&self) -> EdgePolarity {
        self.state.borrow().edge
    }

    pub fn counter(&self) -> u16 {
        self.state.borrow().counter
    }
}

impl CaptureTimer for SimTimer {
    fn configure(&mut self, config: CaptureConfig) {
        let mut s = self.state.borrow_mut();
        s.configured = true;
        s.running = !matches!(config.prescaler, ClockPrescaler::NoClock);
        s.edge = config.edge;
        s.counter = 0;
        s.capture = 0;
        s.pending = false;
    }

    fn set_edge(&mut self, edge: EdgePolarity) {
        self.state.borrow_mut().edge = edge;
    }

    fn capture_value(&self) -> u16 {
        self.state.borrow().capture
    }

    fn clear_counter(&mut self) {
        self.state.borrow_mut().counter = 0;
    }

    fn clear_event(&mut self) {
        self.state.borrow_mut().pending = false;
    }

    fn shutdown(&mut self) {
        let mut s = self.state.borrow_mut();
        s.configured = false;
        s.running = false;
        s.counter = 0;
        s.capture = 0;
        s.pending = false;
    }
}
