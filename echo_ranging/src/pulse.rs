use alloc::boxed::Box;
use core::sync::atomic::{AtomicU16, Ordering};

use crate::capture::{CaptureTimer, CaptureUnit, EdgePolarity};

/// Where the state machine is in the current rising/falling pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePhase {
    AwaitingRise,
    AwaitingFall,
}

/// Width of the last fully measured echo pulse, in counter ticks.
///
/// Written only by the capture interrupt, read only by the sampler. The
/// 16-bit atomic keeps reads untorn on every platform, but there is no
/// freshness handshake: a reader may observe the previous cycle's width, or
/// zero before the first echo completes.
pub struct PulseWidth(AtomicU16);

impl PulseWidth {
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    pub fn store(&self, ticks: u16) {
        self.0.store(ticks, Ordering::Relaxed);
    }

    pub fn load(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for PulseWidth {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-edge echo timing state machine.
///
/// Runs as the capture unit's callback: the first matching edge starts the
/// interval (counter cleared, polarity flipped to [`EdgePolarity::Falling`]),
/// the second one ends it (capture value stored, polarity flipped back).
/// There is no terminal state and no bound on how long either wait takes;
/// the sensor drives the pace.
pub struct EchoTimer {
    phase: EdgePhase,
    width: &'static PulseWidth,
}

impl EchoTimer {
    pub fn new(width: &'static PulseWidth) -> Self {
        Self {
            phase: EdgePhase::AwaitingRise,
            width,
        }
    }

    pub fn phase(&self) -> EdgePhase {
        self.phase
    }

    /// Process one capture event. Toggles the phase exactly once; the armed
    /// polarity after return always matches the new phase.
    pub fn on_edge<T: CaptureTimer>(&mut self, timer: &mut T) {
        match self.phase {
            EdgePhase::AwaitingRise => {
                timer.clear_counter();
                timer.set_edge(EdgePolarity::Falling);
                self.phase = EdgePhase::AwaitingFall;
            }
            EdgePhase::AwaitingFall => {
                self.width.store(timer.capture_value());
                timer.set_edge(EdgePolarity::Rising);
                self.phase = EdgePhase::AwaitingRise;
            }
        }
    }

    /// Hand the state machine over to `unit` as its capture callback.
    pub fn install<T: CaptureTimer>(self, unit: &mut CaptureUnit<T>) {
        let mut machine = self;
        unit.set_callback(Some(Box::new(move |timer: &mut T| machine.on_edge(timer))));
    }
}
