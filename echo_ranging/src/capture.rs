use alloc::boxed::Box;

/// Which transition of the input line latches the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolarity {
    Rising,
    Falling,
}

/// Counter clock source selection, fixed for the lifetime of a measurement
/// session. The `External*` variants clock the counter from the timer's
/// external input instead of the bus clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPrescaler {
    /// Counter stopped.
    NoClock,
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
    ExternalFalling,
    ExternalRising,
}

impl ClockPrescaler {
    /// Division applied to the timer reference clock, `None` when the
    /// counter is stopped or externally clocked.
    pub fn divisor(&self) -> Option<u32> {
        match self {
            ClockPrescaler::NoClock => None,
            ClockPrescaler::Div1 => Some(1),
            ClockPrescaler::Div8 => Some(8),
            ClockPrescaler::Div64 => Some(64),
            ClockPrescaler::Div256 => Some(256),
            ClockPrescaler::Div1024 => Some(1024),
            ClockPrescaler::ExternalFalling | ClockPrescaler::ExternalRising => None,
        }
    }
}

/// One-shot configuration for [`CaptureUnit::init`]. Only the edge can be
/// changed afterwards, through [`CaptureUnit::set_edge`].
#[derive(Debug, Clone, Copy)]
pub struct CaptureConfig {
    pub edge: EdgePolarity,
    pub prescaler: ClockPrescaler,
}

impl Default for CaptureConfig {
    /// Rising edge, 1 us ticks off an 8 MHz reference.
    fn default() -> Self {
        Self {
            edge: EdgePolarity::Rising,
            prescaler: ClockPrescaler::Div8,
        }
    }
}

/// Hardware side of a capture unit: a free-running counter that latches its
/// count into a capture register when the armed edge occurs on the input
/// line, and raises an event for it.
///
/// Implementations must only report events for the currently armed polarity;
/// a non-matching transition latches nothing. That filtering is what lets
/// [`EchoTimer`](crate::pulse::EchoTimer) flip polarity per edge without any
/// software validation.
pub trait CaptureTimer {
    /// Program clock source and initial edge, zero the counter and capture
    /// register, and enable capture events.
    fn configure(&mut self, config: CaptureConfig);

    /// Re-arm on a different transition without touching clock configuration
    /// or the counter. Callable from the capture event handler.
    fn set_edge(&mut self, edge: EdgePolarity);

    /// Most recent latched counter value. Reading does not clear it.
    fn capture_value(&self) -> u16;

    /// Zero the running counter; the capture register is left alone.
    fn clear_counter(&mut self);

    /// Acknowledge the pending capture event.
    fn clear_event(&mut self);

    /// Disable capture events and return the hardware to a quiescent state.
    /// Must be idempotent.
    fn shutdown(&mut self);
}

/// Callback invoked once per capture event. It receives the timer itself so
/// interrupt context can re-arm, read, and clear through the same operations
/// as the main flow.
pub type EdgeCallback<T> = Box<dyn FnMut(&mut T) + Send>;

/// Owns the capture hardware plus a single swappable callback slot.
///
/// There is no fan-out: re-registering replaces the previous callback. The
/// callback runs in interrupt context and must not block.
pub struct CaptureUnit<T: CaptureTimer> {
    timer: T,
    callback: Option<EdgeCallback<T>>,
}

impl<T: CaptureTimer> CaptureUnit<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            callback: None,
        }
    }

    /// Bring the timer up with `config`. Must run before any edge can be
    /// observed; edge-dependent operations on an uninitialized unit are
    /// hardware-dependent. Reconfigures global hardware state, so don't
    /// interleave two inits of the same unit.
    pub fn init(&mut self, config: CaptureConfig) {
        self.timer.configure(config);
    }

    /// Install (or clear, with `None`) the callback run on every capture
    /// event. The previous callback, if any, is dropped.
    pub fn set_callback(&mut self, callback: Option<EdgeCallback<T>>) {
        self.callback = callback;
    }

    pub fn set_edge(&mut self, edge: EdgePolarity) {
        self.timer.set_edge(edge);
    }

    pub fn capture_value(&self) -> u16 {
        self.timer.capture_value()
    }

    pub fn clear_counter(&mut self) {
        self.timer.clear_counter();
    }

    /// Disable capture events. Idempotent; the callback registration
    /// survives, so a later [`init`](Self::init) resumes where it left off.
    pub fn deinit(&mut self) {
        self.timer.shutdown();
    }

    /// Entry point for the capture interrupt. Acknowledges the event, then
    /// runs the registered callback exactly once; with no callback the
    /// event is dropped (hardware state still advanced).
    pub fn on_capture(&mut self) {
        self.timer.clear_event();
        if let Some(callback) = self.callback.as_mut() {
            callback(&mut self.timer);
        }
    }
}
