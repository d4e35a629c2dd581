use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::pulse::PulseWidth;

// Distance = (speed of sound 34_000 cm/s * time) / 2, with the counter at
// 1 MHz effective rate (8 MHz reference / 8): distance_cm = ticks / 58.8.
const TICKS_PER_CM: f32 = 58.8;

/// Minimum trigger pulse width from the sensor datasheet.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Truncating ticks-to-centimeters conversion at the 1 us tick rate.
pub fn ticks_to_centimeters(ticks: u16) -> u16 {
    (ticks as f32 / TICKS_PER_CM) as u16
}

/// HC-SR04 style sampler: owns the trigger pin and reads the echo width the
/// capture interrupt leaves behind.
pub struct Hcsr04<P, D> {
    trig_pin: P,
    delay: D,
    width: &'static PulseWidth,
}

impl<P: OutputPin, D: DelayNs> Hcsr04<P, D> {
    /// The trigger line is forced low immediately so the first pulse is a
    /// clean high-then-low regardless of the pin's prior state.
    pub fn new(mut trig_pin: P, delay: D, width: &'static PulseWidth) -> Self {
        trig_pin.set_low().ok();
        Self {
            trig_pin,
            delay,
            width,
        }
    }

    /// Command the sensor to emit a burst: trigger high, hold for at least
    /// [`TRIGGER_PULSE_US`], trigger low. Blocking, no cancellation.
    pub fn trigger_pulse(&mut self) {
        self.trig_pin.set_high().ok();
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trig_pin.set_low().ok();
    }

    /// Fire a trigger pulse and convert the stored echo width to whole
    /// centimeters.
    ///
    /// There is no wait for the measurement just triggered: the value read
    /// is whatever the capture interrupt stored last, usually the previous
    /// cycle's echo, or zero before the first one completes.
    pub fn read_distance(&mut self) -> u16 {
        self.trigger_pulse();
        ticks_to_centimeters(self.width.load())
    }
}
