//! TIM4 channel 1 input capture, wired to the echo line on PB6.

use echo_ranging::{CaptureConfig, CaptureTimer, ClockPrescaler, EdgePolarity};
use stm32f4xx_hal::{
    gpio::{Alternate, Pin},
    pac::TIM4,
};

/// TIM4 kernel clock with the clock tree set up by
/// [`SonarHardware::init`](crate::SonarHardware::init). `Div8` on top of
/// this gives the 1 us ticks the distance conversion expects.
pub const CAPTURE_CLOCK_HZ: u32 = 8_000_000;

/// Echo input, TIM4_CH1.
pub type EchoPin = Pin<'B', 6, Alternate<2>>;

pub struct EchoCapture {
    tim: TIM4,
    _echo_pin: EchoPin,
}

impl EchoCapture {
    /// The timer is left untouched until `configure` runs; TIM4's bus clock
    /// must already be enabled (the board init does this before handing the
    /// peripheral over).
    pub fn new(tim: TIM4, echo_pin: EchoPin) -> Self {
        Self {
            tim,
            _echo_pin: echo_pin,
        }
    }
}

impl CaptureTimer for EchoCapture {
    fn configure(&mut self, config: CaptureConfig) {
        // Quiesce the channel while reprogramming it.
        self.tim.cr1.modify(|_, w| w.cen().disabled());
        self.tim.dier.modify(|_, w| w.cc1ie().disabled());
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());

        // CCR1 is read-only while CC1 captures, so park the channel in its
        // reset (output) mode to zero both the counter and the capture
        // register.
        self.tim.ccmr1_input().reset();
        self.tim.cnt.write(|w| w.cnt().bits(0));
        self.tim.ccr1().write(|w| w.ccr().bits(0));

        match config.prescaler {
            ClockPrescaler::NoClock => {}
            ClockPrescaler::ExternalFalling => {
                self.tim.smcr.modify(|_, w| {
                    w.ece().enabled();
                    w.etp().set_bit()
                });
            }
            ClockPrescaler::ExternalRising => {
                self.tim.smcr.modify(|_, w| {
                    w.ece().enabled();
                    w.etp().clear_bit()
                });
            }
            _ => {
                let divisor = config.prescaler.divisor().unwrap_or(1) as u16;
                self.tim.smcr.modify(|_, w| w.ece().disabled());
                self.tim.psc.write(|w| w.psc().bits(divisor - 1));
            }
        }

        // CC1 in input mode latching on TI1, no input filter, every edge.
        self.tim.ccmr1_input().modify(|_, w| {
            w.cc1s().ti1();
            w.ic1f().bits(0);
            unsafe { w.ic1psc().bits(0) };
            w
        });
        self.set_edge(config.edge);

        // Free-run over the full 16-bit range.
        self.tim.cr1.modify(|_, w| w.arpe().disabled());
        self.tim.arr.write(|w| w.arr().bits(0xFFFF));

        self.tim.ccer.modify(|_, w| w.cc1e().set_bit());
        self.tim.dier.modify(|_, w| w.cc1ie().enabled());
        if !matches!(config.prescaler, ClockPrescaler::NoClock) {
            self.tim.cr1.modify(|_, w| w.cen().enabled());
        }
    }

    fn set_edge(&mut self, edge: EdgePolarity) {
        // In capture mode CC1NP:CC1P selects the transition, 00 rising and
        // 01 falling.
        self.tim.ccer.modify(|_, w| {
            w.cc1np().clear_bit();
            match edge {
                EdgePolarity::Rising => w.cc1p().clear_bit(),
                EdgePolarity::Falling => w.cc1p().set_bit(),
            }
        });
    }

    fn capture_value(&self) -> u16 {
        self.tim.ccr1().read().ccr().bits() as u16
    }

    fn clear_counter(&mut self) {
        self.tim.cnt.write(|w| w.cnt().bits(0));
    }

    fn clear_event(&mut self) {
        self.tim.sr.modify(|_, w| w.cc1if().clear_bit());
    }

    fn shutdown(&mut self) {
        self.tim.dier.modify(|_, w| w.cc1ie().disabled());
        self.tim.cr1.modify(|_, w| w.cen().disabled());
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());
        self.tim.ccmr1_input().reset();
        self.tim.cnt.write(|w| w.cnt().bits(0));
        self.tim.ccr1().write(|w| w.ccr().bits(0));
        self.tim.sr.modify(|_, w| w.cc1if().clear_bit());
    }
}
