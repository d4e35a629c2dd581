#![no_std]

use stm32f4xx_hal::{
    gpio::{Output, Pin, PushPull},
    pac::{Peripherals, TIM5},
    prelude::*,
    rcc::Clocks,
    timer::Delay,
};

pub mod capture;
pub mod led;
pub mod serial;

use capture::{EchoCapture, EchoPin};
use led::{BlueLed, GreenLed, OrangeLed, RedLed};
use serial::{DebugSerialPort, DebugTxPin};

pub const SYSCLK_HZ: u32 = 32_000_000;

/// HC-SR04 trigger output.
pub type TriggerPin = Pin<'B', 11, Output<PushPull>>;

/// Microsecond delay used for the trigger pulse width.
pub type TriggerDelay = Delay<TIM5, 1_000_000>;

pub struct SonarHardware {
    pub clocks: Clocks,
    pub trigger_delay: TriggerDelay,

    pub green_led: GreenLed,
    pub orange_led: OrangeLed,
    pub red_led: RedLed,
    pub blue_led: BlueLed,

    pub dbg_serial: DebugSerialPort,

    pub trigger_pin: TriggerPin,
    pub echo_capture: EchoCapture,
}

impl SonarHardware {
    pub fn init(pac: Peripherals) -> Self {
        // TIM4's bus clock has to be running before the capture driver
        // touches its registers; the HAL only switches it on for its own
        // timer drivers.
        pac.RCC.apb1enr.modify(|_, w| w.tim4en().enabled());

        let rcc = pac.RCC.constrain();
        // APB1 at 4 MHz doubles to an 8 MHz timer kernel clock, so the Div8
        // capture prescaler lands exactly on 1 us ticks.
        let clocks = rcc
            .cfgr
            .sysclk(SYSCLK_HZ.Hz())
            .pclk1(4.MHz())
            .freeze();

        let gpioa = pac.GPIOA.split();
        let gpiob = pac.GPIOB.split();
        let gpiod = pac.GPIOD.split();

        // Status LED's
        let green_led = gpiod.pd12.into_push_pull_output();
        let orange_led = gpiod.pd13.into_push_pull_output();
        let red_led = gpiod.pd14.into_push_pull_output();
        let blue_led = gpiod.pd15.into_push_pull_output();

        let debug_tx_pin: DebugTxPin = gpioa.pa9.into_alternate();
        let dbg_serial = pac.USART1.tx(debug_tx_pin, 115200.bps(), &clocks).unwrap();

        let trigger_pin = gpiob.pb11.into_push_pull_output();
        let echo_pin: EchoPin = gpiob.pb6.into_alternate();
        let echo_capture = EchoCapture::new(pac.TIM4, echo_pin);

        let trigger_delay = pac.TIM5.delay_us(&clocks);

        Self {
            clocks,
            trigger_delay,
            green_led,
            orange_led,
            red_led,
            blue_led,
            dbg_serial,
            trigger_pin,
            echo_capture,
        }
    }
}
