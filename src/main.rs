#![no_std]
#![no_main]

extern crate alloc;

mod loggers;

#[cfg(feature = "defmt_logger")]
use defmt_rtt as _;
#[cfg(feature = "defmt_logger")]
use panic_probe as _;

#[cfg(all(feature = "serial_logger", not(feature = "defmt_logger")))]
use panic_halt as _;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[rtic::app(device = stm32f4xx_hal::pac, dispatchers = [USART1, USART3])]
mod app {
    use super::*;

    use alloc_cortex_m::CortexMHeap;
    use log::info;
    use rtic_monotonics::systick::prelude::*;

    use echo_ranging::{CaptureConfig, CaptureUnit, EchoTimer, Hcsr04, PulseWidth};
    use sonar_hardware::{
        capture::EchoCapture,
        led::{BlueLed, RedLed},
        SonarHardware, TriggerDelay, TriggerPin, SYSCLK_HZ,
    };

    systick_monotonic!(Mono, 1000);

    #[global_allocator]
    static ALLOCATOR: CortexMHeap = CortexMHeap::empty();

    /// Written by the capture interrupt, read by the sampler task.
    static PULSE_WIDTH: PulseWidth = PulseWidth::new();

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        capture: CaptureUnit<EchoCapture>,
        sampler: Hcsr04<TriggerPin, TriggerDelay>,
        red_led: RedLed,
        blue_led: BlueLed,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local) {
        // Initialize heap
        {
            use core::mem::MaybeUninit;
            const HEAP_SIZE: usize = 1024;
            static mut HEAP: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
            unsafe { ALLOCATOR.init(HEAP.as_ptr() as usize, HEAP_SIZE) }
        }

        // set DBGMCU to allow wfi in idle function while using defmt
        ctx.device.DBGMCU.cr.modify(|_, w| {
            w.dbg_sleep().set_bit();
            w.dbg_standby().set_bit();
            w.dbg_stop().set_bit()
        });
        // enabling the dma1 clock keeps one AHB bus master active, which prevents SRAM from reading as 0's
        // https://github.com/probe-rs/probe-rs/issues/350#issuecomment-740550519
        ctx.device.RCC.ahb1enr.modify(|_, w| w.dma1en().enabled());

        let board = SonarHardware::init(ctx.device);
        Mono::start(ctx.core.SYST, SYSCLK_HZ);

        #[cfg(feature = "defmt_logger")]
        loggers::defmt_logger::init();
        #[cfg(all(feature = "serial_logger", not(feature = "defmt_logger")))]
        loggers::serial_logger::init(board.dbg_serial, loggers::Level::Info);

        info!("{} v{}", NAME, VERSION);

        let mut capture = CaptureUnit::new(board.echo_capture);
        capture.init(CaptureConfig::default());
        EchoTimer::new(&PULSE_WIDTH).install(&mut capture);

        let sampler = Hcsr04::new(board.trigger_pin, board.trigger_delay, &PULSE_WIDTH);

        sample::spawn().unwrap();
        heartbeat::spawn().unwrap();

        (
            Shared {},
            Local {
                capture,
                sampler,
                red_led: board.red_led,
                blue_led: board.blue_led,
            },
        )
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        info!("idle!");

        loop {
            rtic::export::wfi();
        }
    }

    /// One trigger/read cycle every 60ms, the sensor's recommended minimum
    /// measurement interval. The value read trails the trigger by one cycle.
    #[task(priority = 1, local = [sampler])]
    async fn sample(ctx: sample::Context) {
        loop {
            let distance = ctx.local.sampler.read_distance();
            info!("distance: {} cm", distance);
            Mono::delay(60.millis()).await;
        }
    }

    #[task(priority = 1, local = [blue_led])]
    async fn heartbeat(ctx: heartbeat::Context) {
        loop {
            ctx.local.blue_led.toggle();
            Mono::delay(500.millis()).await;
        }
    }

    /// Echo edge arrived: hand it to the capture unit, which runs the
    /// timing state machine callback.
    #[task(binds = TIM4, priority = 2, local = [capture, red_led])]
    fn echo_edge(ctx: echo_edge::Context) {
        ctx.local.red_led.toggle();
        ctx.local.capture.on_capture();
    }
}
