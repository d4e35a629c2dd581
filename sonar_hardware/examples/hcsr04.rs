//! Range measurements without an RTOS: the capture unit runs from the raw
//! TIM4 interrupt and the main loop polls the sampler over semihosting.

#![no_main]
#![no_std]

use core::cell::RefCell;
use core::fmt::Write;
use core::mem::MaybeUninit;

use panic_halt as _;

use alloc_cortex_m::CortexMHeap;
use cortex_m::interrupt::Mutex;
use cortex_m_rt::entry;
use cortex_m_semihosting::hio;
use stm32f4xx_hal::{
    pac,
    pac::{interrupt, NVIC},
    prelude::*,
};

use echo_ranging::{CaptureConfig, CaptureUnit, EchoTimer, Hcsr04, PulseWidth};
use sonar_hardware::{capture::EchoCapture, SonarHardware};

#[global_allocator]
static ALLOCATOR: CortexMHeap = CortexMHeap::empty();

static PULSE_WIDTH: PulseWidth = PulseWidth::new();
static CAPTURE: Mutex<RefCell<Option<CaptureUnit<EchoCapture>>>> =
    Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Initialize heap
    {
        const HEAP_SIZE: usize = 1024;
        static mut HEAP: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { ALLOCATOR.init(HEAP.as_ptr() as usize, HEAP_SIZE) }
    }

    let dp = pac::Peripherals::take().expect("Failed to get device periph");
    let cp = cortex_m::peripheral::Peripherals::take().expect("Failed to get core periph");

    let mut stdout = hio::hstdout().map_err(|_| core::fmt::Error).unwrap();

    let board = SonarHardware::init(dp);
    let mut delay = cp.SYST.delay(&board.clocks);

    let mut capture = CaptureUnit::new(board.echo_capture);
    capture.init(CaptureConfig::default());
    EchoTimer::new(&PULSE_WIDTH).install(&mut capture);

    cortex_m::interrupt::free(|cs| {
        CAPTURE.borrow(cs).borrow_mut().replace(capture);
    });
    unsafe { NVIC::unmask(interrupt::TIM4) };

    let mut sampler = Hcsr04::new(board.trigger_pin, board.trigger_delay, &PULSE_WIDTH);

    loop {
        let distance = sampler.read_distance();
        writeln!(stdout, "distance: {} cm", distance).unwrap();
        delay.delay_ms(100_u32);
    }
}

#[interrupt]
fn TIM4() {
    cortex_m::interrupt::free(|cs| {
        if let Some(unit) = CAPTURE.borrow(cs).borrow_mut().as_mut() {
            unit.on_capture();
        }
    });
}
