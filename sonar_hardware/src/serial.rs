use stm32f4xx_hal::{
    gpio::{Alternate, Pin},
    pac::USART1,
    serial::Tx,
};

pub type DebugTxPin = Pin<'A', 9, Alternate<7>>;

pub type DebugSerialPort = Tx<USART1>;
