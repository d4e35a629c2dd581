//! Swappable `log` backends. defmt wins when both logger features are
//! enabled; a `serial_logger`-only build routes records out the debug UART.

#[cfg(feature = "defmt_logger")]
pub mod defmt_logger;

#[cfg(all(feature = "serial_logger", not(feature = "defmt_logger")))]
pub mod serial_logger;

pub use log::Level;
