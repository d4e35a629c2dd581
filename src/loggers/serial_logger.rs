use core::fmt::Write;

use log::{Level, Metadata, Record};
use sonar_hardware::serial::DebugSerialPort;

struct SerialLogger;

static SERIAL_LOGGER: SerialLogger = SerialLogger;
static mut PORT: Option<DebugSerialPort> = None;
static mut LEVEL: Level = Level::Debug;

pub fn init(port: DebugSerialPort, level: Level) {
    unsafe {
        PORT = Some(port);
        LEVEL = level;
    }
    log::set_logger(&SERIAL_LOGGER).unwrap();
    log::set_max_level(level.to_level_filter());
}

impl log::Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        unsafe { metadata.level() <= LEVEL }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Single writer: records only come from thread mode, and the
            // port is parked here for the lifetime of the program.
            unsafe {
                if let Some(tx) = PORT.as_mut() {
                    writeln!(tx, "{}: {}\r", record.level(), record.args()).ok();
                }
            }
        }
    }

    fn flush(&self) {}
}
