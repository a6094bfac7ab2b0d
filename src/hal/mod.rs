//! ATmega328P peripherals used by the firmware

pub mod eeprom;
pub mod gpio;
pub mod timer;
pub mod uart;
pub mod watchdog;

// Re-export commonly used types
pub use eeprom::Eeprom;
pub use gpio::board;
pub use gpio::{DigitEnables, FrontPanel, Input, Output, Pin};
pub use timer::{Delay, Prescaler, TickTimer};
pub use uart::Uart;
pub use watchdog::{Watchdog, WatchdogTimeout};
