//! Configuration constants for the UV exposure controller

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Rate of the Timer1 compare interrupt in Hz
pub const TICK_HZ: u8 = 2;

/// Timer1 compare value for `TICK_HZ` with the /256 prescaler
pub const TICK_COMPARE: u16 = (CPU_FREQ_HZ / 256 / TICK_HZ as u32 - 1) as u16;

/// Shortest exposure that can be committed, in seconds
pub const MINIMUM_TIME: i16 = 5;

/// Longest exposure the three digit display can show, in seconds
pub const MAXIMUM_TIME: i16 = 999;

/// Buzzer steps for an aborted exposure
pub const SHORT_BEEP_STEPS: u8 = 2;

/// Buzzer steps for a completed exposure
pub const LONG_BEEP_STEPS: u8 = 6;

/// Time each multiplexed digit stays lit
pub const DIGIT_DWELL_MS: u8 = 2;

/// Data line setup time before a shift clock edge
pub const BIT_SETUP_US: u8 = 2;

/// Width of the shift and latch clock pulses
pub const CLOCK_PULSE_US: u8 = 5;

/// Wait after power up before anything is sampled
pub const BOOT_SETTLE_MS: u16 = 1000;

/// Watchdog timeout period in milliseconds
pub const WDT_TIMEOUT_MS: u16 = 4000;

/// EEPROM address of the committed exposure duration
pub const DURATION_ADDRESS: u16 = 0;

/// UART baud rate of the debug console
pub const UART_BAUD: u32 = 9600;
