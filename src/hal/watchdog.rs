use avr_device::atmega328p::{CPU, WDT};

use crate::store;

// WDTCSR bits
const WDCE: u8 = 0x10;
const WDE: u8 = 0x08;

// MCUSR: watchdog reset flag, keeps the watchdog forced on while set
const WDRF: u8 = 0x08;

/// Prescaler encodings, WDP3 lives in bit 5
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0x00,
    Ms32 = 0x01,
    Ms64 = 0x02,
    Ms125 = 0x03,
    Ms250 = 0x04,
    Ms500 = 0x05,
    Ms1000 = 0x06,
    Ms2000 = 0x07,
    Ms4000 = 0x20,
    Ms8000 = 0x21,
}

pub struct Watchdog {
    _private: (),
}

impl Watchdog {
    #[inline]
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn start(&mut self, timeout: WatchdogTimeout) {
        avr_device::interrupt::free(|_| unsafe {
            let p = WDT::ptr();
            avr_device::asm::wdr();
            // Timed sequence: change enable, then system reset mode
            (*p).wdtcsr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(WDE | timeout as u8));
        });
    }

    #[inline]
    pub fn feed(&mut self) {
        avr_device::asm::wdr();
    }

    pub fn disable(&mut self) {
        avr_device::interrupt::free(|_| unsafe {
            avr_device::asm::wdr();
            (*CPU::ptr()).mcusr.modify(|r, w| w.bits(r.bits() & !WDRF));
            // Timed sequence to disable watchdog
            let p = WDT::ptr();
            (*p).wdtcsr.modify(|r, w| w.bits(r.bits() | WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(0x00));
        });
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl store::Watchdog for Watchdog {
    #[inline]
    fn feed(&mut self) {
        Watchdog::feed(self);
    }
}
