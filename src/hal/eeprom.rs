//! On-chip EEPROM

use avr_device::atmega328p::EEPROM;
use core::convert::Infallible;

use crate::store::WordStorage;

// EECR bits
const EERE: u8 = 0x01;
const EEPE: u8 = 0x02;
const EEMPE: u8 = 0x04;

pub struct Eeprom {
    _private: (),
}

impl Eeprom {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Completes once no write is in progress
    fn ready(&self) -> nb::Result<(), Infallible> {
        let busy = unsafe { (*EEPROM::ptr()).eecr.read().bits() } & EEPE != 0;
        if busy {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    pub fn read_byte(&mut self, address: u16) -> Result<u8, Infallible> {
        nb::block!(self.ready())?;

        unsafe {
            let p = EEPROM::ptr();
            (*p).eear.write(|w| w.bits(address));
            (*p).eecr.write(|w| w.bits(EERE));
            Ok((*p).eedr.read().bits())
        }
    }

    /// Erases and programs one byte, about 3.4ms
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), Infallible> {
        nb::block!(self.ready())?;

        // EEPE has to follow EEMPE within four cycles
        avr_device::interrupt::free(|_| unsafe {
            let p = EEPROM::ptr();
            (*p).eear.write(|w| w.bits(address));
            (*p).eedr.write(|w| w.bits(value));
            (*p).eecr.write(|w| w.bits(EEMPE));
            (*p).eecr.write(|w| w.bits(EEMPE | EEPE));
        });
        Ok(())
    }
}

impl Default for Eeprom {
    fn default() -> Self {
        Self::new()
    }
}

/// Words are little endian, low byte first
impl WordStorage for Eeprom {
    type Error = Infallible;

    fn read_word(&mut self, address: u16) -> Result<u16, Infallible> {
        let low = self.read_byte(address)?;
        let high = self.read_byte(address + 1)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    fn write_word(&mut self, address: u16, value: u16) -> Result<(), Infallible> {
        let [low, high] = value.to_le_bytes();
        self.write_byte(address, low)?;
        self.write_byte(address + 1, high)
    }
}
