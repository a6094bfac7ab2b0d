use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use ufmt::uWrite;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Baud rate calculation, normal speed
const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

// UCSR0A: data register empty
const UDRE0: u8 = 0x20;
// UCSR0B: transmitter enable
const TXEN0: u8 = 0x08;
// UCSR0C: 8 data bits, no parity, 1 stop bit
const FORMAT_8N1: u8 = 0x06;

/// Transmit only USART0 on PD1; PD0 stays a plain input
pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0.write(|w| w.bits(UBRR));
            (*p).ucsr0c.write(|w| w.bits(FORMAT_8N1));
            (*p).ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & UDRE0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
            (*p).udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

impl uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            nb::block!(self.write_byte(byte))?;
        }
        Ok(())
    }
}
