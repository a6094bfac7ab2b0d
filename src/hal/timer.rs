use avr_device::atmega328p::{TC0, TC1};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::TICK_COMPARE;
use crate::sync::TickInterrupt;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

const PRESCALER_MASK: u8 = 0x07;

// TCCR1B: CTC on OCR1A
const WGM12: u8 = 0x08;

// TIMSK1: compare A interrupt enable
const OCIE1A: u8 = 0x02;

/// Timer1 in CTC mode, raising TIMER1_COMPA at `TICK_HZ`
pub struct TickTimer {
    _private: (),
}

impl TickTimer {
    /// Takes Timer1 and leaves it stopped
    pub fn new() -> Self {
        let mut timer = Self { _private: () };
        timer.stop();
        timer
    }

    pub fn start(&mut self) {
        unsafe {
            let p = TC1::ptr();
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).ocr1a.write(|w| w.bits(TICK_COMPARE));
            (*p).tccr1a.write(|w| w.bits(0));
            (*p).tccr1b.write(|w| w.bits(WGM12 | Prescaler::Div256 as u8));
            (*p).timsk1.modify(|r, w| w.bits(r.bits() | OCIE1A));
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            let p = TC1::ptr();
            (*p).timsk1.modify(|r, w| w.bits(r.bits() & !OCIE1A));
            (*p).tccr1b.write(|w| w.bits(0));
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TickInterrupt for TickTimer {
    #[inline]
    fn disable(&mut self) -> bool {
        unsafe {
            let p = TC1::ptr();
            let was_enabled = (*p).timsk1.read().bits() & OCIE1A != 0;
            (*p).timsk1.modify(|r, w| w.bits(r.bits() & !OCIE1A));
            was_enabled
        }
    }

    #[inline]
    fn enable(&mut self) {
        unsafe {
            (*TC1::ptr()).timsk1.modify(|r, w| w.bits(r.bits() | OCIE1A));
        }
    }
}

/// Busy-wait delays on Timer0
///
/// Timer0 runs at 16MHz/8 = 2MHz while a delay is in progress, so one
/// count is half a microsecond.
pub struct Delay {
    _private: (),
}

impl Delay {
    // Largest chunk that still fits the 8 bit counter
    const CHUNK_US: u8 = 100;

    pub fn new() -> Self {
        unsafe {
            let p = TC0::ptr();
            // Normal mode, stopped
            (*p).tccr0a.write(|w| w.bits(0));
            (*p).tccr0b.write(|w| w.bits(Prescaler::Stop as u8));
        }
        Self { _private: () }
    }

    fn wait_counts(&mut self, counts: u8) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(0));
            (*p).tccr0b.modify(|r, w| {
                w.bits((r.bits() & !PRESCALER_MASK) | Prescaler::Div8 as u8)
            });

            while (*p).tcnt0.read().bits() < counts {}

            (*p).tccr0b.modify(|r, w| w.bits(r.bits() & !PRESCALER_MASK));
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayUs<u8> for Delay {
    fn delay_us(&mut self, us: u8) {
        let mut left = us;
        while left > 0 {
            let chunk = left.min(Self::CHUNK_US);
            self.wait_counts(chunk * 2);
            left -= chunk;
        }
    }
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u16>::delay_ms(self, u16::from(ms));
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            for _ in 0..10 {
                self.delay_us(Self::CHUNK_US);
            }
        }
    }
}
