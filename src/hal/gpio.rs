use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::debounce::pack_lines;
use crate::display::{DigitSelect, DIGIT_ENABLE_MASK};

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE: PinMode> Pin<PORT, P, MODE> {
    /// Creates a handle to the pin without configuring it.
    ///
    /// # Safety
    ///
    /// Two handles to the same pin must never be used from contexts that
    /// can preempt each other.
    pub const unsafe fn steal() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit, start low
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and enable pull-up
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }

        impl<const P: u8> InputPin for Pin<$PORT, P, Input> {
            type Error = Infallible;

            #[inline]
            fn is_high(&self) -> Result<bool, Infallible> {
                Ok(unsafe { (*$PORT::ptr()).$pin.read().bits() } & (1 << P) != 0)
            }

            #[inline]
            fn is_low(&self) -> Result<bool, Infallible> {
                self.is_high().map(|high| !high)
            }
        }
    };
}

impl_port!(PORTB, portb, ddrb, pinb);
impl_port!(PORTC, portc, ddrc, pinc);
impl_port!(PORTD, portd, ddrd, pind);

/// Digit enable lines PB3..PB5, written as one masked port update
pub struct DigitEnables {
    _port: PhantomData<PORTB>,
}

impl DigitEnables {
    pub fn new() -> Self {
        unsafe {
            let p = PORTB::ptr();
            (*p).portb.modify(|r, w| w.bits(r.bits() & !DIGIT_ENABLE_MASK));
            (*p).ddrb.modify(|r, w| w.bits(r.bits() | DIGIT_ENABLE_MASK));
        }
        Self { _port: PhantomData }
    }
}

impl Default for DigitEnables {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitSelect for DigitEnables {
    #[inline]
    fn select(&mut self, mask: u8) {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| {
                w.bits((r.bits() & !DIGIT_ENABLE_MASK) | (mask & DIGIT_ENABLE_MASK))
            });
        }
    }
}

/// Button and lid switch lines PC0..PC3
pub struct FrontPanel {
    start: board::StartButton,
    stop: board::StopButton,
    set: board::SetButton,
    lid: board::LidSwitch,
}

impl FrontPanel {
    pub fn new(
        start: board::StartButton,
        stop: board::StopButton,
        set: board::SetButton,
        lid: board::LidSwitch,
    ) -> Self {
        Self {
            start,
            stop,
            set,
            lid,
        }
    }

    /// One sample of all monitored lines
    pub fn read(&self) -> u8 {
        let high = |line: Result<bool, Infallible>| line.unwrap_or(false);

        pack_lines(
            high(self.start.is_high()),
            high(self.stop.is_high()),
            high(self.set.is_high()),
            high(self.lid.is_high()),
        )
    }
}

// UV box wiring on an ATmega328P board
pub mod board {
    use super::*;

    // 74HC595 bus (PORTB)
    pub type ShiftData = Pin<PORTB, 0, Output>;
    pub type ShiftClock = Pin<PORTB, 1, Output>;
    pub type LatchClock = Pin<PORTB, 2, Output>;

    // Front panel (PORTC)
    pub type StartButton = Pin<PORTC, 0, Input>;
    pub type StopButton = Pin<PORTC, 1, Input>;
    pub type SetButton = Pin<PORTC, 2, Input>;
    pub type LidSwitch = Pin<PORTC, 3, Input>;

    // Actuators (PORTD)
    pub type RunIndicator = Pin<PORTD, 2, Output>;
    pub type Relay = Pin<PORTD, 3, Output>;
    pub type Buzzer = Pin<PORTD, 4, Output>;
}
