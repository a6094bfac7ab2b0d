//! Three digit seven segment display behind a 74HC595
//!
//! Segment data is bit-banged into the shift register and latched, then one
//! digit enable line is asserted for the dwell time. The whole refresh
//! blocks the main loop for about `3 * DIGIT_DWELL_MS`.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;

use crate::codec::{decompose, segment_pattern};
use crate::config::{BIT_SETUP_US, CLOCK_PULSE_US, DIGIT_DWELL_MS};
use crate::controller::Mode;
use crate::editor::Place;

/// Bit offset of the first digit enable line on its port
pub const DIGIT_ENABLE_SHIFT: u8 = 3;

/// All digit enable lines
pub const DIGIT_ENABLE_MASK: u8 = 0b111 << DIGIT_ENABLE_SHIFT;

/// Drives the digit enable lines.
///
/// `mask` is either 0 or a single `1 << (position + DIGIT_ENABLE_SHIFT)`.
pub trait DigitSelect {
    fn select(&mut self, mask: u8);
}

/// Enable mask of the digit at `position`, or 0 while it is blinked off
pub fn digit_enable(position: usize, mode: Mode, place: Place, blink_phase: bool) -> u8 {
    let dark = blink_phase
        && match mode {
            Mode::Edit => position == place.index(),
            Mode::Pause => true,
            Mode::Idle | Mode::Run => false,
        };

    if dark {
        0
    } else {
        1 << (position as u8 + DIGIT_ENABLE_SHIFT)
    }
}

/// What one refresh puts on the display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub segments: [u8; 3],
    pub enables: [u8; 3],
}

impl Frame {
    pub fn compose(mode: Mode, time: i16, place: Place, blink_phase: bool) -> Self {
        let digits = decompose(time);
        let editing = mode == Mode::Edit;
        // Leading zeros stay dark outside edit mode
        let shown = [time > 99, time > 9, true];

        let mut segments = [0; 3];
        let mut enables = [0; 3];
        for position in 0..3 {
            segments[position] = segment_pattern(digits[position], !editing && !shown[position]);
            enables[position] = digit_enable(position, mode, place, blink_phase);
        }

        Self { segments, enables }
    }
}

pub struct SegmentDisplay<SER, SCK, RCK, SEL, D> {
    data: SER,
    shift_clock: SCK,
    latch_clock: RCK,
    select: SEL,
    delay: D,
}

impl<SER, SCK, RCK, SEL, D, E> SegmentDisplay<SER, SCK, RCK, SEL, D>
where
    SER: OutputPin<Error = E>,
    SCK: OutputPin<Error = E>,
    RCK: OutputPin<Error = E>,
    SEL: DigitSelect,
    D: DelayUs<u8> + DelayMs<u8>,
{
    pub fn new(data: SER, shift_clock: SCK, latch_clock: RCK, select: SEL, delay: D) -> Self {
        Self {
            data,
            shift_clock,
            latch_clock,
            select,
            delay,
        }
    }

    /// Shows each digit of `frame` for the dwell time, then blanks
    pub fn refresh(&mut self, frame: &Frame) -> Result<(), E> {
        for (&segments, &enable) in frame.segments.iter().zip(frame.enables.iter()) {
            self.select.select(0);
            self.render_digit(segments)?;
            self.select.select(enable);
            self.delay.delay_ms(DIGIT_DWELL_MS);
        }

        self.blank();
        Ok(())
    }

    /// Shifts `pattern` out MSB first and latches it onto the outputs
    pub fn render_digit(&mut self, pattern: u8) -> Result<(), E> {
        self.idle_bus()?;

        for bit in (0..8).rev() {
            if pattern & (1 << bit) != 0 {
                self.data.set_high()?;
            }
            self.delay.delay_us(BIT_SETUP_US);

            self.shift_clock.set_high()?;
            self.delay.delay_us(CLOCK_PULSE_US);
            self.idle_bus()?;
            self.delay.delay_us(BIT_SETUP_US);
        }

        self.latch_clock.set_high()?;
        self.delay.delay_us(CLOCK_PULSE_US);
        self.idle_bus()
    }

    /// Turns every digit off
    pub fn blank(&mut self) {
        self.select.select(0);
    }

    /// Gives the pins and delay back
    pub fn release(self) -> (SER, SCK, RCK, SEL, D) {
        (self.data, self.shift_clock, self.latch_clock, self.select, self.delay)
    }

    fn idle_bus(&mut self) -> Result<(), E> {
        self.data.set_low()?;
        self.shift_clock.set_low()?;
        self.latch_clock.set_low()
    }
}
