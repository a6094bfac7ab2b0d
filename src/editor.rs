//! Single digit editing of the pending duration

use ufmt::derive::uDebug;

use crate::codec::{compose, decompose};

/// Decimal place being edited, left to right on the display
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Place {
    Hundreds,
    Tens,
    Units,
}

impl Place {
    /// Display position, 0 for the leftmost digit
    pub const fn index(self) -> usize {
        match self {
            Place::Hundreds => 0,
            Place::Tens => 1,
            Place::Units => 2,
        }
    }

    /// The place to the right, `None` after the units digit
    pub const fn next(self) -> Option<Place> {
        match self {
            Place::Hundreds => Some(Place::Tens),
            Place::Tens => Some(Place::Units),
            Place::Units => None,
        }
    }
}

/// Reads the digit of `time` at `place`
pub fn extract_digit(time: i16, place: Place) -> u8 {
    decompose(time)[place.index()]
}

/// Replaces the digit of `time` at `place` with `value`
pub fn apply_digit(time: i16, place: Place, value: u8) -> i16 {
    debug_assert!(value <= 9);
    let mut digits = decompose(time);
    digits[place.index()] = value;
    compose(digits)
}

/// Next digit value, wrapping 9 to 0
pub const fn increment(digit: u8) -> u8 {
    if digit >= 9 {
        0
    } else {
        digit + 1
    }
}

/// Previous digit value, wrapping 0 to 9
pub const fn decrement(digit: u8) -> u8 {
    if digit == 0 {
        9
    } else {
        digit - 1
    }
}
