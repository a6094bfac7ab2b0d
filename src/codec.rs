//! Seven segment digit codec
//!
//! Segment bits follow the display wiring, `a..g` on bits 0..6 with the
//! decimal point unused.

/// All segments off
pub const BLANK: u8 = 0x00;

/// Segment patterns for the digits 0-9
pub const DIGIT_PATTERNS: [u8; 10] = [
    0x3F, // 0
    0x30, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x07, // 7
    0x7F, // 8
    0x6F, // 9
];

/// Splits a 0-999 value into its hundreds, tens and units digits
pub fn decompose(value: i16) -> [u8; 3] {
    debug_assert!((0..=999).contains(&value), "value outside 0..=999");

    let hundreds = value / 100;
    let tens = (value - hundreds * 100) / 10;
    let units = value - (hundreds * 100 + tens * 10);

    [hundreds as u8, tens as u8, units as u8]
}

/// Inverse of [`decompose`]; each digit must already be 0-9
pub fn compose(digits: [u8; 3]) -> i16 {
    let [hundreds, tens, units] = digits;
    i16::from(hundreds) * 100 + i16::from(tens) * 10 + i16::from(units)
}

/// Looks up the segment pattern of a digit.
///
/// A zero is blanked when `blank_zero` is set, which is how leading zeros
/// are hidden. Anything outside 0-9 renders blank.
pub fn segment_pattern(digit: u8, blank_zero: bool) -> u8 {
    match digit {
        0 if blank_zero => BLANK,
        _ => DIGIT_PATTERNS.get(usize::from(digit)).copied().unwrap_or(BLANK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_inverts_decompose() {
        for value in 0..=999 {
            assert_eq!(compose(decompose(value)), value);
        }
    }

    #[test]
    fn decompose_orders_digits_most_significant_first() {
        assert_eq!(decompose(407), [4, 0, 7]);
        assert_eq!(decompose(5), [0, 0, 5]);
        assert_eq!(decompose(999), [9, 9, 9]);
    }

    #[test]
    fn zero_is_blank_only_when_requested() {
        assert_eq!(segment_pattern(0, true), BLANK);
        assert_eq!(segment_pattern(0, false), 0x3F);
        assert_eq!(segment_pattern(8, true), 0x7F);
    }

    #[test]
    fn out_of_range_digit_is_blank() {
        assert_eq!(segment_pattern(10, false), BLANK);
    }
}
