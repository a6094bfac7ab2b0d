//! Edge detection for the front panel buttons and the lid switch
//!
//! The input port is sampled once per main loop iteration. A button counts
//! as pressed when its line reads high now and read low on the previous
//! sample; the refresh of the display between samples is the debounce.

/// Sample bit of the lid switch, high while the lid is open
pub const LID_OPEN: u8 = 1 << 3;

/// Sample bits of every monitored line
pub const INPUT_MASK: u8 = 0x0F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    /// Start an exposure, or increment the digit being edited
    Start,
    /// Abort an exposure, or decrement the digit being edited
    Stop,
    /// Enter edit mode and step through the digits
    Set,
}

impl Button {
    /// Buttons in the order their edges are handled
    pub const ALL: [Button; 3] = [Button::Start, Button::Stop, Button::Set];

    pub const fn mask(self) -> u8 {
        match self {
            Button::Start => 1 << 0,
            Button::Stop => 1 << 1,
            Button::Set => 1 << 2,
        }
    }
}

/// Packs line levels into a raw sample for [`Debouncer::sample`]
pub fn pack_lines(start: bool, stop: bool, set: bool, lid_open: bool) -> u8 {
    let line = |high: bool, mask: u8| if high { mask } else { 0 };

    line(start, Button::Start.mask())
        | line(stop, Button::Stop.mask())
        | line(set, Button::Set.mask())
        | line(lid_open, LID_OPEN)
}

/// Debounced view of one input sample
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Inputs {
    edges: u8,
    lid_open: bool,
}

impl Inputs {
    pub fn pressed(&self, button: Button) -> bool {
        self.edges & button.mask() != 0
    }

    /// Buttons with a fresh edge, in handling order
    pub fn presses(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(move |b| self.pressed(*b))
    }

    pub fn lid_open(&self) -> bool {
        self.lid_open
    }
}

pub struct Debouncer {
    last: u8,
}

impl Debouncer {
    /// Starts from `initial` so lines already high at boot do not fire
    pub fn new(initial: u8) -> Self {
        Self {
            last: initial & INPUT_MASK,
        }
    }

    pub fn sample(&mut self, raw: u8) -> Inputs {
        let raw = raw & INPUT_MASK;
        let edges = raw & !self.last;
        self.last = raw;

        Inputs {
            edges,
            lid_open: raw & LID_OPEN != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_lines_follow_sample_bits() {
        assert_eq!(pack_lines(false, false, false, false), 0);
        assert_eq!(pack_lines(true, false, true, false), 0b0101);
        assert_eq!(pack_lines(false, true, false, true), Button::Stop.mask() | LID_OPEN);

        let inputs = Debouncer::new(0).sample(pack_lines(false, false, true, true));
        assert!(inputs.pressed(Button::Set));
        assert!(inputs.lid_open());
    }

    #[test]
    fn rising_line_is_reported_once() {
        let mut debouncer = Debouncer::new(0);

        assert!(debouncer.sample(Button::Set.mask()).pressed(Button::Set));
        assert!(!debouncer.sample(Button::Set.mask()).pressed(Button::Set));
        assert!(!debouncer.sample(0).pressed(Button::Set));
        assert!(debouncer.sample(Button::Set.mask()).pressed(Button::Set));
    }

    #[test]
    fn lines_high_at_boot_do_not_fire() {
        let mut debouncer = Debouncer::new(INPUT_MASK);
        let inputs = debouncer.sample(INPUT_MASK);

        assert_eq!(inputs.presses().count(), 0);
        assert!(inputs.lid_open());
    }

    #[test]
    fn presses_keep_handling_order() {
        let mut debouncer = Debouncer::new(0);
        let inputs = debouncer.sample(Button::Set.mask() | Button::Start.mask());

        let mut presses = inputs.presses();
        assert_eq!(presses.next(), Some(Button::Start));
        assert_eq!(presses.next(), Some(Button::Set));
        assert_eq!(presses.next(), None);
    }

    #[test]
    fn lid_is_a_level_not_an_edge() {
        let mut debouncer = Debouncer::new(0);

        assert!(debouncer.sample(LID_OPEN).lid_open());
        assert!(debouncer.sample(LID_OPEN).lid_open());
        assert!(!debouncer.sample(0).lid_open());
    }

    #[test]
    fn unmonitored_bits_are_ignored() {
        let mut debouncer = Debouncer::new(0);
        assert_eq!(debouncer.sample(0xF0), Inputs::default());
    }
}
