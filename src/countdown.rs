//! Timekeeping driven by the 2 Hz tick
//!
//! Everything in here is shared with the tick interrupt and must only be
//! touched from the main loop through [`crate::sync::TickCell::lock`].

/// State shared between the tick interrupt and the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    time: i16,
    timer_counter: u8,
    buzzer_counter: u8,
    running: bool,
}

impl Countdown {
    pub const fn new(time: i16) -> Self {
        Self {
            time,
            timer_counter: 0,
            buzzer_counter: 0,
            running: false,
        }
    }

    /// Advances the tick phase, called from the tick interrupt.
    ///
    /// Every second tick is a one second boundary that decrements `time`
    /// while running. Returns the level the buzzer must be driven to, or
    /// `None` when the buzzer is idle and must be left alone.
    pub fn tick(&mut self) -> Option<bool> {
        self.timer_counter += 1;

        if self.timer_counter >= 2 {
            self.timer_counter = 0;

            if self.running && self.time > 0 {
                self.time -= 1;
            }
        }

        if self.buzzer_counter == 0 {
            return None;
        }

        self.buzzer_counter -= 1;
        if self.buzzer_counter == 0 {
            Some(false)
        } else {
            Some(self.timer_counter % 2 == 1)
        }
    }

    /// Starts a beep of `steps` ticks; the caller drives the buzzer on
    pub fn beep(&mut self, steps: u8) {
        self.timer_counter = 1;
        self.buzzer_counter = steps;
    }

    /// Restarts the second so the next boundary is a full second away
    pub fn reset_phase(&mut self) {
        self.timer_counter = 0;
    }

    pub fn set_time(&mut self, time: i16) {
        self.time = time;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn time(&self) -> i16 {
        self.time
    }

    /// True during the half second in which blinking digits are dark
    pub fn blink_phase(&self) -> bool {
        self.timer_counter == 1
    }

    /// Remaining buzzer steps, 0 when silent
    pub fn buzzer_steps(&self) -> u8 {
        self.buzzer_counter
    }
}
