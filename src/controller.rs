//! Operating state machine of the exposure box
//!
//! [`transition`] is a pure function of the current mode, one event and a
//! snapshot of the data it guards on. It returns the next mode and the list
//! of actions to apply; [`Controller`] applies them to the shared countdown
//! and forwards hardware side effects to a [`Board`].

use heapless::Vec;
use ufmt::derive::uDebug;

use crate::config::{LONG_BEEP_STEPS, MINIMUM_TIME, SHORT_BEEP_STEPS};
use crate::countdown::Countdown;
use crate::debounce::{Button, Inputs};
use crate::editor::{self, Place};

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Mode {
    Idle,
    Edit,
    Run,
    Pause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Event {
    Start,
    Stop,
    Set,
    /// Countdown reached zero while running
    Expired,
    LidOpened,
    LidClosed,
}

impl From<Button> for Event {
    fn from(button: Button) -> Self {
        match button {
            Button::Start => Event::Start,
            Button::Stop => Event::Stop,
            Button::Set => Event::Set,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Beep {
    /// Exposure aborted by the operator
    Short,
    /// Exposure completed
    Long,
}

impl Beep {
    pub const fn steps(self) -> u8 {
        match self {
            Beep::Short => SHORT_BEEP_STEPS,
            Beep::Long => LONG_BEEP_STEPS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Load the live countdown value
    LoadTime(i16),
    /// Restart the tick phase
    ResetPhase,
    /// Move the editor to a place
    EditPlace(Place),
    /// Make a duration the configured target and persist it
    Commit(i16),
    /// Drive the exposure relay and run indicator
    Exposure(bool),
    /// Start the buzzer pattern
    Beep(Beep),
}

/// Worst case is an abort: relay, time, beep
pub type Actions = Vec<Action, 4>;

/// Data the transition table guards on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub time: i16,
    pub target: i16,
    pub place: Place,
}

/// Hardware side of the state machine
pub trait Board {
    fn set_exposure(&mut self, on: bool);

    fn set_buzzer(&mut self, on: bool);

    /// Stores a committed duration
    fn persist(&mut self, duration: i16);

    /// Called after every accepted event
    fn transitioned(&mut self, _from: Mode, _event: Event, _to: Mode) {}
}

fn actions<const N: usize>(list: [Action; N]) -> Actions {
    list.into_iter().collect()
}

/// Looks up the transition table. Events with no row leave the mode
/// unchanged and produce no actions.
pub fn transition(mode: Mode, event: Event, snapshot: &Snapshot) -> (Mode, Actions) {
    match (mode, event) {
        (Mode::Idle, Event::Start) => (
            Mode::Run,
            actions([
                Action::LoadTime(snapshot.target),
                Action::ResetPhase,
                Action::Exposure(true),
            ]),
        ),
        (Mode::Idle, Event::Set) => (Mode::Edit, actions([Action::EditPlace(Place::Hundreds)])),
        (Mode::Edit, Event::Start | Event::Stop) => {
            let digit = editor::extract_digit(snapshot.time, snapshot.place);
            let digit = if event == Event::Start {
                editor::increment(digit)
            } else {
                editor::decrement(digit)
            };
            (
                Mode::Edit,
                actions([
                    Action::LoadTime(editor::apply_digit(snapshot.time, snapshot.place, digit)),
                    Action::ResetPhase,
                ]),
            )
        }
        (Mode::Edit, Event::Set) => match snapshot.place.next() {
            Some(place) => (Mode::Edit, actions([Action::EditPlace(place)])),
            None => {
                let duration = snapshot.time.max(MINIMUM_TIME);
                (
                    Mode::Idle,
                    actions([
                        Action::LoadTime(duration),
                        Action::Commit(duration),
                        Action::EditPlace(Place::Hundreds),
                    ]),
                )
            }
        },
        (Mode::Run, Event::Stop) => (
            Mode::Idle,
            actions([
                Action::Exposure(false),
                Action::LoadTime(snapshot.target),
                Action::Beep(Beep::Short),
            ]),
        ),
        (Mode::Run, Event::Expired) => (
            Mode::Idle,
            actions([
                Action::Exposure(false),
                Action::LoadTime(snapshot.target),
                Action::Beep(Beep::Long),
            ]),
        ),
        (Mode::Run, Event::LidOpened) => (Mode::Pause, actions([Action::Exposure(false)])),
        (Mode::Pause, Event::LidClosed) => (Mode::Run, actions([Action::Exposure(true)])),
        _ => (mode, Actions::new()),
    }
}

pub struct Controller {
    mode: Mode,
    target: i16,
    place: Place,
}

impl Controller {
    pub fn new(target: i16) -> Self {
        Self {
            mode: Mode::Idle,
            target,
            place: Place::Hundreds,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> i16 {
        self.target
    }

    pub fn edit_place(&self) -> Place {
        self.place
    }

    /// Handles one main loop iteration worth of input.
    ///
    /// Button edges go first in Start, Stop, Set order, then countdown
    /// expiry, then the lid level.
    pub fn step<B: Board>(&mut self, inputs: &Inputs, countdown: &mut Countdown, board: &mut B) {
        for button in inputs.presses() {
            self.dispatch(button.into(), countdown, board);
        }

        if self.mode == Mode::Run && countdown.time() <= 0 {
            self.dispatch(Event::Expired, countdown, board);
        }

        if self.mode == Mode::Run && inputs.lid_open() {
            self.dispatch(Event::LidOpened, countdown, board);
        }

        if self.mode == Mode::Pause && !inputs.lid_open() {
            self.dispatch(Event::LidClosed, countdown, board);
        }
    }

    /// Runs a single event through the transition table and applies it
    pub fn dispatch<B: Board>(&mut self, event: Event, countdown: &mut Countdown, board: &mut B) {
        let snapshot = Snapshot {
            time: countdown.time(),
            target: self.target,
            place: self.place,
        };

        let (next, actions) = transition(self.mode, event, &snapshot);
        if next == self.mode && actions.is_empty() {
            return;
        }

        for action in actions {
            match action {
                Action::LoadTime(time) => countdown.set_time(time),
                Action::ResetPhase => countdown.reset_phase(),
                Action::EditPlace(place) => self.place = place,
                Action::Commit(duration) => {
                    self.target = duration;
                    board.persist(duration);
                }
                Action::Exposure(on) => board.set_exposure(on),
                Action::Beep(beep) => {
                    countdown.beep(beep.steps());
                    board.set_buzzer(true);
                }
            }
        }

        let previous = self.mode;
        self.mode = next;
        countdown.set_running(next == Mode::Run);
        board.transitioned(previous, event, next);
    }
}
