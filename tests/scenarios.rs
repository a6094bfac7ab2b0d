use core::convert::Infallible;

use uv_exposure_timer::config::{LONG_BEEP_STEPS, MINIMUM_TIME, SHORT_BEEP_STEPS};
use uv_exposure_timer::debounce::{Button, LID_OPEN};
use uv_exposure_timer::store::{Watchdog, WordStorage};
use uv_exposure_timer::{
    Board, Controller, Countdown, Debouncer, DurationStore, Event, Frame, Mode, TickCell,
    TickInterrupt,
};

struct Eeprom(u16);

impl WordStorage for Eeprom {
    type Error = Infallible;

    fn read_word(&mut self, _address: u16) -> Result<u16, Infallible> {
        Ok(self.0)
    }

    fn write_word(&mut self, _address: u16, value: u16) -> Result<(), Infallible> {
        self.0 = value;
        Ok(())
    }
}

#[derive(Default)]
struct Feeds(usize);

impl Watchdog for Feeds {
    fn feed(&mut self) {
        self.0 += 1;
    }
}

struct Bench {
    exposure: bool,
    buzzer: bool,
    store: DurationStore<Eeprom>,
    watchdog: Feeds,
    log: Vec<(Mode, Event, Mode)>,
}

impl Bench {
    fn with_stored(word: u16) -> Self {
        Self {
            exposure: false,
            buzzer: false,
            store: DurationStore::new(Eeprom(word), 0),
            watchdog: Feeds::default(),
            log: Vec::new(),
        }
    }
}

impl Board for Bench {
    fn set_exposure(&mut self, on: bool) {
        self.exposure = on;
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer = on;
    }

    fn persist(&mut self, duration: i16) {
        self.store.commit(duration, &mut self.watchdog).unwrap();
    }

    fn transitioned(&mut self, from: Mode, event: Event, to: Mode) {
        self.log.push((from, event, to));
    }
}

#[derive(Default)]
struct FakeTick {
    enabled: bool,
}

impl TickInterrupt for FakeTick {
    fn disable(&mut self) -> bool {
        core::mem::replace(&mut self.enabled, false)
    }

    fn enable(&mut self) {
        self.enabled = true;
    }
}

/// Boots like the firmware and runs main loop iterations on demand
struct Rig {
    bench: Bench,
    controller: Controller,
    debouncer: Debouncer,
    countdown: TickCell<Countdown>,
    tick: FakeTick,
    lid: u8,
}

impl Rig {
    fn boot(stored: u16) -> Self {
        let mut bench = Bench::with_stored(stored);
        let target = bench.store.load();
        let countdown = TickCell::new(Countdown::new(target));

        Self {
            bench,
            controller: Controller::new(target),
            debouncer: Debouncer::new(0),
            countdown,
            tick: FakeTick { enabled: true },
            lid: 0,
        }
    }

    fn iterate(&mut self, raw: u8) -> Frame {
        let inputs = self.debouncer.sample(raw | self.lid);
        let mut countdown = self.countdown.lock(&mut self.tick);
        self.controller.step(&inputs, &mut countdown, &mut self.bench);
        Frame::compose(
            self.controller.mode(),
            countdown.time(),
            self.controller.edit_place(),
            countdown.blink_phase(),
        )
    }

    /// Press and release a button, one loop iteration each
    fn press(&mut self, button: Button) {
        self.iterate(button.mask());
        self.iterate(0);
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            // SAFETY: no guard is alive between iterations
            let countdown = unsafe { self.countdown.isr_borrow() };
            if let Some(on) = countdown.tick() {
                self.bench.buzzer = on;
            }
        }
    }

    fn seconds(&mut self, n: usize) {
        self.ticks(n * 2);
    }

    fn time(&mut self) -> i16 {
        self.countdown.lock(&mut self.tick).time()
    }

    fn buzzer_steps(&mut self) -> u8 {
        self.countdown.lock(&mut self.tick).buzzer_steps()
    }
}

#[test]
fn corrupt_store_boots_with_minimum() {
    let mut rig = Rig::boot(2000);

    assert_eq!(rig.controller.target(), MINIMUM_TIME);
    assert_eq!(rig.time(), MINIMUM_TIME);
    assert_eq!(rig.controller.mode(), Mode::Idle);
}

#[test]
fn stored_duration_survives_reboot() {
    let mut rig = Rig::boot(0xFFFF);
    rig.press(Button::Set);
    rig.press(Button::Start);
    rig.press(Button::Set);
    rig.press(Button::Set);
    rig.press(Button::Set);

    let word = rig.bench.store.release().0;
    let mut rig = Rig::boot(word);
    assert_eq!(rig.controller.target(), 105);
    assert_eq!(rig.time(), 105);
}

#[test]
fn wrapped_hundreds_digit_is_committed() {
    let mut rig = Rig::boot(2000);

    rig.press(Button::Set);
    assert_eq!(rig.controller.mode(), Mode::Edit);

    for _ in 0..4 {
        rig.press(Button::Start);
    }
    rig.press(Button::Set);
    rig.press(Button::Set);
    rig.press(Button::Set);

    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert_eq!(rig.controller.target(), 405);
    assert_eq!(rig.bench.store.load(), 405);
    assert_eq!(rig.bench.watchdog.0, 2);
}

#[test]
fn decrement_wraps_below_zero() {
    let mut rig = Rig::boot(0xFFFF);

    rig.press(Button::Set);
    rig.press(Button::Stop);
    assert_eq!(rig.time(), 905);
}

#[test]
fn commit_below_minimum_is_clamped() {
    let mut rig = Rig::boot(0xFFFF);

    rig.press(Button::Set);
    rig.press(Button::Set);
    rig.press(Button::Set);
    // 005 -> 002
    for _ in 0..3 {
        rig.press(Button::Stop);
    }
    assert_eq!(rig.time(), 2);
    rig.press(Button::Set);

    assert_eq!(rig.controller.target(), MINIMUM_TIME);
    assert_eq!(rig.time(), MINIMUM_TIME);
}

#[test]
fn completed_exposure_beeps_long_then_silences() {
    let mut rig = Rig::boot(5);

    rig.press(Button::Start);
    assert_eq!(rig.controller.mode(), Mode::Run);
    assert!(rig.bench.exposure);

    let mut previous = rig.time();
    for _ in 0..5 {
        assert_eq!(rig.controller.mode(), Mode::Run);
        rig.seconds(1);
        assert!(rig.time() <= previous);
        previous = rig.time();
        rig.iterate(0);
    }
    assert_eq!(previous, 0);

    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert!(!rig.bench.exposure);
    assert!(rig.bench.buzzer);
    assert_eq!(rig.buzzer_steps(), LONG_BEEP_STEPS);
    assert_eq!(rig.time(), 5);

    let mut toggles = 0;
    let mut level = rig.bench.buzzer;
    for _ in 0..LONG_BEEP_STEPS {
        rig.ticks(1);
        if rig.bench.buzzer != level {
            toggles += 1;
            level = rig.bench.buzzer;
        }
    }
    assert!(toggles >= 5);
    assert!(!rig.bench.buzzer);
    assert_eq!(rig.buzzer_steps(), 0);
}

#[test]
fn lid_opened_at_completion_still_finishes() {
    let mut rig = Rig::boot(5);

    rig.press(Button::Start);
    rig.seconds(5);
    assert_eq!(rig.time(), 0);

    rig.lid = LID_OPEN;
    rig.iterate(0);

    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert!(!rig.bench.exposure);
    assert_eq!(rig.buzzer_steps(), LONG_BEEP_STEPS);
    assert_eq!(
        rig.bench.log,
        [
            (Mode::Idle, Event::Start, Mode::Run),
            (Mode::Run, Event::Expired, Mode::Idle)
        ]
    );

    // Closing the lid afterwards does not restart anything
    rig.lid = 0;
    rig.iterate(0);
    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert_eq!(rig.bench.log.len(), 2);
}

#[test]
fn stop_aborts_with_short_beep() {
    let mut rig = Rig::boot(30);

    rig.press(Button::Start);
    rig.seconds(4);
    assert_eq!(rig.time(), 26);

    rig.press(Button::Stop);
    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert!(!rig.bench.exposure);
    assert_eq!(rig.buzzer_steps(), SHORT_BEEP_STEPS);
    assert_eq!(rig.time(), 30);

    rig.seconds(1);
    assert!(!rig.bench.buzzer);
    assert_eq!(rig.buzzer_steps(), 0);
}

#[test]
fn lid_pauses_without_losing_time() {
    let mut rig = Rig::boot(60);

    rig.press(Button::Start);
    rig.seconds(10);
    assert_eq!(rig.time(), 50);

    rig.lid = LID_OPEN;
    rig.iterate(0);
    assert_eq!(rig.controller.mode(), Mode::Pause);
    assert!(!rig.bench.exposure);

    rig.seconds(20);
    assert_eq!(rig.time(), 50);

    // Stop is ignored while paused
    rig.press(Button::Stop);
    assert_eq!(rig.controller.mode(), Mode::Pause);

    rig.lid = 0;
    rig.iterate(0);
    assert_eq!(rig.controller.mode(), Mode::Run);
    assert!(rig.bench.exposure);
    assert_eq!(rig.time(), 50);

    rig.seconds(1);
    assert_eq!(rig.time(), 49);
}

#[test]
fn pause_blinks_whole_display() {
    let mut rig = Rig::boot(60);
    rig.press(Button::Start);
    rig.lid = LID_OPEN;

    rig.ticks(1);
    let frame = rig.iterate(0);
    assert_eq!(frame.enables, [0, 0, 0]);

    rig.ticks(1);
    let frame = rig.iterate(0);
    assert_eq!(frame.enables, [0x08, 0x10, 0x20]);
}

#[test]
fn start_with_lid_open_pauses_at_once() {
    let mut rig = Rig::boot(60);
    rig.lid = LID_OPEN;

    rig.press(Button::Start);

    assert_eq!(rig.controller.mode(), Mode::Pause);
    assert!(!rig.bench.exposure);
    assert_eq!(
        rig.bench.log,
        [
            (Mode::Idle, Event::Start, Mode::Run),
            (Mode::Run, Event::LidOpened, Mode::Pause)
        ]
    );
}

#[test]
fn tick_is_unmasked_after_every_iteration() {
    let mut rig = Rig::boot(60);

    rig.press(Button::Start);
    rig.press(Button::Set);
    assert!(rig.tick.enabled);
}
