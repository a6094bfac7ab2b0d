#![cfg_attr(target_arch = "avr", no_std, no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use embedded_hal::blocking::delay::DelayMs;
    use embedded_hal::digital::v2::{OutputPin, PinState};
    use panic_halt as _;

    use uv_exposure_timer::config::{BOOT_SETTLE_MS, DURATION_ADDRESS, MINIMUM_TIME};
    use uv_exposure_timer::console::Console;
    use uv_exposure_timer::hal::{
        board, Delay, DigitEnables, Eeprom, FrontPanel, TickTimer, Watchdog, WatchdogTimeout,
    };
    use uv_exposure_timer::{
        Board, Controller, Countdown, Debouncer, DurationStore, Event, Frame, Mode,
        SegmentDisplay, TickCell,
    };

    // Shared with TIMER1_COMPA
    static COUNTDOWN: TickCell<Countdown> = TickCell::new(Countdown::new(MINIMUM_TIME));

    #[cfg(feature = "debug")]
    type Log = uv_exposure_timer::hal::Uart;
    #[cfg(not(feature = "debug"))]
    type Log = uv_exposure_timer::console::NullSink;

    fn log_sink() -> Log {
        #[cfg(feature = "debug")]
        {
            uv_exposure_timer::hal::Uart::new()
        }
        #[cfg(not(feature = "debug"))]
        {
            uv_exposure_timer::console::NullSink
        }
    }

    /// Actuators, EEPROM and watchdog as seen by the controller
    struct Enclosure {
        indicator: board::RunIndicator,
        relay: board::Relay,
        buzzer: board::Buzzer,
        store: DurationStore<Eeprom>,
        watchdog: Watchdog,
        console: Console<Log>,
    }

    impl Board for Enclosure {
        fn set_exposure(&mut self, on: bool) {
            self.relay.set_state(PinState::from(on)).ok();
            self.indicator.set_state(PinState::from(on)).ok();
        }

        fn set_buzzer(&mut self, on: bool) {
            self.buzzer.set_state(PinState::from(on)).ok();
        }

        fn persist(&mut self, duration: i16) {
            match self.store.commit(duration, &mut self.watchdog) {
                Ok(written) => self.console.committed(duration, written),
                Err(e) => self.console.store_failed(&e),
            }
        }

        fn transitioned(&mut self, from: Mode, event: Event, to: Mode) {
            self.console.transition(from, event, to);
        }
    }

    #[avr_device::entry]
    fn main() -> ! {
        avr_device::interrupt::disable();

        // A watchdog reset leaves the watchdog running
        let mut watchdog = Watchdog::new();
        watchdog.disable();
        let mut tick = TickTimer::new();

        // Initialize outputs low, inputs pulled up
        let (indicator, relay, buzzer, data, shift_clock, latch_clock, panel) = unsafe {
            (
                board::RunIndicator::steal().into_output(),
                board::Relay::steal().into_output(),
                board::Buzzer::steal().into_output(),
                board::ShiftData::steal().into_output(),
                board::ShiftClock::steal().into_output(),
                board::LatchClock::steal().into_output(),
                FrontPanel::new(
                    board::StartButton::steal().into_pull_up_input(),
                    board::StopButton::steal().into_pull_up_input(),
                    board::SetButton::steal().into_pull_up_input(),
                    board::LidSwitch::steal().into_pull_up_input(),
                ),
            )
        };

        // Wait to avoid startup spikes
        let mut delay = Delay::new();
        DelayMs::<u16>::delay_ms(&mut delay, BOOT_SETTLE_MS);

        let mut display =
            SegmentDisplay::new(data, shift_clock, latch_clock, DigitEnables::new(), delay);

        tick.start();
        unsafe { avr_device::interrupt::enable() };

        let mut debouncer = Debouncer::new(panel.read());
        watchdog.start(WatchdogTimeout::Ms4000);

        let mut console = Console::new(log_sink());
        let mut store = DurationStore::new(Eeprom::new(), DURATION_ADDRESS);
        let loaded = store.recall();
        console.boot(&loaded);
        let target = loaded.unwrap_or(MINIMUM_TIME);
        watchdog.feed();

        COUNTDOWN.lock(&mut tick).set_time(target);

        let mut controller = Controller::new(target);
        let mut enclosure = Enclosure {
            indicator,
            relay,
            buzzer,
            store,
            watchdog,
            console,
        };

        loop {
            let inputs = debouncer.sample(panel.read());

            let frame = {
                let mut countdown = COUNTDOWN.lock(&mut tick);
                controller.step(&inputs, &mut countdown, &mut enclosure);
                Frame::compose(
                    controller.mode(),
                    countdown.time(),
                    controller.edit_place(),
                    countdown.blink_phase(),
                )
            };

            enclosure.watchdog.feed();
            display.refresh(&frame).ok();
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_COMPA() {
        // SAFETY: the main loop only reaches COUNTDOWN through a TickGuard,
        // which keeps this vector masked.
        let countdown = unsafe { COUNTDOWN.isr_borrow() };

        if let Some(on) = countdown.tick() {
            // SAFETY: the main loop drives the buzzer only under the tick lock
            let mut buzzer = unsafe { board::Buzzer::steal() };
            buzzer.set_state(PinState::from(on)).ok();
        }
    }
}

// The firmware only exists on AVR; host builds carry the library for tests
#[cfg(not(target_arch = "avr"))]
fn main() {}
