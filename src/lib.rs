//! Control firmware for a benchtop UV exposure box
//!
//! The controller measures out an operator configured exposure, drives the
//! relay and run indicator, multiplexes a three digit seven segment display
//! through a 74HC595, beeps on completion or abort, keeps the configured
//! duration in EEPROM and pauses while the lid is open.
//!
//! Everything except the AVR only `hal` module is hardware independent and is tested on the
//! host.

#![cfg_attr(not(test), no_std)]

pub mod codec;
pub mod config;
pub mod console;
pub mod controller;
pub mod countdown;
pub mod debounce;
pub mod display;
pub mod editor;
pub mod store;
pub mod sync;

#[cfg(target_arch = "avr")]
pub mod hal;

pub use controller::{Board, Controller, Event, Mode};
pub use countdown::Countdown;
pub use debounce::{Debouncer, Inputs};
pub use display::{Frame, SegmentDisplay};
pub use store::DurationStore;
pub use sync::{TickCell, TickGuard, TickInterrupt};
