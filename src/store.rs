//! Persistent exposure duration
//!
//! One 16 bit word in non-volatile memory holds the configured duration.
//! It is read once at boot and only rewritten when an edit changes it.

use crate::config::{MAXIMUM_TIME, MINIMUM_TIME};

/// Word addressed non-volatile memory
pub trait WordStorage {
    type Error;

    fn read_word(&mut self, address: u16) -> Result<u16, Self::Error>;

    fn write_word(&mut self, address: u16, value: u16) -> Result<(), Self::Error>;
}

/// Hardware watchdog acknowledge
pub trait Watchdog {
    fn feed(&mut self);
}

/// Why a stored duration was not used
#[derive(Debug, PartialEq, Eq)]
pub enum LoadError<E> {
    Storage(E),
    /// Erased or corrupt word
    OutOfRange(u16),
}

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError<E> {
    Storage(E),
    /// Read back after writing did not match
    Verify { expected: u16, found: u16 },
}

pub struct DurationStore<S> {
    storage: S,
    address: u16,
}

impl<S: WordStorage> DurationStore<S> {
    pub fn new(storage: S, address: u16) -> Self {
        Self { storage, address }
    }

    /// Reads the stored duration, rejecting anything outside the valid range
    pub fn recall(&mut self) -> Result<i16, LoadError<S::Error>> {
        let raw = self.storage.read_word(self.address).map_err(LoadError::Storage)?;

        match i16::try_from(raw) {
            Ok(duration) if (MINIMUM_TIME..=MAXIMUM_TIME).contains(&duration) => Ok(duration),
            _ => Err(LoadError::OutOfRange(raw)),
        }
    }

    /// Stored duration, or `MINIMUM_TIME` when nothing valid is stored
    pub fn load(&mut self) -> i16 {
        self.recall().unwrap_or(MINIMUM_TIME)
    }

    /// Writes `duration` if it differs from the stored word.
    ///
    /// The watchdog is fed right before and after, a write can take longer
    /// than the watchdog timeout allows. Returns whether a write happened.
    pub fn commit<W: Watchdog>(
        &mut self,
        duration: i16,
        watchdog: &mut W,
    ) -> Result<bool, StoreError<S::Error>> {
        watchdog.feed();
        let result = self.write_if_changed(duration as u16);
        watchdog.feed();
        result
    }

    fn write_if_changed(&mut self, value: u16) -> Result<bool, StoreError<S::Error>> {
        let stored = self.storage.read_word(self.address).map_err(StoreError::Storage)?;
        if stored == value {
            return Ok(false);
        }

        self.storage.write_word(self.address, value).map_err(StoreError::Storage)?;

        let found = self.storage.read_word(self.address).map_err(StoreError::Storage)?;
        if found != value {
            return Err(StoreError::Verify {
                expected: value,
                found,
            });
        }

        Ok(true)
    }

    pub fn release(self) -> S {
        self.storage
    }
}
