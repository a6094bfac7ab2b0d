//! Line oriented event log
//!
//! On the device this is USART0 with the `debug` feature and
//! [`NullSink`] otherwise.

use core::convert::Infallible;

use ufmt::{uWrite, uwriteln};

use crate::controller::{Event, Mode};
use crate::store::{LoadError, StoreError};

/// Discards everything written to it
pub struct NullSink;

impl uWrite for NullSink {
    type Error = Infallible;

    fn write_str(&mut self, _s: &str) -> Result<(), Infallible> {
        Ok(())
    }
}

pub struct Console<W> {
    out: W,
}

impl<W: uWrite> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn boot<E>(&mut self, loaded: &Result<i16, LoadError<E>>) {
        match loaded {
            Ok(duration) => uwriteln!(self.out, "boot: {}s", duration),
            Err(LoadError::OutOfRange(raw)) => {
                uwriteln!(self.out, "boot: stored {} out of range, using minimum", raw)
            }
            Err(LoadError::Storage(_)) => uwriteln!(self.out, "boot: read failed, using minimum"),
        }
        .ok();
    }

    pub fn transition(&mut self, from: Mode, event: Event, to: Mode) {
        uwriteln!(self.out, "{:?} --{:?}--> {:?}", from, event, to).ok();
    }

    pub fn committed(&mut self, duration: i16, written: bool) {
        let what = if written { "stored" } else { "unchanged" };
        uwriteln!(self.out, "commit: {}s {}", duration, what).ok();
    }

    pub fn store_failed<E>(&mut self, error: &StoreError<E>) {
        match error {
            StoreError::Verify { expected, found } => {
                uwriteln!(self.out, "commit: wrote {} read {}", expected, found)
            }
            StoreError::Storage(_) => uwriteln!(self.out, "commit: write failed"),
        }
        .ok();
    }

    pub fn release(self) -> W {
        self.out
    }
}
