//! Sharing state with the tick interrupt
//!
//! The main loop and the tick ISR are the only two contexts. The main loop
//! reaches the shared value through a [`TickGuard`], which keeps the tick
//! interrupt masked for as long as it lives. The ISR cannot be preempted by
//! the main loop, so it borrows the value directly.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

/// Mask control for the interrupt that shares a [`TickCell`]
pub trait TickInterrupt {
    /// Masks the interrupt, returning whether it was enabled before
    fn disable(&mut self) -> bool;

    /// Unmasks the interrupt
    fn enable(&mut self);
}

pub struct TickCell<T> {
    value: UnsafeCell<T>,
}

// Access is serialised by masking the only other context.
unsafe impl<T: Send> Sync for TickCell<T> {}

impl<T> TickCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    /// Masks the tick interrupt and hands out the value until the guard drops
    pub fn lock<'a, I: TickInterrupt>(&'a self, irq: &'a mut I) -> TickGuard<'a, T, I> {
        let was_enabled = irq.disable();
        TickGuard {
            // SAFETY: the tick interrupt is masked and `irq` is borrowed
            // mutably, so no ISR and no second guard can reach the value.
            value: unsafe { &mut *self.value.get() },
            irq,
            was_enabled,
        }
    }

    /// Borrows the value from inside the tick interrupt.
    ///
    /// # Safety
    ///
    /// Must only be called from the interrupt masked by the
    /// [`TickInterrupt`] passed to [`TickCell::lock`], and that interrupt
    /// must not nest.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn isr_borrow(&self) -> &mut T {
        &mut *self.value.get()
    }
}

/// Exclusive access to a [`TickCell`] value; unmasks the tick on drop
pub struct TickGuard<'a, T, I: TickInterrupt> {
    value: &'a mut T,
    irq: &'a mut I,
    was_enabled: bool,
}

impl<T, I: TickInterrupt> Deref for TickGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T, I: TickInterrupt> DerefMut for TickGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
    }
}

impl<T, I: TickInterrupt> Drop for TickGuard<'_, T, I> {
    fn drop(&mut self) {
        if self.was_enabled {
            self.irq.enable();
        }
    }
}
