//! Mutex-guarded actuator shared between tasks.
//!
//! The serial playback task, the USB report task and boot configuration all
//! talk to the same driver IC. [`SharedActuator`] owns the driver behind an
//! async mutex so every register transaction happens under one lock; a
//! caller that needs several operations to run back to back (the USB
//! play sequence) holds the guard across them.
//!
//! The slot starts empty. Until a driver is bound, every operation through
//! the guard fails with [`platform::HapticError::InvalidHandle`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

/// Actuator slot shared between tasks.
pub struct SharedActuator<M: RawMutex, D> {
    inner: Mutex<M, Option<D>>,
}

impl<M: RawMutex, D> SharedActuator<M, D> {
    /// An empty slot. Usable in a `static`.
    pub const fn new() -> Self {
        Self { inner: Mutex::new(None) }
    }

    /// A slot already holding `driver`.
    pub const fn bound(driver: D) -> Self {
        Self { inner: Mutex::new(Some(driver)) }
    }

    /// Install `driver`, returning the previous one if any.
    pub async fn bind(&self, driver: D) -> Option<D> {
        self.inner.lock().await.replace(driver)
    }

    /// Remove and return the driver, leaving the slot empty.
    pub async fn unbind(&self) -> Option<D> {
        self.inner.lock().await.take()
    }

    /// Whether a driver is installed.
    pub async fn is_bound(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Lock the slot. The guard derefs to `Option<D>`, which implements
    /// [`platform::HapticDriver`].
    pub async fn lock(&self) -> MutexGuard<'_, M, Option<D>> {
        self.inner.lock().await
    }
}

impl<M: RawMutex, D> Default for SharedActuator<M, D> {
    fn default() -> Self {
        Self::new()
    }
}
