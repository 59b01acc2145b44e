//! A bounded counting semaphore and run-level cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Bounds the number of child processes live at once.
pub struct Semaphore {
    state: Mutex<usize>,
    available: Condvar,
    capacity: usize,
}

impl Semaphore {
    pub fn new(capacity: usize) -> Self {
        Self { state: Mutex::new(capacity), available: Condvar::new(), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> SemaphoreGuard<'_> {
        let mut slots = self.state.lock().expect("semaphore mutex poisoned");
        while *slots == 0 {
            slots = self.available.wait(slots).expect("semaphore mutex poisoned");
        }
        *slots -= 1;
        SemaphoreGuard { semaphore: self }
    }

    fn release(&self) {
        let mut slots = self.state.lock().expect("semaphore mutex poisoned");
        *slots += 1;
        self.available.notify_one();
    }
}

/// A held semaphore slot; releases on drop.
pub struct SemaphoreGuard<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for SemaphoreGuard<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

/// A shared flag observed at semaphore acquisition and inside the adapter's
/// wait loop: the engine's single root of cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Expose the underlying flag so a signal handler (e.g.
    /// `signal_hook::flag::register`) can set it directly.
    pub fn signal_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
