//! Progress reporting for batch runs.
//!
//! A [`Progress`] wraps a callback receiving `(done, total, message)`. Batch
//! workers report through a shared [`ProgressCounter`], which adds up
//! completed work from any number of threads and forwards the running total.
//!
//! # Example
//!
//! ```
//! use msii::algo::Progress;
//!
//! let progress = Progress::new(|done, total, message| {
//!     eprintln!("[{}/{}] {}", done, total, message);
//! });
//! progress.report(3, 10, "computing");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

/// A progress callback.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Report `done` of `total` units of work.
    #[inline]
    pub fn report(&self, done: usize, total: usize, message: &str) {
        (self.callback)(done, total, message);
    }

    /// Start counting `total` units of work reported through this callback.
    pub fn counter(&self, total: usize, message: &'static str) -> ProgressCounter<'_> {
        ProgressCounter {
            progress: self,
            done: AtomicUsize::new(0),
            total,
            message,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// Thread-safe running total of completed work.
pub struct ProgressCounter<'p> {
    progress: &'p Progress,
    done: AtomicUsize,
    total: usize,
    message: &'static str,
}

impl ProgressCounter<'_> {
    /// Record `amount` more completed units and report the new total.
    pub fn advance(&self, amount: usize) {
        let done = self.done.fetch_add(amount, Ordering::Relaxed) + amount;
        self.progress.report(done.min(self.total), self.total, self.message);
    }

    /// Units completed so far.
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}
