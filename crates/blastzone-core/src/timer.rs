//! Stopwatch over the simulation clock.
//!
//! Every in-game timer (fire cooldown, reload, item duration, wall avoidance,
//! pickup respawn) measures simulated seconds since some restart point. The
//! world clock advances by the frame's `dt`, so timers are independent of the
//! frame rate.

use serde::{Deserialize, Serialize};

/// Simulated time in seconds since world construction.
pub type Seconds = f64;

/// Measures simulated time elapsed since the last restart.
///
/// A stopwatch that was never started reports an infinite elapsed time, so
/// "has at least `d` seconds passed?" checks succeed until the first restart.
///
/// # Example
///
/// ```
/// use blastzone_core::timer::Stopwatch;
///
/// let mut watch = Stopwatch::idle();
/// assert!(watch.has_elapsed(1.0, 5.0));
///
/// watch.restart(1.0);
/// assert!(!watch.has_elapsed(2.0, 5.0));
/// assert!(watch.has_elapsed(7.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    started_at: Option<Seconds>,
}

impl Stopwatch {
    /// Creates a stopwatch that has not been started.
    #[must_use]
    pub const fn idle() -> Self {
        Self { started_at: None }
    }

    /// Creates a stopwatch started at `now`.
    #[must_use]
    pub const fn started(now: Seconds) -> Self {
        Self {
            started_at: Some(now),
        }
    }

    /// Restarts the stopwatch at `now`.
    pub fn restart(&mut self, now: Seconds) {
        self.started_at = Some(now);
    }

    /// Seconds elapsed since the last restart, or infinity if never started.
    #[must_use]
    pub fn elapsed(&self, now: Seconds) -> Seconds {
        self.started_at.map_or(Seconds::INFINITY, |start| now - start)
    }

    /// Returns `true` when strictly more than `duration` seconds have elapsed.
    #[must_use]
    pub fn has_elapsed(&self, now: Seconds, duration: Seconds) -> bool {
        self.elapsed(now) > duration
    }
}
