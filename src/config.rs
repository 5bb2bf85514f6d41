//! In-process settings for the timer list.
//!
//! There is no configuration file, flag or environment variable; the
//! defaults below are what the binary runs with.

use crate::time_display::DEFAULT_INTERVAL;
use std::time::Duration;

/// Countdown length of a freshly added timer: one Pomodoro.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(25 * 60);

/// Number of timers present at startup.
pub const DEFAULT_INITIAL_TIMERS: usize = 3;

/// Settings fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Countdown length of every new timer.
    pub default_budget: Duration,
    /// How often a running display refreshes.
    pub tick_interval: Duration,
    /// Timers created when the app starts.
    pub initial_timers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_budget: DEFAULT_BUDGET,
            tick_interval: DEFAULT_INTERVAL,
            initial_timers: DEFAULT_INITIAL_TIMERS,
        }
    }
}

impl Config {
    /// Default settings: 25 minute timers, three of them.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the countdown length of new timers.
    pub fn with_default_budget(mut self, budget: Duration) -> Self {
        self.default_budget = budget;
        self
    }

    /// Sets the refresh interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Sets how many timers exist at startup.
    pub fn with_initial_timers(mut self, count: usize) -> Self {
        self.initial_timers = count;
        self
    }
}
