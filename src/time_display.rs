//! Countdown display for a single Pomodoro timer.
//!
//! A [`Model`] owns the remaining-time state of one timer. It counts down from
//! its budget while running and freezes while paused. Time is read from an
//! injectable [`Clock`], so the state machine can be driven with virtual time.
//!
//! # Ticks
//!
//! While running, the display is refreshed by a chain of [`TickMsg`]s. Every
//! accepted tick schedules the next one. Pausing simply stops accepting ticks,
//! which ends the chain. Resuming bumps an internal tag and starts a new chain,
//! so ticks left over from an earlier run are recognised as stale and dropped.
//!
//! # Finishing
//!
//! When the remaining time drops below zero the display clamps to
//! `00:00:00.00`, pauses, and emits a single [`FinishedMsg`]. No further
//! finished notification is raised until [`Model::reset`] starts a new cycle.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_pomodoro::time_display::{new, FinishedMsg};
//! use bubbletea_rs::{Cmd, Msg};
//! use std::time::Duration;
//!
//! struct Parent {
//!     display: bubbletea_pomodoro::time_display::Model,
//!     done: bool,
//! }
//!
//! impl Parent {
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
//!             if finished.id == self.display.id() {
//!                 self.done = true;
//!                 return None;
//!             }
//!         }
//!         self.display.update(msg)
//!     }
//! }
//!
//! let mut parent = Parent { display: new(Duration::from_secs(25 * 60)), done: false };
//! let _first_tick = parent.display.start();
//! ```

use crate::clock::{self, Clock};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Refresh rate of a running display, roughly sixty frames per second.
pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(16_667);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Formats a duration as zero-padded `HH:MM:SS.ff`.
///
/// The value is rounded to the nearest hundredth before it is split into
/// fields, so a reading such as 59.996s renders as `00:01:00.00`.
///
/// ```rust
/// use bubbletea_pomodoro::time_display::format_clock;
/// use std::time::Duration;
///
/// assert_eq!(format_clock(Duration::from_millis(3_661_500)), "01:01:01.50");
/// ```
pub fn format_clock(d: Duration) -> String {
    let centis = (d.as_millis() + 5) / 10;
    let hours = centis / 360_000;
    let minutes = (centis / 6_000) % 60;
    let seconds = (centis / 100) % 60;
    let hundredths = centis % 100;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, hundredths)
}

/// Periodic refresh message for a running display.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Id of the display this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Sent once when a display's countdown runs out.
#[derive(Debug, Clone)]
pub struct FinishedMsg {
    /// Id of the display that finished.
    pub id: i64,
}

/// Outcome of recomputing the displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The displayed value did not move.
    Unchanged,
    /// The displayed value moved and needs re-rendering.
    Changed,
    /// The countdown crossed zero during this refresh.
    Finished,
}

/// Remaining-time state of one timer.
#[derive(Debug, Clone)]
pub struct Model {
    /// How often a running display refreshes.
    pub interval: Duration,
    budget: Duration,
    started_at: Option<Instant>,
    value: Duration,
    finished: bool,
    id: i64,
    tag: i64,
    clock: Arc<dyn Clock>,
}

/// Creates a paused display counting down from `budget`.
pub fn new(budget: Duration) -> Model {
    with_clock(budget, clock::system())
}

/// Creates a paused display that reads time from `clock`.
pub fn with_clock(budget: Duration, clock: Arc<dyn Clock>) -> Model {
    Model {
        interval: DEFAULT_INTERVAL,
        budget,
        started_at: None,
        value: budget,
        finished: false,
        id: next_id(),
        tag: 0,
        clock,
    }
}

impl Model {
    /// Sets the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Unique id used to route tick and finished messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether the countdown is currently advancing.
    pub fn running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether the current cycle has run out.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Remaining time as of the last pause.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// The value shown by [`Model::view`], as of the last refresh.
    pub fn value(&self) -> Duration {
        self.value
    }

    /// Remaining time right now, without touching the displayed value.
    pub fn remaining(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .budget
                .saturating_sub(self.clock.now().saturating_duration_since(started_at)),
            None => self.budget,
        }
    }

    /// Starts or resumes the countdown and returns the first tick.
    ///
    /// Returns `None` when the display is already running or its cycle has
    /// finished; a finished display has to be reset first.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.running() || self.finished {
            return None;
        }
        self.started_at = Some(self.clock.now());
        self.tag += 1;
        Some(self.tick())
    }

    /// Pauses the countdown, folding the running interval into the budget.
    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            let elapsed = self.clock.now().saturating_duration_since(started_at);
            self.budget = self.budget.saturating_sub(elapsed);
            self.value = self.budget;
        }
    }

    /// Zeroes the budget and the displayed value and begins a new cycle.
    ///
    /// A running display keeps ticking; its next refresh will find the
    /// countdown exhausted and finish the cycle.
    pub fn reset(&mut self) {
        self.budget = Duration::ZERO;
        self.value = Duration::ZERO;
        self.finished = false;
        if self.running() {
            self.started_at = Some(self.clock.now());
        }
    }

    /// Recomputes the displayed value from the clock.
    pub fn refresh(&mut self) -> Refresh {
        let Some(started_at) = self.started_at else {
            return Refresh::Unchanged;
        };
        let elapsed = self.clock.now().saturating_duration_since(started_at);
        match self.budget.checked_sub(elapsed) {
            Some(remaining) if remaining == self.value => Refresh::Unchanged,
            Some(remaining) => {
                self.value = remaining;
                Refresh::Changed
            }
            None => {
                self.started_at = None;
                self.budget = Duration::ZERO;
                self.value = Duration::ZERO;
                if self.finished {
                    return Refresh::Unchanged;
                }
                self.finished = true;
                Refresh::Finished
            }
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn finished_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(FinishedMsg { id }) as Msg
        })
    }

    /// Handles tick messages addressed to this display.
    ///
    /// Returns the next tick while the countdown keeps running, a command
    /// delivering [`FinishedMsg`] when it runs out, and `None` for anything
    /// else, including ticks from a previous run.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id || tick.tag != self.tag || !self.running() {
            return None;
        }
        match self.refresh() {
            Refresh::Finished => Some(self.finished_cmd()),
            _ if self.running() => Some(self.tick()),
            _ => None,
        }
    }

    /// Renders the displayed value as `HH:MM:SS.ff`.
    pub fn view(&self) -> String {
        format_clock(self.value)
    }
}

impl Default for Model {
    fn default() -> Self {
        new(crate::config::DEFAULT_BUDGET)
    }
}

#[cfg(test)]
impl TickMsg {
    /// The tick the display's current chain would deliver next.
    pub(crate) fn for_display(display: &Model) -> Self {
        Self {
            id: display.id,
            tag: display.tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn display(budget: Duration) -> (Model, ManualClock) {
        let clock = ManualClock::new();
        (with_clock(budget, Arc::new(clock.clone())), clock)
    }

    fn tick_for(display: &Model) -> Msg {
        Box::new(TickMsg::for_display(display))
    }

    #[test]
    fn test_new_display_is_paused() {
        let (d, _) = display(Duration::from_secs(90));
        assert!(!d.running());
        assert!(!d.finished());
        assert_eq!(d.view(), "00:01:30.00");
        assert_eq!(d.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_unique_ids() {
        let a = new(Duration::from_secs(1));
        let b = new(Duration::from_secs(1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut d, _) = display(Duration::from_secs(10));
        assert!(d.start().is_some());
        let tag = d.tag;
        assert!(d.start().is_none());
        assert_eq!(d.tag, tag);
        assert!(d.running());
    }

    #[test]
    fn test_refresh_counts_down() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        clock.advance(Duration::from_millis(2_250));
        assert_eq!(d.refresh(), Refresh::Changed);
        assert_eq!(d.view(), "00:00:07.75");
        assert_eq!(d.refresh(), Refresh::Unchanged);
    }

    #[test]
    fn test_paused_display_is_frozen() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        clock.advance(Duration::from_secs(4));
        d.stop();
        clock.advance(Duration::from_secs(30));
        assert_eq!(d.refresh(), Refresh::Unchanged);
        assert_eq!(d.remaining(), Duration::from_secs(6));
        assert_eq!(d.view(), "00:00:06.00");
    }

    #[test]
    fn test_accumulation_over_many_runs() {
        let (mut d, clock) = display(Duration::from_secs(60));
        let runs = [1_000u64, 250, 4_000, 750];
        for ms in runs {
            d.start();
            clock.advance(Duration::from_millis(ms));
            d.stop();
            clock.advance(Duration::from_secs(5));
        }
        let total: u64 = runs.iter().sum();
        assert_eq!(d.budget(), Duration::from_secs(60) - Duration::from_millis(total));
        assert_eq!(d.view(), "00:00:54.00");
    }

    #[test]
    fn test_stop_while_paused_does_not_double_count() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        clock.advance(Duration::from_secs(3));
        d.stop();
        clock.advance(Duration::from_secs(3));
        d.stop();
        assert_eq!(d.budget(), Duration::from_secs(7));
    }

    #[test]
    fn test_reset_always_yields_zero() {
        let (mut paused, _) = display(Duration::from_secs(10));
        paused.reset();
        assert_eq!(paused.view(), "00:00:00.00");

        let (mut running, clock) = display(Duration::from_secs(10));
        running.start();
        clock.advance(Duration::from_secs(1));
        running.refresh();
        running.reset();
        assert_eq!(running.value(), Duration::ZERO);
        assert!(running.running());

        let (mut done, clock) = display(Duration::from_secs(1));
        done.start();
        clock.advance(Duration::from_secs(2));
        done.refresh();
        done.reset();
        assert_eq!(done.view(), "00:00:00.00");
        assert!(!done.finished());
    }

    #[test]
    fn test_finishes_exactly_once() {
        let (mut d, clock) = display(Duration::from_secs(2));
        d.start();
        clock.advance(Duration::from_millis(2_500));
        assert_eq!(d.refresh(), Refresh::Finished);
        assert_eq!(d.view(), "00:00:00.00");
        assert!(d.finished());
        assert!(!d.running());

        clock.advance(Duration::from_secs(1));
        assert_eq!(d.refresh(), Refresh::Unchanged);
        assert!(d.start().is_none());
    }

    #[test]
    fn test_exact_zero_is_not_finished() {
        let (mut d, clock) = display(Duration::from_secs(2));
        d.start();
        clock.advance(Duration::from_secs(2));
        assert_eq!(d.refresh(), Refresh::Changed);
        assert!(!d.finished());
        assert!(d.running());
    }

    #[test]
    fn test_reset_while_running_finishes_on_next_tick() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        d.reset();
        clock.advance(Duration::from_millis(20));
        assert_eq!(d.refresh(), Refresh::Finished);
    }

    #[test]
    fn test_update_tick_schedules_next() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        clock.advance(Duration::from_secs(1));
        let msg = tick_for(&d);
        assert!(d.update(msg).is_some());
        assert_eq!(d.value(), Duration::from_secs(9));
    }

    #[test]
    fn test_update_rejects_wrong_id() {
        let (mut d, clock) = display(Duration::from_secs(10));
        d.start();
        clock.advance(Duration::from_secs(1));
        let msg = Box::new(TickMsg {
            id: d.id() + 999,
            tag: d.tag,
        });
        assert!(d.update(msg).is_none());
        assert_eq!(d.value(), Duration::from_secs(10));
    }

    #[test]
    fn test_update_rejects_stale_tag() {
        let (mut d, _) = display(Duration::from_secs(10));
        d.start();
        let stale = tick_for(&d);
        d.stop();
        d.start();
        assert!(d.update(stale).is_none());
    }

    #[test]
    fn test_update_ignores_ticks_while_paused() {
        let (mut d, _) = display(Duration::from_secs(10));
        d.start();
        let msg = tick_for(&d);
        d.stop();
        assert!(d.update(msg).is_none());
    }

    #[test]
    fn test_update_ignores_other_messages() {
        let (mut d, _) = display(Duration::from_secs(10));
        d.start();
        assert!(d.update(Box::new("noise")).is_none());
    }

    #[test]
    fn test_update_after_finish_stops_ticking() {
        let (mut d, clock) = display(Duration::from_secs(2));
        d.start();
        clock.advance(Duration::from_millis(2_500));
        let msg = tick_for(&d);
        assert!(d.update(msg).is_some());
        let late = tick_for(&d);
        assert!(d.update(late).is_none());
    }

    #[tokio::test]
    async fn test_finish_delivers_finished_msg() {
        let (mut d, clock) = display(Duration::from_secs(2));
        d.start();
        clock.advance(Duration::from_millis(2_500));
        let msg = tick_for(&d);
        let cmd = d.update(msg).expect("finish command");
        let delivered = cmd.await.expect("finished message");
        let finished = delivered
            .downcast_ref::<FinishedMsg>()
            .expect("FinishedMsg");
        assert_eq!(finished.id, d.id());
    }

    #[test]
    fn test_format_clock() {
        let cases = [
            (Duration::ZERO, "00:00:00.00"),
            (Duration::from_millis(1_230), "00:00:01.23"),
            (Duration::from_secs(25 * 60), "00:25:00.00"),
            (Duration::from_millis(3_661_500), "01:01:01.50"),
            (Duration::from_millis(59_996), "00:01:00.00"),
        ];
        for (input, expected) in cases {
            assert_eq!(format_clock(input), expected, "formatting {:?}", input);
        }
    }
}
