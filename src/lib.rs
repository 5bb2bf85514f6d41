#![warn(missing_docs)]

//! # bubbletea-pomodoro
//!
//! A terminal Pomodoro timer built with [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs)
//! and styled with lipgloss.
//!
//! ## Overview
//!
//! The application shows a scrollable list of independent countdown timers.
//! Each timer can be started, stopped, reset or marked finished, timers can be
//! appended to or removed from the end of the list, and quitting goes through
//! a confirmation dialog. Every component follows the Elm Architecture used by
//! bubbletea-rs: state lives in a `Model`, messages arrive in `update()`, and
//! `view()` renders a string.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`time_display`] | Countdown state machine driven by tick messages |
//! | [`timer_widget`] | Start / Stop / Finished / Reset buttons around one countdown |
//! | [`confirm`] | Quit confirmation dialog |
//! | [`app`] | Root model owning the timer list |
//! | [`viewport`] | Vertical scroll container |
//! | [`help`] | Footer listing key bindings |
//!
//! ## Key Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `d` | toggle dark mode |
//! | `a` | add a timer |
//! | `r` | remove the last timer |
//! | `q` | ask to quit (`q` confirms, `c` cancels) |
//! | `↑`/`↓` | select a timer |
//! | `←`/`→`, `enter` | choose and press a timer button |
//!
//! ## Driving a timer with virtual time
//!
//! ```rust
//! use bubbletea_pomodoro::clock::ManualClock;
//! use bubbletea_pomodoro::time_display::{self, Refresh};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut display = time_display::with_clock(Duration::from_secs(2), Arc::new(clock.clone()));
//! let _tick = display.start();
//! clock.advance(Duration::from_millis(2_500));
//! assert_eq!(display.refresh(), Refresh::Finished);
//! assert_eq!(display.view(), "00:00:00.00");
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod help;
pub mod key;
pub mod logging;
pub mod time_display;
pub mod theme;
pub mod timer_widget;
pub mod viewport;

use bubbletea_rs::Cmd;

/// Core trait for components that take keyboard focus.
///
/// - **Focused**: the component receives key messages and highlights its
///   current control.
/// - **Blurred**: key messages are ignored and nothing is highlighted.
///
/// `focus()` may return a command for initialization; none of the components
/// in this crate need one.
pub trait Component {
    /// Gives the component keyboard focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes keyboard focus.
    fn blur(&mut self);

    /// Whether the component currently has focus.
    fn focused(&self) -> bool;
}

pub use app::{App, Lifecycle};
pub use config::Config;
pub use confirm::{Decision, Model as QuitConfirmation};
pub use help::Model as HelpModel;
pub use key::{Binding, Help as KeyHelp, KeyPress};
pub use theme::{DisplayMode, Theme};
pub use time_display::{
    format_clock, FinishedMsg, Model as TimeDisplay, Refresh, TickMsg as TimeDisplayTickMsg,
};
pub use timer_widget::{Control, Model as TimerWidget};
pub use viewport::Model as Viewport;

/// Convenience re-exports.
pub mod prelude {
    pub use crate::app::{App, Lifecycle};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::Config;
    pub use crate::confirm::{Decision, Model as QuitConfirmation};
    pub use crate::help::{KeyMap, Model as HelpModel};
    pub use crate::key::{Binding, Help as KeyHelp, KeyPress};
    pub use crate::theme::{DisplayMode, Theme};
    pub use crate::time_display::{format_clock, FinishedMsg, Model as TimeDisplay, Refresh};
    pub use crate::timer_widget::{Control, Model as TimerWidget};
    pub use crate::viewport::Model as Viewport;
    pub use crate::Component;
}
