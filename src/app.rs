//! The root model: an ordered, scrollable list of Pomodoro timers.
//!
//! [`App`] owns every [`timer_widget::Model`], the display mode and the quit
//! flow. Timers are only ever appended at the end or removed from the end.
//! Tick and finished messages are routed to the timer whose id they carry;
//! messages for a timer that has since been removed match nothing and are
//! dropped, which is what ends that timer's tick chain.
//!
//! ```text
//! Running --q--> ConfirmingQuit --q--> Terminated
//!    ^                 |
//!    +-------c---------+
//! ```

use crate::clock::{self, Clock};
use crate::config::Config;
use crate::confirm::{self, Decision};
use crate::help::{self, KeyMap};
use crate::key::Binding;
use crate::theme::{DisplayMode, Theme};
use crate::time_display::{self, FinishedMsg, TickMsg};
use crate::timer_widget;
use crate::viewport;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use std::sync::Arc;

const TITLE: &str = "Pomodoro";
const HEADER_HEIGHT: usize = 2;
const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 24;

/// Application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Timers are shown and respond to keys.
    Running,
    /// The quit dialog is open. Ticks keep flowing; keys go to the dialog.
    ConfirmingQuit,
    /// Quit was confirmed. Every further message is ignored.
    Terminated,
}

/// Top-level key bindings.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Switches between dark and light mode.
    pub toggle_dark: Binding,
    /// Appends a timer.
    pub add: Binding,
    /// Removes the last timer.
    pub remove: Binding,
    /// Opens the quit dialog.
    pub quit: Binding,
    /// Selects the previous timer.
    pub up: Binding,
    /// Selects the next timer.
    pub down: Binding,
    /// Toggles the full help footer.
    pub help: Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            toggle_dark: Binding::new(vec![KeyCode::Char('d')]).with_help("d", "toggle dark mode"),
            add: Binding::new(vec![KeyCode::Char('a')]).with_help("a", "add"),
            remove: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "remove"),
            quit: Binding::new(vec![
                (KeyCode::Char('q'), KeyModifiers::NONE),
                (KeyCode::Char('c'), KeyModifiers::CONTROL),
            ])
            .with_help("q", "quit"),
            up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "previous timer"),
            down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')]).with_help("↓/j", "next timer"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
        }
    }
}

impl KeyMap for AppKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.toggle_dark,
            &self.add,
            &self.remove,
            &self.quit,
            &self.help,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.up, &self.down],
            vec![&self.add, &self.remove],
            vec![&self.toggle_dark, &self.quit, &self.help],
        ]
    }
}

/// The root bubbletea-rs model.
///
/// Holds the timer list, the selection, the display mode and the quit
/// dialog, and lays them out as header, scrollable body and help footer.
#[derive(Debug, Clone)]
pub struct App {
    /// Top-level bindings.
    pub keymap: AppKeyMap,
    /// Footer help.
    pub help: help::Model,
    config: Config,
    clock: Arc<dyn Clock>,
    timers: Vec<timer_widget::Model>,
    selected: usize,
    mode: DisplayMode,
    theme: Theme,
    lifecycle: Lifecycle,
    dialog: confirm::Model,
    viewport: viewport::Model,
    width: usize,
    height: usize,
}

impl App {
    /// Builds the app on the system clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, clock::system())
    }

    /// Builds the app with every timer reading time from `clock`.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let mode = DisplayMode::default();
        let theme = Theme::for_mode(mode);
        let mut help = help::Model::new().with_width(DEFAULT_WIDTH);
        help.styles = theme.help.clone();
        let mut app = Self {
            keymap: AppKeyMap::default(),
            help,
            clock,
            timers: Vec::new(),
            selected: 0,
            mode,
            theme,
            lifecycle: Lifecycle::Running,
            dialog: confirm::new(),
            viewport: viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT - HEADER_HEIGHT - 1),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            config,
        };
        for _ in 0..app.config.initial_timers {
            app.add_timer();
        }
        app.select(0);
        app
    }

    /// Timers in display order.
    pub fn timers(&self) -> &[timer_widget::Model] {
        &self.timers
    }

    /// Number of timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether the list has no timers.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Index of the timer receiving keyboard input, if any.
    pub fn selected(&self) -> Option<usize> {
        (!self.timers.is_empty()).then_some(self.selected)
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The scroll window over the timer list.
    pub fn viewport(&self) -> &viewport::Model {
        &self.viewport
    }

    /// Appends a fresh, stopped timer and scrolls it into view.
    pub fn add_timer(&mut self) {
        let display = time_display::with_clock(self.config.default_budget, self.clock.clone())
            .with_interval(self.config.tick_interval);
        let timer = timer_widget::with_display(display);
        tracing::info!(timer = timer.id(), count = self.timers.len() + 1, "timer added");
        self.timers.push(timer);
        self.select(self.timers.len() - 1);
    }

    /// Drops the most recently added timer. Does nothing on an empty list.
    pub fn remove_timer(&mut self) {
        let Some(timer) = self.timers.pop() else {
            return;
        };
        tracing::info!(timer = timer.id(), count = self.timers.len(), "timer removed");
        self.select(self.selected.min(self.timers.len().saturating_sub(1)));
    }

    /// Flips dark/light mode. Timer state is untouched.
    pub fn toggle_display_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.theme = Theme::for_mode(self.mode);
        self.help.styles = self.theme.help.clone();
        tracing::debug!(mode = ?self.mode, "display mode toggled");
        self.sync_viewport();
    }

    /// Opens the quit dialog. The program keeps running until it is answered.
    pub fn request_quit(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        tracing::info!("quit requested");
        self.lifecycle = Lifecycle::ConfirmingQuit;
        self.dialog.focus();
    }

    /// Acts on the dialog's answer. Returns the quit command when confirmed.
    pub fn resolve_quit(&mut self, decision: Decision) -> Option<Cmd> {
        if self.lifecycle != Lifecycle::ConfirmingQuit {
            return None;
        }
        self.dialog.blur();
        match decision {
            Decision::Quit => {
                tracing::info!("quit confirmed");
                self.lifecycle = Lifecycle::Terminated;
                Some(bubbletea_rs::quit())
            }
            Decision::Cancel => {
                tracing::info!("quit cancelled");
                self.lifecycle = Lifecycle::Running;
                None
            }
        }
    }

    fn select(&mut self, index: usize) {
        if let Some(current) = self.timers.get_mut(self.selected) {
            current.blur();
        }
        self.selected = index;
        if let Some(timer) = self.timers.get_mut(index) {
            timer.focus();
        }
        self.sync_viewport();
    }

    fn footer_height(&self) -> usize {
        self.help.view(&self.keymap).lines().count().max(1)
    }

    fn body_height(&self) -> usize {
        self.height
            .saturating_sub(HEADER_HEIGHT + 1 + self.footer_height())
    }

    /// Re-renders the list into the viewport and keeps the selection visible.
    fn sync_viewport(&mut self) {
        let mut lines = Vec::new();
        let mut selected_range = None;
        for (i, timer) in self.timers.iter().enumerate() {
            let top = lines.len();
            lines.extend(timer.view(&self.theme).lines().map(str::to_string));
            if i == self.selected {
                selected_range = Some((top, lines.len()));
            }
        }
        self.viewport.set_size(self.width, self.body_height());
        self.viewport.set_content_lines(lines);
        if let Some((top, bottom)) = selected_range {
            self.viewport.scroll_into_view(top, bottom);
        }
    }

    /// Routes a timer message to its owner.
    fn route_to_timer(&mut self, id: i64, msg: Msg) -> Option<Cmd> {
        match self.timers.iter_mut().find(|t| t.id() == id) {
            Some(timer) => timer.update(msg),
            None => {
                tracing::trace!(timer = id, "dropping message for removed timer");
                None
            }
        }
    }

    fn handle_key(&mut self, msg: Msg) -> Option<Cmd> {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return None;
        };

        if self.lifecycle == Lifecycle::ConfirmingQuit {
            let decision = self.dialog.update(&msg)?;
            return self.resolve_quit(decision);
        }

        if self.keymap.toggle_dark.matches(key_msg) {
            self.toggle_display_mode();
        } else if self.keymap.add.matches(key_msg) {
            self.add_timer();
        } else if self.keymap.remove.matches(key_msg) {
            self.remove_timer();
        } else if self.keymap.quit.matches(key_msg) {
            self.request_quit();
        } else if self.keymap.up.matches(key_msg) {
            if self.selected > 0 {
                self.select(self.selected - 1);
            }
        } else if self.keymap.down.matches(key_msg) {
            if self.selected + 1 < self.timers.len() {
                self.select(self.selected + 1);
            }
        } else if self.keymap.help.matches(key_msg) {
            self.help.show_all = !self.help.show_all;
            self.sync_viewport();
        } else if self.viewport.update(&msg) {
            return None;
        } else if let Some(timer) = self.timers.get_mut(self.selected) {
            let cmd = timer.update(msg);
            self.sync_viewport();
            return cmd;
        }
        None
    }

    fn center(&self, content: &str, height: usize) -> String {
        let content_width = lipgloss::width_visible(content);
        let content_height = content.lines().count();
        let left = " ".repeat(self.width.saturating_sub(content_width) / 2);
        let top = height.saturating_sub(content_height) / 2;
        let mut out = "\n".repeat(top);
        let body: Vec<String> = content.lines().map(|l| format!("{}{}", left, l)).collect();
        out.push_str(&body.join("\n"));
        out
    }

    fn header_view(&self) -> String {
        let running = self.timers.iter().filter(|t| t.display().running()).count();
        let title = self.theme.header.render(TITLE);
        format!("{}  {} timers, {} running", title, self.timers.len(), running)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        (App::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.lifecycle == Lifecycle::Terminated {
            return None;
        }

        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = size.width as usize;
            self.height = size.height as usize;
            self.help.width = self.width;
            self.sync_viewport();
            return None;
        }

        let timer_id = msg
            .downcast_ref::<TickMsg>()
            .map(|tick| tick.id)
            .or_else(|| msg.downcast_ref::<FinishedMsg>().map(|f| f.id));
        if let Some(id) = timer_id {
            return self.route_to_timer(id, msg);
        }

        self.handle_key(msg)
    }

    fn view(&self) -> String {
        if self.lifecycle == Lifecycle::Terminated {
            return String::new();
        }

        let body_height = self.body_height();
        let (body, footer) = if self.lifecycle == Lifecycle::ConfirmingQuit {
            (
                self.center(&self.dialog.view(&self.theme), body_height),
                self.help.view(&self.dialog.keymap),
            )
        } else {
            let mut viewport = self.viewport.clone();
            let lines: Vec<String> = self
                .timers
                .iter()
                .flat_map(|t| {
                    t.view(&self.theme)
                        .lines()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect();
            viewport.set_content_lines(lines);
            (viewport.view(), self.help.view(&self.keymap))
        };

        let padding = body_height.saturating_sub(body.lines().count());
        format!(
            "{}\n\n{}{}\n{}",
            self.header_view(),
            body,
            "\n".repeat(padding),
            footer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn app(initial: usize, budget: Duration) -> (App, ManualClock) {
        let clock = ManualClock::new();
        let config = Config::new()
            .with_initial_timers(initial)
            .with_default_budget(budget);
        (App::with_clock(config, Arc::new(clock.clone())), clock)
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn plain(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    fn snapshot(app: &App) -> Vec<(i64, bool, Duration, bool)> {
        app.timers()
            .iter()
            .map(|t| {
                (
                    t.id(),
                    t.display().running(),
                    t.display().budget(),
                    t.active(),
                )
            })
            .collect()
    }

    #[test]
    fn test_starts_with_configured_timers() {
        let app = App::default();
        assert_eq!(app.len(), 3);
        assert_eq!(app.selected(), Some(0));
        assert!(app.timers()[0].focused());
        assert!(!app.timers()[1].focused());
        assert_eq!(app.lifecycle(), Lifecycle::Running);
        assert!(app.timers().iter().all(|t| !t.display().running()));
    }

    #[test]
    fn test_add_three_remove_one() {
        let (mut app, _) = app(0, Duration::from_secs(60));
        app.add_timer();
        app.add_timer();
        app.add_timer();
        assert_eq!(app.len(), 3);
        let ids: Vec<i64> = app.timers().iter().map(|t| t.id()).collect();

        app.remove_timer();
        assert_eq!(app.len(), 2);
        let remaining: Vec<i64> = app.timers().iter().map(|t| t.id()).collect();
        assert_eq!(remaining, &ids[..2]);
        assert_eq!(app.selected(), Some(1));
    }

    #[test]
    fn test_remove_from_empty_is_noop() {
        let (mut app, _) = app(0, Duration::from_secs(60));
        app.remove_timer();
        assert!(app.is_empty());
        assert_eq!(app.selected(), None);
        app.add_timer();
        app.remove_timer();
        app.remove_timer();
        assert!(app.is_empty());
    }

    #[test]
    fn test_new_timer_is_selected_and_stopped() {
        let (mut app, _) = app(2, Duration::from_secs(60));
        app.add_timer();
        assert_eq!(app.selected(), Some(2));
        let newest = &app.timers()[2];
        assert!(newest.focused());
        assert!(!newest.display().running());
        assert_eq!(newest.display().budget(), Duration::from_secs(60));
        assert!(!app.timers()[0].focused());
    }

    #[test]
    fn test_added_timer_is_scrolled_into_view() {
        let (mut app, _) = app(0, Duration::from_secs(60));
        app.update(Box::new(WindowSizeMsg {
            width: 80,
            height: 12,
        }));
        for _ in 0..6 {
            app.add_timer();
        }
        let vp = app.viewport();
        assert!(vp.y_offset > 0);
        assert!(vp.at_bottom());
    }

    #[test]
    fn test_toggle_display_mode_leaves_timers_alone() {
        let (mut app, clock) = app(2, Duration::from_secs(60));
        app.update(key(KeyCode::Enter));
        clock.advance(Duration::from_secs(1));
        let before = snapshot(&app);
        app.update(key(KeyCode::Char('d')));
        assert_eq!(app.mode(), DisplayMode::Light);
        assert_eq!(snapshot(&app), before);
        app.toggle_display_mode();
        assert_eq!(app.mode(), DisplayMode::Dark);
    }

    #[test]
    fn test_keys_add_and_remove() {
        let (mut app, _) = app(1, Duration::from_secs(60));
        app.update(key(KeyCode::Char('a')));
        app.update(key(KeyCode::Char('a')));
        assert_eq!(app.len(), 3);
        app.update(key(KeyCode::Char('r')));
        assert_eq!(app.len(), 2);
    }

    #[test]
    fn test_selection_moves() {
        let (mut app, _) = app(3, Duration::from_secs(60));
        app.update(key(KeyCode::Down));
        app.update(key(KeyCode::Char('j')));
        app.update(key(KeyCode::Down));
        assert_eq!(app.selected(), Some(2));
        app.update(key(KeyCode::Up));
        assert_eq!(app.selected(), Some(1));
        assert!(app.timers()[1].focused());
    }

    #[test]
    fn test_enter_starts_selected_timer() {
        let (mut app, _) = app(2, Duration::from_secs(60));
        app.update(key(KeyCode::Down));
        assert!(app.update(key(KeyCode::Enter)).is_some());
        assert!(!app.timers()[0].display().running());
        assert!(app.timers()[1].display().running());
        assert!(app.timers()[1].active());
    }

    #[test]
    fn test_quit_then_cancel_changes_nothing() {
        let (mut app, _) = app(3, Duration::from_secs(60));
        app.update(key(KeyCode::Enter));
        let before = snapshot(&app);

        app.update(key(KeyCode::Char('q')));
        assert_eq!(app.lifecycle(), Lifecycle::ConfirmingQuit);
        assert!(plain(&app.view()).contains(confirm::QUESTION));

        // Keys go to the dialog only.
        app.update(key(KeyCode::Char('a')));
        assert_eq!(app.len(), 3);

        assert!(app.update(key(KeyCode::Char('c'))).is_none());
        assert_eq!(app.lifecycle(), Lifecycle::Running);
        assert_eq!(snapshot(&app), before);
        assert!(!plain(&app.view()).contains(confirm::QUESTION));
    }

    #[test]
    fn test_quit_then_confirm_terminates() {
        let (mut app, clock) = app(1, Duration::from_secs(60));
        app.update(key(KeyCode::Enter));
        app.request_quit();
        assert!(app.update(key(KeyCode::Char('q'))).is_some());
        assert_eq!(app.lifecycle(), Lifecycle::Terminated);

        clock.advance(Duration::from_secs(1));
        let tick = Box::new(TickMsg::for_display(app.timers()[0].display()));
        assert!(app.update(tick).is_none());
        assert_eq!(app.timers()[0].display().value(), Duration::from_secs(60));
        assert_eq!(app.view(), "");
    }

    #[test]
    fn test_resolve_quit_outside_dialog_is_ignored() {
        let (mut app, _) = app(1, Duration::from_secs(60));
        assert!(app.resolve_quit(Decision::Quit).is_none());
        assert_eq!(app.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_ticks_keep_flowing_during_dialog() {
        let (mut app, clock) = app(1, Duration::from_secs(60));
        app.update(key(KeyCode::Enter));
        app.request_quit();
        clock.advance(Duration::from_secs(5));
        let tick = Box::new(TickMsg::for_display(app.timers()[0].display()));
        assert!(app.update(tick).is_some());
        assert_eq!(app.timers()[0].display().value(), Duration::from_secs(55));
    }

    #[tokio::test]
    async fn test_finish_scenario() {
        let (mut app, clock) = app(1, Duration::from_secs(2));
        app.update(key(KeyCode::Enter));
        clock.advance(Duration::from_millis(2_500));

        let tick = Box::new(TickMsg::for_display(app.timers()[0].display()));
        let cmd = app.update(tick).expect("finish command");
        let finished = cmd.await.expect("finished message");
        assert!(finished.downcast_ref::<FinishedMsg>().is_some());
        assert!(app.update(finished).is_none());

        let timer = &app.timers()[0];
        assert_eq!(timer.display().view(), "00:00:00.00");
        assert!(timer.finished());
        assert!(!timer.active());
        assert!(!timer.display().running());
        let out = plain(&app.view());
        assert!(out.contains("00:00:00.00"));
        assert!(out.contains(timer_widget::FINISHED_MARK));

        let late = Box::new(TickMsg::for_display(app.timers()[0].display()));
        assert!(app.update(late).is_none());
    }

    #[test]
    fn test_ticks_for_removed_timer_are_dropped() {
        let (mut app, clock) = app(2, Duration::from_secs(60));
        app.update(key(KeyCode::Down));
        app.update(key(KeyCode::Enter));
        let stale = Box::new(TickMsg::for_display(app.timers()[1].display()));
        app.remove_timer();
        clock.advance(Duration::from_secs(1));
        assert!(app.update(stale).is_none());
        assert_eq!(app.len(), 1);
    }

    #[test]
    fn test_view_layout() {
        let (mut app, _) = app(2, Duration::from_secs(90));
        let out = plain(&app.view());
        assert!(out.trim_start().starts_with(TITLE));
        assert!(out.contains("2 timers, 0 running"));
        assert!(out.contains("00:01:30.00"));
        assert!(out.contains("a add"));

        app.update(key(KeyCode::Char('?')));
        assert!(plain(&app.view()).contains("next timer"));
    }

    #[test]
    fn test_narrow_window_clips_rows_by_visible_width() {
        let (mut app, _) = app(1, Duration::from_secs(90));
        app.update(Box::new(WindowSizeMsg {
            width: 30,
            height: 20,
        }));
        let out = app.view();
        let row = out
            .lines()
            .find(|line| plain(line).contains("[Start]"))
            .expect("timer row");
        assert_eq!(lipgloss::width_visible(row), 30);
        assert!(plain(row).contains("[Stop]"));
        assert!(row.ends_with("\x1b[0m"));
    }
}
