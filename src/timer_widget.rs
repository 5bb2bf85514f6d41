//! A single Pomodoro timer: four control buttons around a countdown.
//!
//! The widget owns exactly one [`time_display::Model`]. Button presses are
//! dispatched by control id (`"start"`, `"stop"`, `"finish"`, `"reset"`) and
//! forwarded to the display; the widget itself only keeps presentation flags.
//! The display reports completion through a [`FinishedMsg`] on the message
//! bus rather than a reference back to the widget.

use crate::key::Binding;
use crate::theme::Theme;
use crate::time_display::{self, FinishedMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use std::time::Duration;

/// Shown next to the clock once the countdown has run out.
pub const FINISHED_MARK: &str = "done";

/// The four per-timer buttons, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Resumes the countdown.
    Start,
    /// Pauses the countdown, keeping what is left.
    Stop,
    /// Records a completed pomodoro and clears the display.
    Finish,
    /// Clears the display without recording anything.
    Reset,
}

impl Control {
    /// Every control, left to right.
    pub const ALL: [Control; 4] = [Control::Start, Control::Stop, Control::Finish, Control::Reset];

    /// Looks up a control by its button id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "start" => Some(Control::Start),
            "stop" => Some(Control::Stop),
            "finish" => Some(Control::Finish),
            "reset" => Some(Control::Reset),
            _ => None,
        }
    }

    /// The id used to press this control.
    pub fn id(self) -> &'static str {
        match self {
            Control::Start => "start",
            Control::Stop => "stop",
            Control::Finish => "finish",
            Control::Reset => "reset",
        }
    }

    /// Button text.
    pub fn label(self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Stop => "Stop",
            Control::Finish => "Finished",
            Control::Reset => "Reset",
        }
    }
}

/// Keys a focused timer responds to.
#[derive(Debug, Clone)]
pub struct TimerKeyMap {
    /// Moves button focus left, wrapping around.
    pub prev_button: Binding,
    /// Moves button focus right, wrapping around.
    pub next_button: Binding,
    /// Presses the focused button.
    pub press: Binding,
}

impl Default for TimerKeyMap {
    fn default() -> Self {
        Self {
            prev_button: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "prev button"),
            next_button: Binding::new(vec![KeyCode::Right, KeyCode::Char('l'), KeyCode::Tab])
                .with_help("→/l", "next button"),
            press: Binding::new(vec![KeyCode::Enter, KeyCode::Char(' ')])
                .with_help("enter", "press"),
        }
    }
}

/// One timer row.
#[derive(Debug, Clone)]
pub struct Model {
    /// Button navigation bindings.
    pub keymap: TimerKeyMap,
    display: time_display::Model,
    active: bool,
    finished: bool,
    button: usize,
    focused: bool,
}

/// Creates a timer counting down from `budget`, not started.
pub fn new(budget: Duration) -> Model {
    with_display(time_display::new(budget))
}

/// Wraps an existing display.
pub fn with_display(display: time_display::Model) -> Model {
    Model {
        keymap: TimerKeyMap::default(),
        display,
        active: false,
        finished: false,
        button: 0,
        focused: false,
    }
}

impl Model {
    /// Id of the owned display; messages for this timer carry it.
    pub fn id(&self) -> i64 {
        self.display.id()
    }

    /// The countdown this widget controls.
    pub fn display(&self) -> &time_display::Model {
        &self.display
    }

    /// Whether the countdown was started by this widget and is still running.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether the countdown ran out in the current cycle.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The button that `press` keys act on.
    pub fn focused_control(&self) -> Control {
        Control::ALL[self.button]
    }

    /// Presses the button with the given id. Unknown ids do nothing.
    pub fn press(&mut self, id: &str) -> Option<Cmd> {
        match Control::from_id(id) {
            Some(control) => self.apply(control),
            None => {
                tracing::trace!(timer = self.id(), id, "ignoring unknown control");
                None
            }
        }
    }

    /// Applies `control` to the display.
    pub fn apply(&mut self, control: Control) -> Option<Cmd> {
        tracing::debug!(timer = self.id(), control = control.id(), "control pressed");
        match control {
            Control::Start => {
                let cmd = self.display.start();
                self.active = self.display.running();
                cmd
            }
            Control::Stop => {
                self.display.stop();
                self.active = false;
                None
            }
            Control::Finish => {
                tracing::info!(
                    timer = self.id(),
                    remaining = %self.display.view(),
                    "pomodoro marked complete"
                );
                self.display.reset();
                self.finished = false;
                None
            }
            Control::Reset => {
                self.display.reset();
                self.finished = false;
                None
            }
        }
    }

    fn move_button(&mut self, forward: bool) {
        let n = Control::ALL.len();
        self.button = if forward {
            (self.button + 1) % n
        } else {
            (self.button + n - 1) % n
        };
    }

    /// Handles a finished notification for this timer, button keys while
    /// focused, and ticks for the owned display.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
            if finished.id == self.id() {
                tracing::info!(timer = self.id(), "countdown finished");
                self.finished = true;
                self.active = false;
            }
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if !self.focused {
                return None;
            }
            if self.keymap.prev_button.matches(key_msg) {
                self.move_button(false);
            } else if self.keymap.next_button.matches(key_msg) {
                self.move_button(true);
            } else if self.keymap.press.matches(key_msg) {
                return self.apply(self.focused_control());
            }
            return None;
        }

        self.display.update(msg)
    }

    /// Renders the buttons and the clock inside a bordered row.
    pub fn view(&self, theme: &Theme) -> String {
        let buttons: Vec<String> = Control::ALL
            .iter()
            .enumerate()
            .map(|(i, control)| {
                let style = if self.focused && i == self.button {
                    &theme.button_focused
                } else {
                    &theme.button
                };
                style.clone().inline(true).render(&format!("[{}]", control.label()))
            })
            .collect();

        let clock_style = if self.finished {
            &theme.clock_finished
        } else {
            &theme.clock
        };
        let mut clock = clock_style.clone().inline(true).render(&self.display.view());
        if self.finished {
            clock.push(' ');
            clock.push_str(&clock_style.clone().inline(true).render(FINISHED_MARK));
        }

        let frame = if self.finished {
            &theme.timer_finished
        } else if self.active {
            &theme.timer_active
        } else if self.focused {
            &theme.timer_selected
        } else {
            &theme.timer
        };
        frame.render(&format!("{}   {}", buttons.join(" "), clock))
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}
