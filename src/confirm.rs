//! Modal dialog asking whether to quit.
//!
//! The dialog does not exit the program itself; [`Model::update`] reports a
//! [`Decision`] and the owner acts on it. Before reporting either outcome the
//! dialog blurs, so nothing keeps pointing at a button that is about to go
//! away.

use crate::help::KeyMap;
use crate::key::Binding;
use crate::theme::Theme;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;

/// Text shown above the buttons.
pub const QUESTION: &str = "Are you sure you want to quit?";

/// A dialog button, and the outcome pressing it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Exit the program.
    Quit,
    /// Close the dialog and carry on.
    Cancel,
}

/// Keys the dialog responds to.
#[derive(Debug, Clone)]
pub struct ConfirmKeyMap {
    /// Confirms quitting.
    pub quit: Binding,
    /// Dismisses the dialog.
    pub cancel: Binding,
    /// Moves focus to the other button.
    pub switch: Binding,
    /// Presses the focused button.
    pub press: Binding,
}

impl Default for ConfirmKeyMap {
    fn default() -> Self {
        Self {
            quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
            cancel: Binding::new(vec![KeyCode::Char('c'), KeyCode::Esc]).with_help("c", "cancel"),
            switch: Binding::new(vec![
                KeyCode::Left,
                KeyCode::Right,
                KeyCode::Tab,
                KeyCode::Char('h'),
                KeyCode::Char('l'),
            ])
            .with_help("←/→", "switch"),
            press: Binding::new(vec![KeyCode::Enter, KeyCode::Char(' ')]).with_help("enter", "press"),
        }
    }
}

impl KeyMap for ConfirmKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.quit, &self.cancel, &self.switch]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.quit, &self.cancel], vec![&self.switch, &self.press]]
    }
}

/// The quit dialog.
#[derive(Debug, Clone)]
pub struct Model {
    /// Dialog bindings.
    pub keymap: ConfirmKeyMap,
    focus: Option<Decision>,
}

/// Creates a dialog with no button focused.
pub fn new() -> Model {
    Model {
        keymap: ConfirmKeyMap::default(),
        focus: None,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// The button that currently holds focus, if any.
    pub fn focused_choice(&self) -> Option<Decision> {
        self.focus
    }

    fn decide(&mut self, decision: Decision) -> Option<Decision> {
        self.blur();
        Some(decision)
    }

    /// Handles a key press while the dialog is open.
    pub fn update(&mut self, msg: &Msg) -> Option<Decision> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.quit.matches(key_msg) {
            return self.decide(Decision::Quit);
        }
        if self.keymap.cancel.matches(key_msg) {
            return self.decide(Decision::Cancel);
        }
        if self.keymap.switch.matches(key_msg) {
            self.focus = Some(match self.focus {
                Some(Decision::Quit) => Decision::Cancel,
                _ => Decision::Quit,
            });
            return None;
        }
        if self.keymap.press.matches(key_msg) {
            return match self.focus {
                Some(decision) => self.decide(decision),
                None => None,
            };
        }
        None
    }

    /// Renders the question and both buttons.
    pub fn view(&self, theme: &Theme) -> String {
        let button = |choice: Decision, label: &str| {
            let base = match choice {
                Decision::Quit => &theme.dialog_quit,
                Decision::Cancel => &theme.dialog_cancel,
            };
            let style = base.clone().reverse(self.focus == Some(choice));
            style.inline(true).render(&format!("[{}]", label))
        };
        let quit = button(Decision::Quit, "Quit (q)");
        let cancel = button(Decision::Cancel, "Cancel (c)");
        let buttons =
            lipgloss::join_horizontal(lipgloss::TOP, &[quit.as_str(), "  ", cancel.as_str()]);
        theme.dialog.render(&format!("{}\n\n{}", QUESTION, buttons))
    }
}

impl Component for Model {
    /// Focuses the cancel button, the safe default.
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = Some(Decision::Cancel);
        None
    }

    fn blur(&mut self) {
        self.focus = None;
    }

    fn focused(&self) -> bool {
        self.focus.is_some()
    }
}
