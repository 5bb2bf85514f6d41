//! Dark and light presentation of the application.
//!
//! The display mode is plain application state owned by the root model and
//! handed to every render call, never a global.

use crate::help;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Dark or light colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    /// Light text on a dark terminal.
    Dark,
    /// Dark text on a light terminal.
    Light,
}

impl DisplayMode {
    /// The other mode.
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }

    /// Whether this is the dark mode.
    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }
}

/// Styles used by the timer list, the quit dialog and the footer.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Mode these styles were built for.
    pub mode: DisplayMode,
    /// Title in the header line.
    pub header: Style,
    /// Frame of an idle timer.
    pub timer: Style,
    /// Frame of the selected timer.
    pub timer_selected: Style,
    /// Frame of a running timer.
    pub timer_active: Style,
    /// Frame of a timer whose countdown ran out.
    pub timer_finished: Style,
    /// Timer button.
    pub button: Style,
    /// Timer button under keyboard focus.
    pub button_focused: Style,
    /// Countdown text.
    pub clock: Style,
    /// Countdown text once finished.
    pub clock_finished: Style,
    /// Frame of the quit dialog.
    pub dialog: Style,
    /// Quit button.
    pub dialog_quit: Style,
    /// Cancel button.
    pub dialog_cancel: Style,
    /// Footer styles.
    pub help: help::Styles,
}

struct Palette {
    text: &'static str,
    muted: &'static str,
    border: &'static str,
    accent: &'static str,
    success: &'static str,
    error: &'static str,
    highlight: &'static str,
}

const DARK: Palette = Palette {
    text: "#dddddd",
    muted: "#777777",
    border: "#3C3C3C",
    accent: "#EE6FF8",
    success: "#04B575",
    error: "#FF5F87",
    highlight: "62",
};

const LIGHT: Palette = Palette {
    text: "#1a1a1a",
    muted: "#9B9B9B",
    border: "#DDDADA",
    accent: "#AD58B4",
    success: "#02A060",
    error: "#D7005F",
    highlight: "25",
};

fn boxed(border: &str) -> Style {
    Style::new()
        .border_style(lipgloss::normal_border())
        .border_top(true)
        .border_bottom(true)
        .border_left(true)
        .border_right(true)
        .border_foreground(Color::from(border))
        .padding(0, 1, 0, 1)
}

impl Theme {
    /// Builds the styles for `mode`.
    pub fn for_mode(mode: DisplayMode) -> Self {
        let p = match mode {
            DisplayMode::Dark => &DARK,
            DisplayMode::Light => &LIGHT,
        };
        Self {
            mode,
            header: Style::new()
                .bold(true)
                .foreground(Color::from(p.accent))
                .padding(0, 1, 0, 1),
            timer: boxed(p.border),
            timer_selected: boxed(p.accent),
            timer_active: boxed(p.success),
            timer_finished: boxed(p.error),
            button: Style::new().foreground(Color::from(p.muted)).padding(0, 1, 0, 1),
            button_focused: Style::new()
                .bold(true)
                .reverse(true)
                .foreground(Color::from(p.accent))
                .padding(0, 1, 0, 1),
            clock: Style::new().bold(true).foreground(Color::from(p.text)),
            clock_finished: Style::new().bold(true).foreground(Color::from(p.error)),
            dialog: boxed(p.accent).padding(1, 2, 1, 2),
            dialog_quit: Style::new().foreground(Color::from(p.error)).padding(0, 1, 0, 1),
            dialog_cancel: Style::new()
                .foreground(Color::from(p.highlight))
                .padding(0, 1, 0, 1),
            help: help::Styles::for_mode(mode),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(DisplayMode::default())
    }
}
