//! Footer that lists the active key bindings.
//!
//! Any type implementing [`KeyMap`] can be rendered in a short single-line
//! form or a full multi-column form:
//!
//! ```text
//! d dark mode • a add • r remove • q quit • ? more
//! ```

use crate::key;
use crate::theme::DisplayMode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Bindings a component exposes to the footer.
pub trait KeyMap {
    /// Bindings shown in the single-line footer.
    fn short_help(&self) -> Vec<&key::Binding>;
    /// Bindings grouped into columns for the expanded footer.
    fn full_help(&self) -> Vec<Vec<&key::Binding>>;
}

/// Styles for the help footer.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style for the ellipsis shown when items are cut off.
    pub ellipsis: Style,
    /// Style for key names.
    pub key: Style,
    /// Style for descriptions.
    pub desc: Style,
    /// Style for separators between items.
    pub separator: Style,
}

impl Styles {
    /// Footer palette for the given display mode.
    pub fn for_mode(mode: DisplayMode) -> Self {
        let (key, desc, sep) = match mode {
            DisplayMode::Dark => ("#626262", "#4A4A4A", "#3C3C3C"),
            DisplayMode::Light => ("#909090", "#B2B2B2", "#DDDADA"),
        };
        let sep_style = Style::new().foreground(Color::from(sep));
        Self {
            ellipsis: sep_style.clone(),
            key: Style::new().foreground(Color::from(key)),
            desc: Style::new().foreground(Color::from(desc)),
            separator: sep_style,
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::for_mode(DisplayMode::Dark)
    }
}

/// Help footer state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Shows the full multi-column help instead of the single line.
    pub show_all: bool,
    /// Maximum width in columns. Zero means unlimited.
    pub width: usize,
    /// Separator between items in the short view.
    pub short_separator: String,
    /// Separator between columns in the full view.
    pub full_separator: String,
    /// Shown when the short view runs out of room.
    pub ellipsis: String,
    /// Rendering styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a short-mode footer with no width limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders `keymap` in the current mode.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders bindings on one line, truncated with the ellipsis to fit `width`.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let mut builder = String::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        for kb in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let help = kb.help();
            let item = format!(
                "{}{} {}",
                sep,
                self.styles.key.clone().inline(true).render(&help.key),
                self.styles.desc.clone().inline(true).render(&help.desc)
            );
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.should_add_item(total_width, item_width) {
                builder.push_str(&tail);
                break;
            }
            total_width += item_width;
            builder.push_str(&item);
        }
        builder
    }

    /// Renders each group as a column. Columns that do not fit are dropped.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let mut columns = Vec::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.full_separator);

        for group in groups.iter().filter(|g| g.iter().any(|b| b.enabled())) {
            let rows: Vec<String> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| {
                    let help = b.help();
                    format!(
                        "{} {}",
                        self.styles.key.clone().inline(true).render(&help.key),
                        self.styles.desc.clone().inline(true).render(&help.desc)
                    )
                })
                .collect();
            let column = rows.join("\n");
            let col_width = lipgloss::width_visible(&column);

            if let Some(tail) = self.should_add_item(total_width, col_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += col_width;
            columns.push(column);
        }

        let mut parts = Vec::new();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(col.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    /// Returns `Some(tail)` when the item would overflow `width`.
    fn should_add_item(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width > 0 && total_width + item_width > self.width {
            let tail = format!(
                " {}",
                self.styles
                    .ellipsis
                    .clone()
                    .inline(true)
                    .render(&self.ellipsis)
            );
            if total_width + lipgloss::width_visible(&tail) < self.width {
                return Some(tail);
            }
            return Some(String::new());
        }
        None
    }
}
