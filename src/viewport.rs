//! Vertical scroll container for the timer list.
//!
//! The viewport holds pre-rendered lines and shows a window of `height` of
//! them starting at `y_offset`. Callers that know which line range belongs to
//! the selected item use [`Model::scroll_into_view`] to keep it on screen.
//!
//! ```rust
//! use bubbletea_pomodoro::viewport;
//!
//! let mut vp = viewport::new(20, 2);
//! vp.set_content("one\ntwo\nthree\nfour");
//! vp.scroll_into_view(3, 4);
//! assert_eq!(vp.visible_lines(), vec!["three", "four"]);
//! ```

use crate::key::Binding;
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss::{self, Style};

const RESET: &str = "\x1b[0m";

/// Key bindings for paging through the viewport.
#[derive(Debug, Clone)]
pub struct ViewportKeyMap {
    /// Scrolls down by one page.
    pub page_down: Binding,
    /// Scrolls up by one page.
    pub page_up: Binding,
}

impl Default for ViewportKeyMap {
    fn default() -> Self {
        Self {
            page_down: Binding::new(vec![KeyCode::PageDown]).with_help("pgdn", "page down"),
            page_up: Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "page up"),
        }
    }
}

/// A window of `height` lines over pre-rendered content.
#[derive(Debug, Clone)]
pub struct Model {
    /// Visible columns. Wider lines are clipped; zero disables clipping.
    pub width: usize,
    /// Number of visible lines.
    pub height: usize,
    /// Index of the first visible line.
    pub y_offset: usize,
    /// Page up / page down bindings.
    pub keymap: ViewportKeyMap,
    lines: Vec<String>,
}

/// Creates an empty viewport of the given size.
pub fn new(width: usize, height: usize) -> Model {
    Model {
        width,
        height,
        y_offset: 0,
        keymap: ViewportKeyMap::default(),
        lines: Vec::new(),
    }
}

impl Model {
    /// Resizes the window, clamping the offset to the new bounds.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.set_y_offset(self.y_offset);
    }

    /// Replaces the content with the lines of `content`.
    pub fn set_content(&mut self, content: &str) {
        let content = content.replace("\r\n", "\n");
        self.set_content_lines(content.split('\n').map(str::to_string).collect());
    }

    /// Replaces the content. Moves to the bottom if the old offset no longer fits.
    pub fn set_content_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        if self.y_offset > self.max_y_offset() {
            self.goto_bottom();
        }
    }

    /// All content lines, visible or not.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the first line is visible.
    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    /// Whether the last line is visible.
    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    /// Sets the offset, clamped to the content.
    pub fn set_y_offset(&mut self, n: usize) {
        self.y_offset = n.min(self.max_y_offset());
    }

    /// Scrolls down by `n` lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset + n);
    }

    /// Scrolls up by `n` lines.
    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    /// Jumps to the first line.
    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    /// Jumps so the last line sits at the bottom.
    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Scrolls the minimum amount needed to show lines `top..bottom`.
    ///
    /// When the range is taller than the viewport its top edge wins.
    pub fn scroll_into_view(&mut self, top: usize, bottom: usize) {
        if bottom > self.y_offset + self.height {
            self.set_y_offset(bottom.saturating_sub(self.height));
        }
        if top < self.y_offset {
            self.set_y_offset(top);
        }
    }

    /// The lines currently on screen, each clipped to `width` visible columns.
    ///
    /// Styled lines are measured without their escape sequences, and a clipped
    /// styled line is closed with a reset so its colours stop at the edge.
    pub fn visible_lines(&self) -> Vec<String> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        let top = self.y_offset.min(self.lines.len());
        let bottom = (self.y_offset + self.height).min(self.lines.len());
        self.lines[top..bottom]
            .iter()
            .map(|line| {
                if self.width == 0 || lipgloss::width_visible(line) <= self.width {
                    line.clone()
                } else {
                    clip(line, self.width)
                }
            })
            .collect()
    }

    fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    /// Handles page keys. Returns `true` when the message was consumed.
    pub fn update(&mut self, msg: &Msg) -> bool {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        if self.keymap.page_down.matches(key_msg) {
            self.scroll_down(self.height);
            true
        } else if self.keymap.page_up.matches(key_msg) {
            self.scroll_up(self.height);
            true
        } else {
            false
        }
    }

    /// Renders the visible lines.
    pub fn view(&self) -> String {
        self.visible_lines().join("\n")
    }
}

impl Default for Model {
    fn default() -> Self {
        new(0, 0)
    }
}

fn clip(line: &str, width: usize) -> String {
    let mut out = Style::truncate_visible_line(line, width);
    if out.contains('\x1b') && !out.ends_with(RESET) {
        out.push_str(RESET);
    }
    out
}
