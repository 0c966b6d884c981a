//! Progress bar state
//!
//! Renders lines of the form `Load [=====>     ] - 50% (2/4)` sized to the
//! terminal width.

use unicode_width::UnicodeWidthStr;

/// Columns taken by the brackets, marker, separators and percent text
const DECORATION_WIDTH: usize = 15;

/// A running progress bar
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub label: String,
    /// Completed steps; -1 until the first step
    pub current: i64,
    /// Steps expected in total (never zero)
    pub total: u64,
}

impl ProgressState {
    pub fn new(label: impl Into<String>, total: u64) -> Self {
        Self {
            label: label.into(),
            current: -1,
            total,
        }
    }

    /// Count one more step
    pub fn advance(&mut self) {
        self.current += 1;
    }

    /// Completion in percent, capped at 100
    pub fn percent(&self) -> f64 {
        let percent = self.current as f64 * 100.0 / self.total as f64;
        percent.min(100.0)
    }

    /// Columns available for the bar body at the given terminal width
    pub fn bar_width(&self, term_width: u16) -> usize {
        let digits = self.total.to_string().len();
        let reserved = digits * 2 + self.label.width() + DECORATION_WIDTH;
        usize::from(term_width).saturating_sub(reserved)
    }

    /// Render the bar for a terminal `term_width` columns wide.
    ///
    /// The filled part rounds up and the blank part rounds down, so the body
    /// may be one column wider than `bar_width` mid-way.
    pub fn render(&self, term_width: u16) -> String {
        let percent = self.percent();
        let bar_width = self.bar_width(term_width) as f64;
        let bar_length = bar_width * percent / 100.0;
        let filled = bar_length.max(0.0).ceil() as usize;
        let blank = (bar_width - bar_length).max(0.0).floor() as usize;

        format!(
            "{} [{}>{}] - {}% ({}/{})",
            self.label,
            "=".repeat(filled),
            " ".repeat(blank),
            percent as i64,
            self.current,
            self.total,
        )
    }
}
