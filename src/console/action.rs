//! Action indicator state
//!
//! Animates `[.  ]  label` while an action runs and renders the final
//! `[OK]   label` / `[FAIL] label` line when it ends.

use crate::style::{format_string, Color, Style};

/// Number of dots in a full animation frame
const MAX_DOTS: usize = 3;

/// Width the bracketed result is padded to
const RESULT_WIDTH: usize = 5;

/// A running action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub label: String,
    /// Dot count of the next frame
    pub frame: usize,
}

impl ActionState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            frame: 0,
        }
    }

    /// Render the current frame and move to the next one.
    ///
    /// Frames go 0, 1, 2, 3 and then cycle through 1, 2, 3.
    pub fn advance(&mut self) -> String {
        let line = format!(
            "[{:<width$}]  {}",
            ".".repeat(self.frame),
            self.label,
            width = MAX_DOTS
        );
        self.frame += 1;
        if self.frame > MAX_DOTS {
            self.frame = 1;
        }
        line
    }

    /// Result line shown once the action is over
    pub fn finish_line(&self, success: bool) -> String {
        let (result, color) = if success {
            ("OK", Color::BrightGreen)
        } else {
            ("FAIL", Color::BrightRed)
        };
        format!(
            "[{}]{}{}",
            format_string(result, &[Style::Fg(color)]),
            " ".repeat(RESULT_WIDTH - result.len()),
            self.label
        )
    }
}
