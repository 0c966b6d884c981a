//! ANSI SGR styling
//!
//! Every style maps to one numeric SGR code rendered as `ESC[<code>m`.

/// SGR sequence that clears all active styles
pub const RESET: &str = "\x1b[0m";

/// The 16 ANSI palette colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Offset inside the 8-color group and whether it is the bright variant
    fn index(self) -> (u8, bool) {
        match self {
            Color::Black => (0, false),
            Color::Red => (1, false),
            Color::Green => (2, false),
            Color::Yellow => (3, false),
            Color::Blue => (4, false),
            Color::Magenta => (5, false),
            Color::Cyan => (6, false),
            Color::White => (7, false),
            Color::BrightBlack => (0, true),
            Color::BrightRed => (1, true),
            Color::BrightGreen => (2, true),
            Color::BrightYellow => (3, true),
            Color::BrightBlue => (4, true),
            Color::BrightMagenta => (5, true),
            Color::BrightCyan => (6, true),
            Color::BrightWhite => (7, true),
        }
    }
}

/// A single text style: a foreground color, a background color or an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Fg(Color),
    Bg(Color),
    Reset,
    Bold,
    Italic,
    Underline,
    Reverse,
    Strikethrough,
}

impl Style {
    /// Numeric SGR parameter for this style
    pub fn code(self) -> u8 {
        match self {
            Style::Fg(color) => match color.index() {
                (i, false) => 30 + i,
                (i, true) => 90 + i,
            },
            Style::Bg(color) => match color.index() {
                (i, false) => 40 + i,
                (i, true) => 100 + i,
            },
            Style::Reset => 0,
            Style::Bold => 1,
            Style::Italic => 3,
            Style::Underline => 4,
            Style::Reverse => 7,
            Style::Strikethrough => 9,
        }
    }
}

/// Concatenated escape sequences for `styles`, in order
pub fn format_escape(styles: &[Style]) -> String {
    styles
        .iter()
        .map(|s| format!("\x1b[{}m", s.code()))
        .collect()
}

/// Wrap `text` in the escapes for `styles` followed by a reset.
///
/// With no styles the text comes back untouched.
pub fn format_string(text: &str, styles: &[Style]) -> String {
    if styles.is_empty() {
        return text.to_string();
    }
    format!("{}{}{}", format_escape(styles), text, RESET)
}
