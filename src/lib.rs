//! fixline - console helper with styled output, prompts and a live status line
//!
//! # Features
//!
//! - **Styled output**: 16 foreground and 16 background colors plus text attributes
//! - **Fixed line**: a progress bar or action indicator kept below all other output
//! - **Prompts**: press-enter modal, yes/no dialog, free text prompt
//! - **Countdown**: blocking sleep with a self-erasing ` (N)` suffix
//! - **History**: bounded log of everything written
//!
//! # Example
//!
//! ```no_run
//! use fixline::{Config, StdioSession, Style};
//!
//! let mut console = StdioSession::stdio(Config::load());
//! console.progress_start("Copy", 3)?;
//! for file in ["a", "b", "c"] {
//!     console.write_line(&format!("copied {}", file), &[Style::Italic])?;
//!     console.progress_step()?;
//! }
//! console.progress_end()?;
//! # Ok::<(), fixline::ConsoleError>(())
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod style;

pub use config::{AnswerConfig, Config};
pub use console::{ActionState, ProgressState, StdioSession, TerminalSession, TerminalSize};
pub use error::{ConsoleError, Result};
pub use history::OutputHistory;
pub use style::{format_escape, format_string, Color, Style};
