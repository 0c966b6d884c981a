//! Console session
//!
//! A `TerminalSession` owns the input/output streams and keeps at most one
//! live "fixed line" (a progress bar or an action indicator) at the bottom of
//! the output. Every regular write erases that line, prints above it and then
//! redraws it, so log output and the live line never overwrite each other.
//!
//! ```text
//! TerminalSession
//! ├── OutputHistory (bounded log of emitted text)
//! ├── fixed line    (redrawn after every write, never logged)
//! ├── ProgressState (progress bar state machine)
//! └── ActionState   (dot animation state machine)
//! ```

pub mod action;
pub mod progress;

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::history::OutputHistory;
use crate::style::{format_escape, format_string, Color, Style, RESET};

pub use action::ActionState;
pub use progress::ProgressState;

/// Moves the cursor to the first column
const CURSOR_COLUMN_ZERO: &str = "\x1b[0G";

const BACKSPACE: char = '\x08';

/// Hint and rejection texts for interactive prompts
const MODAL_HINT: &str = " (Press Enter)";
const DIALOG_HINT: &str = " (Y/n) ";
const DIALOG_REJECT: &str = "Please, answer 'Yes' or 'No'";

/// Color used for secondary text (countdown, rejection message)
const GREY: Style = Style::Fg(Color::BrightWhite);
const HINT: Style = Style::Fg(Color::BrightGreen);

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl TerminalSize {
    /// Query the attached terminal, falling back to 80x24
    pub fn probe() -> Self {
        match crossterm::terminal::size() {
            Ok((width, height)) if width > 0 => Self { width, height },
            Ok(_) => Self::default(),
            Err(e) => {
                debug!("Terminal size unavailable ({}), using default", e);
                Self::default()
            }
        }
    }
}

/// Session bound to the process stdin/stdout
pub type StdioSession = TerminalSession<StdinLock<'static>, Stdout>;

/// Console session over an input and an output stream
pub struct TerminalSession<R, W> {
    input: R,
    output: W,
    size: TerminalSize,
    config: Config,
    history: OutputHistory,
    /// Live status line, redrawn after every write
    fixed_line: Option<String>,
    progress: Option<ProgressState>,
    action: Option<ActionState>,
}

impl StdioSession {
    /// Create a session on the process streams, probing the terminal size once
    pub fn stdio(config: Config) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), TerminalSize::probe(), config)
    }
}

impl<R: BufRead, W: Write> TerminalSession<R, W> {
    pub fn new(input: R, output: W, size: TerminalSize, config: Config) -> Self {
        debug!(
            "Console session created: {}x{}, history limit {}",
            size.width, size.height, config.history_max_count
        );
        Self {
            input,
            output,
            size,
            history: OutputHistory::new(config.history_max_count),
            config,
            fixed_line: None,
            progress: None,
            action: None,
        }
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn history(&self) -> &OutputHistory {
        &self.history
    }

    /// Currently displayed live line, if any
    pub fn fixed_line(&self) -> Option<&str> {
        self.fixed_line.as_deref()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write `text` verbatim and optionally record it in the history
    fn emit(&mut self, text: &str, log: bool) -> Result<()> {
        trace!(len = text.len(), log, "emit");
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;

        if log {
            // Pick up limit changes made through config_mut()
            self.history.set_max_entries(self.config.history_max_count);
            self.history.push(text);
        }
        Ok(())
    }

    /// Write `text` with optional styles, keeping the fixed line below it
    pub fn write(&mut self, text: &str, styles: &[Style]) -> Result<()> {
        let formatted = format_string(text, styles);

        let Some(fixed) = self.fixed_line.clone() else {
            return self.emit(&formatted, true);
        };

        self.erase_line()?;
        let mut chunk = formatted;
        // Checked on the unstyled text: a styled line already ending in '\n'
        // gets no second newline after its reset escape
        if !text.ends_with('\n') {
            chunk.push('\n');
        }
        self.emit(&chunk, true)?;
        self.emit(&fixed, false)
    }

    /// Same as `write` with a trailing newline
    pub fn write_line(&mut self, text: &str, styles: &[Style]) -> Result<()> {
        self.write(&format!("{}\n", text), styles)
    }

    /// Overtype the last `count` characters with spaces
    pub fn erase(&mut self, count: usize) -> Result<()> {
        let back = BACKSPACE.to_string().repeat(count);
        let erased = format!("{}{}{}", back, " ".repeat(count), back);
        self.emit(&erased, false)
    }

    /// Blank the current line and return the cursor to column 0
    pub fn erase_line(&mut self) -> Result<()> {
        let blank = format!(
            "{}{}{}",
            CURSOR_COLUMN_ZERO,
            " ".repeat(usize::from(self.size.width)),
            CURSOR_COLUMN_ZERO
        );
        self.emit(&blank, false)
    }

    /// Activate `styles` for all following output
    pub fn set_format(&mut self, styles: &[Style]) -> Result<()> {
        let escape = format_escape(styles);
        self.emit(&escape, false)
    }

    pub fn reset_format(&mut self) -> Result<()> {
        self.emit(RESET, false)
    }

    /// Read a line and return its first character
    pub fn read(&mut self) -> Result<Option<char>> {
        Ok(self.read_line()?.chars().next())
    }

    /// Read a line with surrounding whitespace removed.
    ///
    /// Closed input reads as an empty line.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("Input stream closed");
        }
        Ok(line.trim().to_string())
    }

    /// Show `text` and wait for Enter
    pub fn modal(&mut self, text: &str) -> Result<()> {
        self.write(text, &[Style::Bold])?;
        self.write(MODAL_HINT, &[HINT])?;
        self.read()?;
        Ok(())
    }

    /// Ask a yes/no question until an accepted answer is given.
    ///
    /// An empty answer counts as yes.
    pub fn dialog(&mut self, text: &str) -> Result<bool> {
        loop {
            self.write(text, &[Style::Bold])?;
            self.write(DIALOG_HINT, &[HINT])?;
            let answer = self.read_line()?;

            if self.config.answers.accepts(&answer) {
                return Ok(self.config.answers.is_positive(&answer));
            }
            debug!("Rejected dialog answer {:?}", answer);
            self.write_line(DIALOG_REJECT, &[Style::Italic, GREY])?;
        }
    }

    /// Show `text` and return the next input line
    pub fn prompt(&mut self, text: &str) -> Result<String> {
        self.write_line(text, &[Style::Bold])?;
        let invitation = self.config.user_invitation.clone();
        self.write(&invitation, &[])?;
        self.read_line()
    }

    /// Block for `seconds`, showing a self-erasing ` (N)` countdown
    pub fn sleep(&mut self, seconds: i64) -> Result<()> {
        if seconds <= 0 {
            return Ok(());
        }

        let total = Duration::from_secs(seconds.unsigned_abs());
        let started = Instant::now();
        loop {
            let remaining = total.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }

            let suffix = format!(" ({})", countdown_seconds(remaining));
            self.emit(&format_string(&suffix, &[GREY]), false)?;
            thread::sleep(remaining.min(Duration::from_secs(1)));
            self.erase(suffix.len())?;
        }
        Ok(())
    }

    /// Start a progress bar of `total` steps and draw it at 0%
    pub fn progress_start(&mut self, label: &str, total: u64) -> Result<()> {
        if total == 0 {
            return Err(ConsoleError::EmptyProgress);
        }
        debug!("Progress started: {} ({} steps)", label, total);
        self.progress = Some(ProgressState::new(label, total));
        self.progress_step()
    }

    /// Advance the progress bar by one step and redraw it
    pub fn progress_step(&mut self) -> Result<()> {
        let Some(progress) = self.progress.as_mut() else {
            debug!("progress_step without an active progress bar");
            return Ok(());
        };
        progress.advance();
        let line = progress.render(self.size.width);

        self.fixed_line = Some(line.clone());
        self.erase_line()?;
        self.emit(&line, false)
    }

    /// Stop redrawing the progress bar, leaving its last frame on screen
    pub fn progress_end(&mut self) -> Result<()> {
        if let Some(progress) = self.progress.take() {
            debug!(
                "Progress ended: {} at {}/{}",
                progress.label, progress.current, progress.total
            );
        }
        self.release_fixed_line()
    }

    /// Start the dot animation for `label`
    pub fn action_start(&mut self, label: &str) -> Result<()> {
        debug!("Action started: {}", label);
        self.action = Some(ActionState::new(label));
        self.action_step()
    }

    /// Draw the next animation frame
    pub fn action_step(&mut self) -> Result<()> {
        let Some(action) = self.action.as_mut() else {
            debug!("action_step without an active action");
            return Ok(());
        };
        let line = action.advance();

        self.erase_line()?;
        self.fixed_line = Some(line.clone());
        self.emit(&line, false)
    }

    /// Replace the animation with an OK/FAIL result line
    pub fn action_end(&mut self, success: bool) -> Result<()> {
        let Some(action) = self.action.take() else {
            debug!("action_end without an active action");
            return Ok(());
        };
        debug!("Action ended: {} (success: {})", action.label, success);

        self.erase_line()?;
        self.fixed_line = None;
        self.emit(&action.finish_line(success), true)?;
        self.emit("\n", false)
    }

    /// Drop the fixed line and move below its last frame
    fn release_fixed_line(&mut self) -> Result<()> {
        if self.fixed_line.take().is_some() {
            self.emit("\n", false)?;
        }
        Ok(())
    }
}

/// Whole seconds left, rounded up
fn countdown_seconds(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type TestSession = TerminalSession<Cursor<Vec<u8>>, Vec<u8>>;

    const WIDTH: u16 = 40;

    fn session_with_input(input: &str) -> TestSession {
        TerminalSession::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            TerminalSize {
                width: WIDTH,
                height: 24,
            },
            Config::default(),
        )
    }

    fn session() -> TestSession {
        session_with_input("")
    }

    fn output(session: &TestSession) -> String {
        String::from_utf8_lossy(session.output()).into_owned()
    }

    fn blank_line() -> String {
        format!("\x1b[0G{}\x1b[0G", " ".repeat(usize::from(WIDTH)))
    }

    #[test]
    fn test_plain_write_goes_to_history() {
        let mut s = session();
        s.write("hello", &[]).unwrap();
        s.write_line("world", &[Style::Bold]).unwrap();

        assert_eq!(output(&s), "hello\x1b[1mworld\n\x1b[0m");
        assert_eq!(
            s.history().iter().collect::<Vec<_>>(),
            vec!["hello", "\x1b[1mworld\n\x1b[0m"]
        );
    }

    #[test]
    fn test_history_keeps_last_writes() {
        let mut s = session();
        s.config_mut().history_max_count = 3;
        for i in 0..10 {
            s.write(&i.to_string(), &[]).unwrap();
            assert!(s.history().len() <= 3);
        }
        assert_eq!(s.history().iter().collect::<Vec<_>>(), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_write_redraws_fixed_line() {
        let mut s = session();
        s.progress_start("Load", 4).unwrap();
        let bar = s.fixed_line().unwrap().to_string();
        s.output_mut().clear();

        s.write_line("first", &[]).unwrap();
        s.write("second", &[]).unwrap();

        let expected = format!(
            "{blank}first\n{bar}{blank}second\n{bar}",
            blank = blank_line(),
            bar = bar
        );
        assert_eq!(output(&s), expected);
        // Live line never lands in the history
        assert_eq!(
            s.history().iter().collect::<Vec<_>>(),
            vec!["first\n", "second\n"]
        );
    }

    #[test]
    fn test_styled_line_above_fixed_line_gets_single_newline() {
        let mut s = session();
        s.action_start("Build").unwrap();
        s.output_mut().clear();

        s.write_line("note", &[Style::Italic]).unwrap();
        assert_eq!(
            s.history().last(),
            Some("\x1b[3mnote\n\x1b[0m")
        );
    }

    #[test]
    fn test_erase() {
        let mut s = session();
        s.erase(2).unwrap();
        s.erase_line().unwrap();
        assert_eq!(output(&s), format!("\x08\x08  \x08\x08{}", blank_line()));
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_set_and_reset_format() {
        let mut s = session();
        s.set_format(&[Style::Underline, Style::Bg(Color::Blue)]).unwrap();
        s.reset_format().unwrap();
        assert_eq!(output(&s), "\x1b[4m\x1b[44m\x1b[0m");
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_read_and_read_line() {
        let mut s = session_with_input("  yes please \n\nabc\n");
        assert_eq!(s.read_line().unwrap(), "yes please");
        assert_eq!(s.read().unwrap(), None);
        assert_eq!(s.read().unwrap(), Some('a'));
        // Closed input
        assert_eq!(s.read_line().unwrap(), "");
        assert_eq!(s.read().unwrap(), None);
    }

    #[test]
    fn test_dialog_answers() {
        for answer in ["", "y", "Y", "yes", "Yes", "YES"] {
            let mut s = session_with_input(&format!("{}\n", answer));
            assert!(s.dialog("Continue?").unwrap(), "answer {:?}", answer);
        }
        for answer in ["n", "N", "no", "No", "NO"] {
            let mut s = session_with_input(&format!("{}\n", answer));
            assert!(!s.dialog("Continue?").unwrap(), "answer {:?}", answer);
        }
    }

    #[test]
    fn test_dialog_reprompts_on_invalid_answer() {
        let mut s = session_with_input("maybe\nyEs\nno\n");
        assert!(!s.dialog("Continue?").unwrap());

        let out = output(&s);
        assert_eq!(out.matches("Please, answer 'Yes' or 'No'").count(), 2);
        assert_eq!(out.matches("Continue?").count(), 3);
        assert!(out.starts_with("\x1b[1mContinue?\x1b[0m\x1b[92m (Y/n) \x1b[0m"));
    }

    #[test]
    fn test_dialog_custom_answers() {
        let mut s = session_with_input("yes\nja\n");
        s.config_mut().answers.positive = vec!["ja".to_string()];
        assert!(s.dialog("Weiter?").unwrap());
    }

    #[test]
    fn test_modal() {
        let mut s = session_with_input("\n");
        s.modal("Ready").unwrap();
        assert_eq!(
            output(&s),
            "\x1b[1mReady\x1b[0m\x1b[92m (Press Enter)\x1b[0m"
        );
    }

    #[test]
    fn test_prompt() {
        let mut s = session_with_input("  Some Name \n");
        assert_eq!(s.prompt("Name?").unwrap(), "Some Name");
        assert_eq!(output(&s), "\x1b[1mName?\n\x1b[0m> ");

        let mut s = session_with_input("x\n");
        s.config_mut().user_invitation = "$ ".to_string();
        s.prompt("Cmd").unwrap();
        assert!(output(&s).ends_with("$ "));
    }

    #[test]
    fn test_sleep_non_positive_is_noop() {
        let mut s = session();
        let started = Instant::now();
        s.sleep(0).unwrap();
        s.sleep(-1).unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(s.output().is_empty());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_sleep_countdown_erases_itself() {
        let mut s = session();
        s.sleep(1).unwrap();
        assert_eq!(
            output(&s),
            "\x1b[97m (1)\x1b[0m\x08\x08\x08\x08    \x08\x08\x08\x08"
        );
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_countdown_seconds_rounds_up() {
        assert_eq!(countdown_seconds(Duration::from_millis(1)), 1);
        assert_eq!(countdown_seconds(Duration::from_secs(2)), 2);
        assert_eq!(countdown_seconds(Duration::from_millis(2001)), 3);
        // Largest accepted sleep needs no instant arithmetic
        let total = Duration::from_secs(i64::MAX.unsigned_abs());
        let remaining = total.saturating_sub(Duration::from_millis(1500));
        assert_eq!(countdown_seconds(remaining), i64::MAX.unsigned_abs() - 1);
    }

    #[test]
    fn test_history_limit_follows_config() {
        let mut s = session();
        assert_eq!(s.history().max_entries(), 50);
        s.config_mut().history_max_count = 2;
        s.write("a", &[]).unwrap();
        assert_eq!(s.history().max_entries(), 2);
    }

    #[test]
    fn test_progress_steps() {
        let mut s = session();
        s.progress_start("Load", 4).unwrap();
        let mut seen = vec![s.fixed_line().unwrap().to_string()];
        for _ in 0..4 {
            s.progress_step().unwrap();
            seen.push(s.fixed_line().unwrap().to_string());
        }

        let tails: Vec<&str> = seen
            .iter()
            .map(|line| line.rsplit("] - ").next().unwrap())
            .collect();
        assert_eq!(
            tails,
            vec!["0% (0/4)", "25% (1/4)", "50% (2/4)", "75% (3/4)", "100% (4/4)"]
        );
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_progress_overrun_is_capped() {
        let mut s = session();
        s.progress_start("Load", 2).unwrap();
        for _ in 0..5 {
            s.progress_step().unwrap();
            let line = s.fixed_line().unwrap();
            let percent: u32 = line
                .rsplit("] - ")
                .next()
                .and_then(|tail| tail.split('%').next())
                .unwrap()
                .parse()
                .unwrap();
            assert!(percent <= 100);
        }
        assert!(s.fixed_line().unwrap().ends_with("- 100% (5/2)"));
    }

    #[test]
    fn test_progress_start_draws_first_frame() {
        let mut s = session();
        s.progress_start("Load", 4).unwrap();
        let bar = format!("Load [>{}] - 0% (0/4)", " ".repeat(19));
        assert_eq!(output(&s), format!("{}{}", blank_line(), bar));
        assert_eq!(s.fixed_line(), Some(bar.as_str()));
    }

    #[test]
    fn test_progress_zero_total() {
        let mut s = session();
        assert!(matches!(
            s.progress_start("Nothing", 0),
            Err(ConsoleError::EmptyProgress)
        ));
        assert!(s.fixed_line().is_none());
    }

    #[test]
    fn test_progress_end() {
        let mut s = session();
        s.progress_start("Load", 1).unwrap();
        s.progress_step().unwrap();
        s.output_mut().clear();

        s.progress_end().unwrap();
        assert!(s.fixed_line().is_none());
        assert_eq!(output(&s), "\n");
        assert!(s.history().is_empty());

        // Further writes go straight through
        s.write("after", &[]).unwrap();
        assert_eq!(output(&s), "\nafter");
        // Steps after the end change nothing
        s.progress_step().unwrap();
        assert_eq!(output(&s), "\nafter");
    }

    #[test]
    fn test_action_frames() {
        let mut s = session();
        s.action_start("Build").unwrap();
        let mut dots = vec![s.fixed_line().unwrap().matches('.').count()];
        for _ in 0..5 {
            s.action_step().unwrap();
            dots.push(s.fixed_line().unwrap().matches('.').count());
        }
        assert_eq!(dots, vec![0, 1, 2, 3, 1, 2]);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_action_end_success() {
        let mut s = session();
        s.action_start("X").unwrap();
        s.action_end(true).unwrap();

        assert!(s.fixed_line().is_none());
        assert_eq!(s.history().len(), 1);
        let entry = s.history().last().unwrap();
        assert!(entry.contains("OK"));
        assert!(entry.contains('X'));
        assert_eq!(entry, "[\x1b[92mOK\x1b[0m]   X");
        // Result line and its line break both reach the screen
        assert_eq!(
            output(&s),
            format!("{}[   ]  X{}[\x1b[92mOK\x1b[0m]   X\n", blank_line(), blank_line())
        );
    }

    #[test]
    fn test_action_end_failure() {
        let mut s = session();
        s.action_start("Upload").unwrap();
        s.action_step().unwrap();
        s.output_mut().clear();

        s.action_end(false).unwrap();
        assert_eq!(
            output(&s),
            format!("{}[\x1b[91mFAIL\x1b[0m] Upload\n", blank_line())
        );
    }

    #[test]
    fn test_action_replaces_progress_line() {
        let mut s = session();
        s.progress_start("Load", 4).unwrap();
        s.action_start("Check").unwrap();
        assert_eq!(s.fixed_line(), Some("[   ]  Check"));

        s.output_mut().clear();
        s.write_line("log", &[]).unwrap();
        assert_eq!(
            output(&s),
            format!("{}log\n[   ]  Check", blank_line())
        );
    }

    #[test]
    fn test_write_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut s = TerminalSession::new(
            Cursor::new(Vec::<u8>::new()),
            Broken,
            TerminalSize::default(),
            Config::default(),
        );
        assert!(matches!(s.write("x", &[]), Err(ConsoleError::Io(_))));
        assert!(s.history().is_empty());
    }
}
