//! fixline - demo of the console helper
//!
//! Walks through styled output, an action indicator, a progress bar with log
//! lines printed above it, a countdown and the interactive prompts.
//!
//! # Quick Start
//!
//! ```text
//! fixline                # Full demo, including prompts
//! fixline --no-input     # Skip everything that reads stdin
//! fixline --steps 40     # Longer progress bar
//! ```

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fixline::config::ensure_data_dir;
use fixline::{Color, Config, StdioSession, Style};

/// Demo options
struct Options {
    /// Skip modal/dialog/prompt
    no_input: bool,
    /// Countdown length in seconds
    sleep: i64,
    /// Progress bar steps
    steps: u64,
    /// Write the effective config to ~/.fixline/config.toml and exit
    save_config: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            no_input: false,
            sleep: 3,
            steps: 20,
            save_config: false,
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    eprintln!("fixline {} - console helper demo", VERSION);
    eprintln!();
    eprintln!("Usage: fixline [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-input            Skip modal, dialog and prompt");
    eprintln!("  --sleep <SECONDS>     Countdown length (default: 3)");
    eprintln!("  --steps <N>           Progress bar steps (default: 20)");
    eprintln!("  --save-config         Write the current config file and exit");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Configuration: ~/.fixline/config.toml");
    eprintln!("Log file:      ~/.fixline/fixline.log (level from FIXLINE_LOG)");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                eprintln!("fixline {}", VERSION);
                std::process::exit(0);
            }
            "--no-input" => {
                options.no_input = true;
            }
            "--save-config" => {
                options.save_config = true;
            }
            "--sleep" => {
                i += 1;
                let value = args.get(i).ok_or("Missing --sleep argument")?;
                options.sleep = value
                    .parse()
                    .map_err(|_| format!("Invalid --sleep value: {}", value))?;
            }
            "--steps" => {
                i += 1;
                let value = args.get(i).ok_or("Missing --steps argument")?;
                options.steps = value
                    .parse()
                    .map_err(|_| format!("Invalid --steps value: {}", value))?;
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Send tracing output to ~/.fixline/fixline.log so it never mixes with stdout
fn init_logging() {
    let log_path = match ensure_data_dir() {
        Some(dir) => dir.join("fixline.log"),
        None => {
            eprintln!("Warning: ~/.fixline unavailable, logging to ./fixline.log");
            std::path::PathBuf::from("fixline.log")
        }
    };

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("FIXLINE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("fixline {} starting", VERSION);

    let config = Config::load();
    if options.save_config {
        let path = config.save().context("could not save config")?;
        eprintln!("Config written to {}", path.display());
        return Ok(());
    }
    let mut console = StdioSession::stdio(config);
    let size = console.size();
    info!("Terminal size {}x{}", size.width, size.height);

    run_demo(&mut console, &options).context("demo aborted")?;

    info!("fixline finished");
    Ok(())
}

fn run_demo(console: &mut StdioSession, options: &Options) -> fixline::Result<()> {
    console.write_line("fixline demo", &[Style::Bold, Style::Underline])?;
    console.write("Colors: ", &[])?;
    for color in [Color::BrightRed, Color::BrightGreen, Color::BrightYellow, Color::BrightBlue] {
        console.write(&format!("{:?} ", color), &[Style::Fg(color)])?;
    }
    console.write_line("", &[])?;

    console.action_start("Preparing workspace")?;
    for _ in 0..8 {
        thread::sleep(Duration::from_millis(250));
        console.action_step()?;
    }
    console.action_end(true)?;

    console.progress_start("Processing", options.steps)?;
    for step in 1..=options.steps {
        thread::sleep(Duration::from_millis(100));
        if step % 5 == 0 {
            console.write_line(&format!("checkpoint {}", step), &[Style::Italic])?;
        }
        console.progress_step()?;
    }
    console.progress_end()?;

    console.action_start("Contacting a server that is not there")?;
    for _ in 0..4 {
        thread::sleep(Duration::from_millis(250));
        console.action_step()?;
    }
    console.action_end(false)?;

    console.write("Waiting", &[])?;
    console.sleep(options.sleep)?;
    console.write_line("", &[])?;

    if options.no_input {
        return Ok(());
    }

    console.modal("Interactive part next.")?;
    let name = console.prompt("What is your name?")?;
    if console.dialog(&format!("Greet {}?", name))? {
        console.write_line(&format!("Hello, {}!", name), &[Style::Fg(Color::BrightCyan)])?;
    } else {
        console.write_line("Maybe next time.", &[Style::Fg(Color::White)])?;
    }

    info!("History holds {} entries", console.history().len());
    Ok(())
}
