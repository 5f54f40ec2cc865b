extern crate ansi_term;
extern crate ctrlc;
use crate::mach::{Event, Runtime};
use ansi_term::Style;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const CYCLES_PER_BATCH: usize = 5000;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Program file to run.
    file: Option<PathBuf>,

    /// Program text to run instead of a file.
    #[arg(short = 'e', long = "eval", conflicts_with = "file")]
    source: Option<String>,

    /// Print the assembled program before running it.
    #[arg(short, long)]
    listing: bool,

    /// Log every dispatched instruction.
    #[arg(short, long)]
    trace: bool,

    /// More log output on stderr. Repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Seed for rand().
    #[arg(long)]
    seed: Option<u64>,
}

pub fn main() {
    let cli = Cli::parse();
    let level = if cli.trace || cli.verbose > 1 {
        log::LevelFilter::Trace
    } else if cli.verbose == 1 {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    Logger::install(level);
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        log::warn!("Error setting Ctrl-C handler: {}", error);
    }
    match main_loop(cli, interrupted) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("{}", Style::new().bold().paint(format!("{:#}", error)));
            std::process::exit(1);
        }
    }
}

fn read_source(cli: &Cli) -> Result<String> {
    match (&cli.source, &cli.file) {
        (Some(source), _) => Ok(source.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        (None, None) => Err(anyhow!("nothing to run; give a FILE or -e SOURCE")),
    }
}

/// Runs the program to completion. `Ok(false)` means the program
/// reported a language error.
fn main_loop(cli: Cli, interrupted: Arc<AtomicBool>) -> Result<bool> {
    let source = read_source(&cli)?;
    let mut runtime = match cli.seed {
        Some(seed) => Runtime::with_seed(seed),
        None => Runtime::default(),
    };
    runtime.enter(&source);
    if cli.listing {
        print!("{}", runtime.listing());
    }
    let stdout = std::io::stdout();
    let mut success = true;
    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        }
        match runtime.execute(CYCLES_PER_BATCH) {
            Event::Stopped => break,
            Event::Running => {}
            Event::Print(s) => {
                stdout.lock().write_all(s.as_bytes())?;
            }
            Event::Errors(errors) => {
                stdout.lock().flush()?;
                for error in errors.iter() {
                    eprintln!("{}", Style::new().bold().paint(error.to_string()));
                }
                success = false;
            }
        }
    }
    stdout.lock().flush()?;
    Ok(success)
}

/// Plain stderr logger for the `log` facade.
struct Logger;

static LOGGER: Logger = Logger;

impl Logger {
    fn install(level: log::LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}
