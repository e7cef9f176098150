use std::io::{self, BufRead, Write};

use chrono::{TimeZone, Utc};
use circulation_desk::{
    CirculationDesk, Clock, ManualClock, TracingObserver,
    shell::{self, Response},
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the circulation desk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// What to run; defaults to the interactive shell
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Print responses as JSON, one document per line
    #[arg(long, global = true)]
    json: bool,

    /// Start with an empty catalog and roster instead of the sample data
    #[arg(long, global = true)]
    empty: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Front ends
#[derive(Subcommand, Debug, Clone, Copy)]
enum Mode {
    /// Read commands from stdin, one per line
    Shell,
    /// Run a scripted borrow, reserve, return and fine walkthrough
    Demo,
}

/// Parse arguments, install logging and run the selected front end
fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.mode.unwrap_or(Mode::Shell) {
        Mode::Shell => run_shell(&args),
        Mode::Demo => run_demo(&args),
    }
}

/// Install a stderr subscriber filtered by `RUST_LOG`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Build a desk, seeded unless `--empty` was given
fn open_desk<C: Clock>(clock: C, args: &Args) -> CirculationDesk<C> {
    let mut desk = CirculationDesk::with_clock(clock);
    desk.register_observer(Box::new(TracingObserver));
    if !args.empty {
        shell::seed_sample_data(&mut desk);
    }
    desk
}

/// Print a response in the selected format
fn render(out: &mut impl Write, response: &Response, json: bool) -> io::Result<()> {
    if json {
        let line = response.to_json().map_err(io::Error::other)?;
        return writeln!(out, "{line}");
    }

    let text = response.to_string();
    if response.is_failure() {
        writeln!(out, "{}", text.red())
    } else if matches!(response, Response::Circulation { .. }) {
        writeln!(out, "{}", text.green())
    } else {
        writeln!(out, "{text}")
    }
}

/// Interactive line loop over stdin until `quit` or end of input
fn run_shell(args: &Args) -> io::Result<()> {
    let mut desk = open_desk(circulation_desk::SystemClock, args);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    if !args.json {
        writeln!(out, "{}", "Library Circulation Desk".green().bold())?;
        writeln!(out, "Type `help` for the list of commands.")?;
    }

    loop {
        if !args.json {
            write!(out, "> ")?;
            out.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            debug!("end of input");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = shell::execute_line(&mut desk, &line);
        render(&mut out, &response, args.json)?;
        if response.is_goodbye() {
            break;
        }
    }

    Ok(())
}

/// Walk through a reservation hand-off and an overdue fine on a manual clock
fn run_demo(args: &Args) -> io::Result<()> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default();
    let clock = ManualClock::new(start);
    let mut desk = open_desk(clock.clone(), args);
    let mut out = io::stdout().lock();

    if !args.json {
        writeln!(out, "{}", "Circulation Desk Demonstration".green().bold())?;
        writeln!(out, "==============================\n")?;
    }

    let script: [(i64, &str); 8] = [
        (0, "search Fiction"),
        (0, "borrow 1 1234567890"),
        (1, "borrow 2 1234567890"),
        (0, "status"),
        (19, "fine 1"),
        (0, "return 1 1234567890"),
        (0, "member 1"),
        (0, "member 2"),
    ];

    for (days, line) in script {
        clock.advance_days(days);
        if !args.json {
            let when = clock.now().format("%Y-%m-%d");
            writeln!(out, "{}", format!("[{when}] > {line}").yellow().bold())?;
        }
        let response = shell::execute_line(&mut desk, line);
        render(&mut out, &response, args.json)?;
        if !args.json {
            writeln!(out)?;
        }
    }

    if !args.json {
        writeln!(out, "{}", "Demonstration complete!".green().bold())?;
    }
    Ok(())
}
