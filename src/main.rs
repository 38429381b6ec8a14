use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use logwrap::backends::console;
use logwrap::cli::{Cli, ColorMode};
use logwrap::config::Config;
use logwrap::{WrapError, decorate};

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior so upstream writers get a clean
    // SIGPIPE signal instead of a BrokenPipeError when logwrap exits early.
    reset_sigpipe();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "logwrap", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logwrap: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<(), WrapError> {
    let config = Config::from_cli(cli)?;
    let use_color = resolve_color_mode(config.color_mode);

    let log = decorate(
        console(&config.console_options(use_color)),
        config.decorate_options(),
    )?;
    if let Some(level) = config.level {
        log.set_level_to(level);
    }

    let stdin = io::stdin();
    for line_result in stdin.lock().lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => continue,
            Err(e) => return Err(e.into()),
        };
        log.log(config.emit_level, line);
    }

    Ok(())
}

fn exit_code(error: &WrapError) -> u8 {
    match error {
        WrapError::Io(_) => 2,
        _ => 1,
    }
}

fn resolve_color_mode(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            let stdout = io::stdout();
            if !stdout.is_terminal() {
                return false;
            }
            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }
            if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
                return false;
            }
            true
        }
    }
}

/// Reset SIGPIPE to the default (terminate) behavior.
///
/// By default, Rust ignores SIGPIPE to surface `BrokenPipe` I/O errors.
/// Restoring `SIG_DFL` lets the OS end `logwrap` quietly when its reader
/// goes away.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
