#![warn(clippy::all, clippy::pedantic)]

use std::error::Error as _;
use std::process::ExitCode;

use figaro_cli::error::CliError;
use figaro_cli::modules::settings::{Settings, data_dir};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging_init();

    let data_dir = match data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::load_or_default(&data_dir);

    match figaro_cli::run(std::env::args_os(), &settings, &data_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(err)) => {
            let code = err.exit_code();
            let _ = err.print();
            if code == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            report_error(&err, settings.trace);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &CliError, trace: bool) {
    eprintln!("Error: {err}");
    if !trace {
        return;
    }

    let mut shown = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !shown.contains(&message) {
            eprintln!("  caused by: {message}");
        }
        shown = message;
        source = cause.source();
    }
}

fn logging_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
