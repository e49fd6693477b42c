//! stockguard CLI
//!
//! Two modes:
//! - **Shell mode**: `stockguard [flags] COMMAND` runs one command and exits
//! - **Pipe mode**: `stockguard [flags] < requests.jsonl` reads one JSON
//!   request per line from stdin and writes one JSON response per line
//!
//! Responses go to stdout as JSON. Errors and logs go to stderr. The exit
//! code is 1 when any response carried a status of 400 or above.

mod commands;
mod parse;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use stockguard_core::ItemId;
use stockguard_engine::{Ledger, LedgerConfig};
use stockguard_executor::{error_body, handle_json, status_for_error, Executor, Response};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use parse::{matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_one::<String>("log-level").map(String::as_str));

    let ledger = match open_ledger(&matches) {
        Ok(ledger) => Arc::new(ledger),
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };
    let executor = Executor::new(Arc::clone(&ledger));

    let exit_code = if matches.subcommand().is_some() {
        run_shell_mode(&matches, &executor)
    } else {
        run_pipe(&executor)
    };

    if let Err(e) = ledger.flush() {
        eprintln!("(error) {}", e);
        process::exit(1);
    }
    process::exit(exit_code);
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_ledger(matches: &clap::ArgMatches) -> Result<Ledger, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => LedgerConfig::load(path)
            .map_err(|e| format!("Failed to load config {}: {}", path, e))?,
        None => LedgerConfig::default(),
    };

    if matches.get_flag("ephemeral") {
        return Ledger::builder()
            .config(config)
            .ephemeral()
            .map_err(|e| format!("Failed to open ledger: {}", e));
    }
    if let Some(dir) = matches.get_one::<String>("db") {
        config.data_dir = Some(PathBuf::from(dir));
    }
    Ledger::open(config).map_err(|e| format!("Failed to open ledger: {}", e))
}

fn emit(response: &Response) -> i32 {
    println!("{}", response.body);
    if response.status >= 400 {
        1
    } else {
        0
    }
}

fn run_shell_mode(matches: &clap::ArgMatches, executor: &Executor) -> i32 {
    let action = match matches_to_action(matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            return 1;
        }
    };

    let result = match action {
        CliAction::Execute(command) => executor.execute(command).and_then(|output| {
            let status = output.status();
            serde_json::to_value(&output)
                .map(|body| Response { status, body })
                .map_err(|e| stockguard_core::Error::Serialization(e.to_string()))
        }),
        CliAction::Trial {
            item,
            requests,
            hold_ms,
        } => {
            let ledger = executor.ledger();
            let requests = requests.unwrap_or(ledger.config().trial.default_requests);
            ledger
                .run_trial_with_hold(&ItemId::from(item), requests, Duration::from_millis(hold_ms))
                .and_then(|report| {
                    serde_json::to_value(&report)
                        .map(|body| Response { status: 200, body })
                        .map_err(|e| stockguard_core::Error::Serialization(e.to_string()))
                })
        }
    };

    match result {
        Ok(response) => emit(&response),
        Err(err) => {
            let response = Response {
                status: status_for_error(&err),
                body: error_body(&err),
            };
            eprintln!("(error) {}", err);
            emit(&response)
        }
    }
}

fn run_pipe(executor: &Executor) -> i32 {
    tracing::debug!("reading requests from stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut exit_code = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let response = handle_json(executor, trimmed);
        if response.status >= 400 {
            exit_code = 1;
        }
        if writeln!(stdout, "{}", response.body).is_err() {
            return 1;
        }
    }
    exit_code
}
