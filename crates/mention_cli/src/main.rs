//! Mention codec CLI.
//!
//! # Responsibility
//! - Run decode/encode/format over stdin for scripts and backfills.
//! - Keep output deterministic: JSON for structured results, raw text otherwise.

use clap::{Parser, Subcommand};
use log::{info, warn};
use mention_core::{
    core_version, decode, default_log_level, encode, format_mentions, init_logging,
    mentioned_ids, DecodedText,
};
use std::io::{self, Read, Write};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mention", about = "Convert between stored and display mention text")]
struct Cli {
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "MENTION_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "MENTION_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stored text on stdin -> `{"display", "mentions"}` JSON
    Decode {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// `{"display", "mentions"}` JSON on stdin -> stored text
    Encode,
    /// Stored text on stdin -> lossy `@name` text
    Format,
    /// Stored text on stdin -> mentioned ids, one per line
    Ids,
    /// Print the core version
    Version,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Decode { .. } => "decode",
            Command::Encode => "encode",
            Command::Format => "format",
            Command::Ids => "ids",
            Command::Version => "version",
        }
    }

    fn reads_stdin(&self) -> bool {
        !matches!(self, Command::Version)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let input = if cli.command.reads_stdin() {
        match read_stdin() {
            Ok(input) => input,
            Err(message) => {
                eprintln!("error: {message}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        String::new()
    };

    match run(&cli.command, input.as_str()) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(err) = stdout.write_all(output.as_bytes()) {
                eprintln!("error: failed to write output: {err}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, input: &str) -> Result<String, String> {
    let result = execute(command, input);
    match &result {
        Ok(output) => info!(
            "event=cli_run module=cli status=ok command={} input_len={} output_len={}",
            command.name(),
            input.len(),
            output.len()
        ),
        Err(_) => warn!(
            "event=cli_run module=cli status=error command={} input_len={}",
            command.name(),
            input.len()
        ),
    }
    result
}

fn execute(command: &Command, input: &str) -> Result<String, String> {
    match command {
        Command::Version => Ok(format!("mention_core version={}\n", core_version())),
        Command::Decode { pretty } => {
            let decoded = decode(input);
            let json = if *pretty {
                serde_json::to_string_pretty(&decoded)
            } else {
                serde_json::to_string(&decoded)
            }
            .map_err(|err| format!("failed to serialize decoded text: {err}"))?;
            Ok(format!("{json}\n"))
        }
        Command::Encode => {
            let decoded: DecodedText = serde_json::from_str(input)
                .map_err(|err| format!("expected {{\"display\", \"mentions\"}} JSON: {err}"))?;
            Ok(encode(decoded.display.as_str(), &decoded.mentions))
        }
        Command::Format => Ok(format_mentions(input)),
        Command::Ids => Ok(mentioned_ids(input)
            .into_iter()
            .map(|id| format!("{id}\n"))
            .collect()),
    }
}

fn read_stdin() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| format!("failed to read stdin: {err}"))?;
    Ok(input)
}
