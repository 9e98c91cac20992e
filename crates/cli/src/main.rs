mod cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

use cmd::EvalOptions;

/// cfgen - generate configuration from sandboxed Lua templates
///
/// Reads a JSON request `{"files": {...}, "entry": "main.lua", "strout": false}`
/// (or a share code with `--code`) and writes the rendered entry to stdout.
#[derive(Parser)]
#[command(name = "cfgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Read the request from this file instead of stdin
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Treat the input as a share code instead of a JSON request
  #[arg(short, long)]
  code: bool,

  /// Print the request as a share code instead of evaluating it
  #[arg(long)]
  share: bool,

  /// Entry file to evaluate (overrides the request)
  #[arg(short, long)]
  entry: Option<String>,

  /// Emit the entry's string value verbatim instead of JSON
  #[arg(short, long)]
  string: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let opts = EvalOptions {
    input: cli.input,
    code: cli.code,
    entry: cli.entry,
    string: cli.string,
  };

  let result = if cli.share {
    cmd::cmd_share(&opts)
  } else {
    cmd::cmd_eval(&opts)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{} {:#}", "error:".if_supports_color(Stream::Stderr, |t| t.red()), err);
      ExitCode::FAILURE
    }
  }
}
