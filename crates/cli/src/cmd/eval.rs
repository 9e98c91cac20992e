//! Implementation of the evaluation command.
//!
//! Reads a request document or share code, evaluates its entry file in a fresh
//! session, and writes the rendered result to stdout. Nothing is written to stdout unless
//! evaluation succeeds.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::debug;

use cfgen_lib::{Request, share};

/// Where the request comes from and the command-line overrides applied to it.
#[derive(Debug, Default)]
pub struct EvalOptions {
  pub input: Option<PathBuf>,
  /// The input is a share code rather than a JSON request.
  pub code: bool,
  pub entry: Option<String>,
  pub string: bool,
}

/// Execute the evaluation command.
pub fn cmd_eval(opts: &EvalOptions) -> Result<()> {
  let request = load_request(opts)?;

  let output = request
    .execute(Rc::new(RefCell::new(io::stderr())))
    .context("Error executing template")?;

  let mut stdout = io::stdout().lock();
  writeln!(stdout, "{}", output).context("Failed writing output")?;
  stdout.flush().context("Failed writing output")?;

  Ok(())
}

/// Read the request named by `opts` and apply its overrides.
pub(super) fn load_request(opts: &EvalOptions) -> Result<Request> {
  let raw = match &opts.input {
    Some(path) => {
      fs::read_to_string(path).with_context(|| format!("Failed reading input: {}", path.display()))?
    }
    None => {
      let mut buf = String::new();
      io::stdin().read_to_string(&mut buf).context("Failed reading input")?;
      buf
    }
  };

  let mut request: Request = if opts.code {
    share::decode(&raw).context("Malformed share code")?
  } else {
    serde_json::from_str(&raw).context("Malformed input")?
  };
  if let Some(entry) = &opts.entry {
    request.entry = entry.clone();
  }
  if opts.string {
    request.strout = true;
  }

  debug!(files = request.files.len(), entry = %request.entry, strout = request.strout, "parsed request");
  Ok(request)
}
