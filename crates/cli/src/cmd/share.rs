//! Implementation of the share command: print a request as a share code.

use std::io::{self, Write};

use anyhow::{Context, Result};

use super::eval::{EvalOptions, load_request};

/// Encode the request named by `opts` without evaluating it.
pub fn cmd_share(opts: &EvalOptions) -> Result<()> {
  let request = load_request(opts)?;
  let code = cfgen_lib::share::encode(&request).context("Failed encoding share code")?;

  let mut stdout = io::stdout().lock();
  writeln!(stdout, "{}", code).context("Failed writing output")?;
  stdout.flush().context("Failed writing output")?;

  Ok(())
}
