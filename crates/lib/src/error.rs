//! Error types for cfgen-lib

use thiserror::Error;

use crate::import::ImportError;

/// Errors surfaced by an evaluation session.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("failed to initialize runtime: {0}")]
  Runtime(String),

  #[error(transparent)]
  Import(#[from] ImportError),

  /// Any failure raised while the template runs, including errors from native
  /// functions and nested imports.
  #[error("failed to evaluate {entry}: {message}")]
  Evaluation { entry: String, message: String },

  #[error("string output requires {entry} to return a string, got {found}")]
  NotString { entry: String, found: &'static str },

  #[error("failed to render output of {entry}: {message}")]
  Output { entry: String, message: String },
}
