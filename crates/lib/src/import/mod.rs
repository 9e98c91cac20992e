//! Import resolution against a virtual file tree.
//!
//! Imports are resolved lexically: absolute targets are rooted at the tree
//! root, relative ones at the importing file's directory. Nothing outside the
//! tree is ever reachable, and every lookup is memoized for the session.

pub mod path;
mod resolver;

pub use resolver::{ImportResolver, Resolved, normalize};

use thiserror::Error;

/// Errors that can occur while resolving an import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
  /// The target normalizes to a path outside the tree root, or to no file at all.
  #[error("invalid import path '{target}' from '{from}'")]
  InvalidPath { target: String, from: String },

  /// The normalized path does not exist in the tree.
  #[error("failed to read file {path}: file not found")]
  NotFound { path: String },
}
