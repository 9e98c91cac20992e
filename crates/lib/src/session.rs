//! Evaluation sessions.
//!
//! A [`Session`] binds one virtual file tree to one import resolver and one Lua
//! runtime. The import cache lives exactly as long as the session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mlua::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::consts::DEFAULT_ENTRY;
use crate::error::EngineError;
use crate::import::ImportResolver;
use crate::json;
use crate::lua::Runtime;
use crate::lua::convert::lua_to_json;
use crate::native::{Diagnostics, NativeRegistry};
use crate::tree::VirtualFileTree;

/// How the entry file's value is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
  /// Serialize the value as indented JSON.
  #[default]
  Json,
  /// The value must be a string and is emitted verbatim.
  String,
}

/// A complete evaluation request: the file bundle plus how to evaluate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
  pub files: BTreeMap<String, String>,
  #[serde(default = "default_entry")]
  pub entry: String,
  #[serde(default, alias = "string_output")]
  pub strout: bool,
}

fn default_entry() -> String {
  DEFAULT_ENTRY.to_string()
}

impl Request {
  pub fn output_mode(&self) -> OutputMode {
    if self.strout { OutputMode::String } else { OutputMode::Json }
  }

  /// Evaluate the request in a fresh session.
  pub fn execute(self, diagnostics: Diagnostics) -> Result<String, EngineError> {
    let mode = self.output_mode();
    let session = Session::with_diagnostics(VirtualFileTree::new(self.files), diagnostics)?;
    session.evaluate(&self.entry, mode)
  }
}

/// One evaluation context over a fixed file tree.
///
/// A session may evaluate several entries in turn and shares its import cache
/// between them. It owns a Lua state, so it is neither `Send` nor `Sync`.
pub struct Session {
  runtime: Runtime,
}

impl Session {
  /// Create a session whose diagnostics go to stderr.
  pub fn new(tree: VirtualFileTree) -> Result<Self, EngineError> {
    Self::with_diagnostics(tree, Rc::new(RefCell::new(std::io::stderr())))
  }

  pub fn with_diagnostics(tree: VirtualFileTree, diagnostics: Diagnostics) -> Result<Self, EngineError> {
    let registry = NativeRegistry::with_builtins(diagnostics.clone());
    Self::with_registry(tree, registry, diagnostics)
  }

  /// Create a session exposing the functions in `registry`.
  pub fn with_registry(
    tree: VirtualFileTree,
    registry: NativeRegistry,
    diagnostics: Diagnostics,
  ) -> Result<Self, EngineError> {
    debug!(files = tree.len(), natives = registry.iter().count(), "creating session");
    let resolver = ImportResolver::new(tree, registry.stdlib_source());
    let runtime = Runtime::new(resolver, Rc::new(registry), diagnostics)
      .map_err(|e| EngineError::Runtime(e.to_string()))?;
    Ok(Self { runtime })
  }

  /// Evaluate `entry` and render its value according to `mode`.
  pub fn evaluate(&self, entry: &str, mode: OutputMode) -> Result<String, EngineError> {
    let value = self.evaluate_lua(entry)?;
    match mode {
      OutputMode::String => match value {
        LuaValue::String(s) => Ok(
          s.to_str()
            .map_err(|e| output_error(entry, e))?
            .to_string(),
        ),
        other => Err(EngineError::NotString {
          entry: entry.to_string(),
          found: other.type_name(),
        }),
      },
      OutputMode::Json => {
        let value = lua_to_json(value).map_err(|e| output_error(entry, e))?;
        json::to_pretty(&value).map_err(|e| output_error(entry, e))
      }
    }
  }

  /// Evaluate `entry` and return its value as JSON.
  pub fn evaluate_value(&self, entry: &str) -> Result<JsonValue, EngineError> {
    let value = self.evaluate_lua(entry)?;
    lua_to_json(value).map_err(|e| output_error(entry, e))
  }

  /// Number of distinct paths the import cache holds.
  pub fn cached_imports(&self) -> usize {
    self.runtime.resolver().cached_len()
  }

  fn evaluate_lua(&self, entry: &str) -> Result<LuaValue, EngineError> {
    info!(entry, "evaluating");
    // A missing or invalid entry is an import error, not an evaluation error.
    self.runtime.resolver_mut().resolve("", entry)?;
    self.runtime.import(entry).map_err(|e| EngineError::Evaluation {
      entry: entry.to_string(),
      message: e.to_string(),
    })
  }
}

fn output_error(entry: &str, err: impl std::fmt::Display) -> EngineError {
  EngineError::Output {
    entry: entry.to_string(),
    message: err.to_string(),
  }
}
