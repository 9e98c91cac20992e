//! JSON value helpers shared by the native functions and the session.
//!
//! The value model is [`serde_json::Value`]; this module adds the merge-patch
//! engine and the encoders the native functions and the CLI rely on.

mod merge;

pub use merge::{merge_patch, merge_patch_all};

use serde_json::Value;

/// Serialize a value as compact JSON.
///
/// `serde_json` never escapes `<`, `>` or `&`, so the output is safe to embed
/// verbatim in generated configuration.
pub fn to_compact(value: &Value) -> Result<String, serde_json::Error> {
  serde_json::to_string(value)
}

/// Serialize a value as JSON indented by two spaces.
pub fn to_pretty(value: &Value) -> Result<String, serde_json::Error> {
  serde_json::to_string_pretty(value)
}
