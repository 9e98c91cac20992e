//! The standard native functions.

use std::io::Write;

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{Diagnostics, NativeError, NativeFunction};
use crate::import::path;
use crate::json::{self, merge_patch, merge_patch_all};

pub(super) fn builtins(diagnostics: Diagnostics) -> Vec<NativeFunction> {
  vec![
    NativeFunction::new("log", &["str", "rest"], move |args| {
      let logs = json::to_pretty(&Value::Array(args.to_vec())).map_err(|e| NativeError::Marshal {
        format: "logs",
        message: e.to_string(),
      })?;
      let mut out = diagnostics.borrow_mut();
      writeln!(out, "{}", logs)?;
      out.flush()?;
      Ok(Value::Bool(true))
    }),
    NativeFunction::new("jsonMarshal", &["v"], |args| {
      let [v] = arity::<1>("jsonMarshal", args)?;
      json::to_compact(v)
        .map(|s| Value::String(s + "\n"))
        .map_err(|e| NativeError::Marshal {
          format: "json",
          message: e.to_string(),
        })
    }),
    NativeFunction::new("jsonUnmarshal", &["v"], |args| {
      let [v] = arity::<1>("jsonUnmarshal", args)?;
      let text = string_arg("jsonUnmarshal", v, "JSON must be a string")?;
      serde_json::from_str(text).map_err(|e| NativeError::Unmarshal {
        format: "json",
        message: e.to_string(),
      })
    }),
    NativeFunction::new("jsonMergePatch", &["a", "b"], |args| {
      let [a, b] = arity::<2>("jsonMergePatch", args)?;
      Ok(merge_patch(a, b))
    }),
    NativeFunction::new("jsonMergePatchAll", &["a", "b"], |args| {
      let [a, b] = arity::<2>("jsonMergePatchAll", args)?;
      let Value::Array(patches) = b else {
        return Err(NativeError::invalid_args("jsonMergePatchAll", "patches must be an array"));
      };
      Ok(merge_patch_all(a, patches))
    }),
    NativeFunction::new("yamlMarshal", &["v"], |args| {
      let [v] = arity::<1>("yamlMarshal", args)?;
      serde_yaml::to_string(v)
        .map(Value::String)
        .map_err(|e| NativeError::Marshal {
          format: "yaml",
          message: e.to_string(),
        })
    }),
    NativeFunction::new("yamlUnmarshal", &["v"], |args| {
      let [v] = arity::<1>("yamlUnmarshal", args)?;
      let text = string_arg("yamlUnmarshal", v, "YAML must be a string")?;
      serde_yaml::from_str(text).map_err(|e| NativeError::Unmarshal {
        format: "yaml",
        message: e.to_string(),
      })
    }),
    NativeFunction::new("pathJoin", &["v"], |args| {
      let [v] = arity::<1>("pathJoin", args)?;
      let segments = v
        .as_array()
        .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .ok_or_else(|| NativeError::invalid_args("pathJoin", "path segments must be an array of strings"))?;
      Ok(Value::String(path::join(&segments)))
    }),
    NativeFunction::new("sha256hex", &["v"], |args| {
      let [v] = arity::<1>("sha256hex", args)?;
      let data = string_arg("sha256hex", v, "sha256hex must have string argument")?;
      Ok(Value::String(hex::encode(Sha256::digest(data.as_bytes()))))
    }),
  ]
}

/// Check that exactly `N` arguments were passed.
fn arity<'a, const N: usize>(func: &str, args: &'a [Value]) -> Result<&'a [Value; N], NativeError> {
  args.try_into().map_err(|_| NativeError::arity(func, N, args.len()))
}

fn string_arg<'a>(func: &str, value: &'a Value, expected: &str) -> Result<&'a str, NativeError> {
  value.as_str().ok_or_else(|| NativeError::invalid_args(func, expected))
}
