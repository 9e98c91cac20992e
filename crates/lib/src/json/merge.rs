//! JSON merge patch (RFC 7386 semantics).

use serde_json::{Map, Value};

/// Apply `patch` to `target` and return the merged document.
///
/// A non-object patch replaces the target wholesale. An object patch is applied
/// key by key onto a copy of the target (or onto an empty object when the target
/// is not an object): `null` deletes the key, anything else is merged
/// recursively against the existing value, with a missing key treated as `null`.
/// Arrays are never merged element-wise.
pub fn merge_patch(target: &Value, patch: &Value) -> Value {
  let Value::Object(patch) = patch else {
    return patch.clone();
  };

  let mut result = match target {
    Value::Object(target) => target.clone(),
    _ => Map::new(),
  };

  for (key, value) in patch {
    if value.is_null() {
      result.remove(key);
      continue;
    }
    let merged = merge_patch(result.get(key).unwrap_or(&Value::Null), value);
    result.insert(key.clone(), merged);
  }

  Value::Object(result)
}

/// Apply each patch in `patches` to `target`, left to right.
pub fn merge_patch_all(target: &Value, patches: &[Value]) -> Value {
  patches
    .iter()
    .fold(target.clone(), |acc, patch| merge_patch(&acc, patch))
}
