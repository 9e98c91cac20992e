//! Conversion between Lua values and the JSON value model.

use mlua::prelude::*;
use serde_json::Value as JsonValue;

/// Tables nested deeper than this are assumed to be cyclic.
const MAX_DEPTH: usize = 256;

/// Whether `value` is the JSON null sentinel exposed to templates.
pub fn is_null_sentinel(value: &LuaValue) -> bool {
  matches!(value, LuaValue::LightUserData(ud) if ud.0.is_null())
}

/// Convert a Lua value to a JSON value.
///
/// Tables whose keys are all positive integers become arrays, with holes filled
/// by null, as long as at least half of the indices are present. Every other
/// table becomes an object, whose keys must all be strings. An empty table is
/// an empty object.
pub fn lua_to_json(value: LuaValue) -> LuaResult<JsonValue> {
  to_json(value, 0)
}

fn to_json(value: LuaValue, depth: usize) -> LuaResult<JsonValue> {
  if depth > MAX_DEPTH {
    return Err(LuaError::external("value nested too deeply (cyclic table?)"));
  }

  match value {
    LuaValue::Nil => Ok(JsonValue::Null),
    ref v if is_null_sentinel(v) => Ok(JsonValue::Null),
    LuaValue::Boolean(b) => Ok(JsonValue::Bool(b)),
    LuaValue::Integer(i) => Ok(JsonValue::Number(i.into())),
    LuaValue::Number(n) => number_to_json(n),
    LuaValue::String(s) => Ok(JsonValue::String(s.to_str()?.to_string())),
    LuaValue::Table(t) => {
      let mut is_array = true;
      let mut count = 0;
      let mut max_index = 0;
      for pair in t.pairs::<LuaValue, LuaValue>() {
        let (k, _) = pair?;
        count += 1;
        match k {
          LuaValue::Integer(i) if i > 0 => {
            max_index = max_index.max(i as u64);
          }
          _ => {
            is_array = false;
            break;
          }
        }
      }

      // Sparse keys are not an array: at most one hole per present element.
      if is_array && max_index > 0 && max_index <= 2 * count {
        let len = max_index as usize;
        let mut arr = Vec::with_capacity(len);
        for i in 1..=len {
          let v: LuaValue = t.raw_get(i)?;
          arr.push(to_json(v, depth + 1)?);
        }
        Ok(JsonValue::Array(arr))
      } else {
        let mut map = serde_json::Map::new();
        for pair in t.pairs::<LuaValue, LuaValue>() {
          let (k, v) = pair?;
          let key = match k {
            LuaValue::String(s) => s.to_str()?.to_string(),
            other => {
              return Err(LuaError::external(format!(
                "object keys must be strings, got {}",
                other.type_name()
              )));
            }
          };
          map.insert(key, to_json(v, depth + 1)?);
        }
        Ok(JsonValue::Object(map))
      }
    }
    LuaValue::Function(_) => Err(LuaError::external("functions cannot be converted to JSON")),
    LuaValue::Thread(_) => Err(LuaError::external("threads cannot be converted to JSON")),
    LuaValue::UserData(_) => Err(LuaError::external("userdata cannot be converted to JSON")),
    LuaValue::LightUserData(_) => Err(LuaError::external("light userdata cannot be converted to JSON")),
    LuaValue::Error(e) => Err(LuaError::external(format!("errors cannot be converted to JSON: {}", e))),
    _ => Err(LuaError::external("unsupported value type")),
  }
}

/// Floats with no fractional part that fit in an i64 are emitted as integers.
fn number_to_json(n: f64) -> LuaResult<JsonValue> {
  if !n.is_finite() {
    return Err(LuaError::external("numbers must be finite (not NaN or Infinity)"));
  }
  if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
    return Ok(JsonValue::Number((n as i64).into()));
  }
  Ok(serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number))
}

/// Convert a JSON value to a Lua value.
///
/// Null becomes the null sentinel so it survives inside tables. Integers that
/// do not fit in an i64 become floats.
pub fn json_to_lua(lua: &Lua, value: &JsonValue) -> LuaResult<LuaValue> {
  match value {
    JsonValue::Null => Ok(LuaValue::NULL),
    JsonValue::Bool(b) => Ok(LuaValue::Boolean(*b)),
    JsonValue::Number(n) => {
      if let Some(i) = n.as_i64() {
        Ok(LuaValue::Integer(i))
      } else if let Some(f) = n.as_f64() {
        Ok(LuaValue::Number(f))
      } else {
        Err(LuaError::external(format!("invalid number {}", n)))
      }
    }
    JsonValue::String(s) => Ok(LuaValue::String(lua.create_string(s)?)),
    JsonValue::Array(arr) => {
      let table = lua.create_table_with_capacity(arr.len(), 0)?;
      for (i, v) in arr.iter().enumerate() {
        table.raw_set(i + 1, json_to_lua(lua, v)?)?;
      }
      Ok(LuaValue::Table(table))
    }
    JsonValue::Object(obj) => {
      let table = lua.create_table_with_capacity(0, obj.len())?;
      for (k, v) in obj {
        table.raw_set(k.as_str(), json_to_lua(lua, v)?)?;
      }
      Ok(LuaValue::Table(table))
    }
  }
}
