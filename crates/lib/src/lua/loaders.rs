//! Loading imported files into the runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::rc::Rc;

use mlua::{ChunkMode, prelude::*};
use tracing::debug;

use crate::import::ImportResolver;
use crate::tree::FileTree;

/// Import state shared by every file environment of one runtime.
pub struct Imports<T: FileTree> {
  resolver: RefCell<ImportResolver<T>>,
  /// Values of files that finished evaluating, by resolved path.
  loaded: RefCell<HashMap<String, LuaValue>>,
  /// Files currently being evaluated, outermost first.
  loading: RefCell<Vec<String>>,
  setmetatable: LuaFunction,
}

impl<T: FileTree + 'static> Imports<T> {
  pub fn new(lua: &Lua, resolver: ImportResolver<T>) -> LuaResult<Rc<Self>> {
    Ok(Rc::new(Self {
      resolver: RefCell::new(resolver),
      loaded: RefCell::new(HashMap::new()),
      loading: RefCell::new(Vec::new()),
      setmetatable: lua.globals().raw_get("setmetatable")?,
    }))
  }

  pub fn resolver(&self) -> &RefCell<ImportResolver<T>> {
    &self.resolver
  }
}

/// Resolve `target` from `importing` and return the source text unevaluated.
pub fn load_string<T: FileTree + 'static>(imports: &Imports<T>, importing: &str, target: &str) -> LuaResult<String> {
  let resolved = imports
    .resolver
    .borrow_mut()
    .resolve(importing, target)
    .map_err(LuaError::external)?;
  Ok(resolved.contents.to_string())
}

/// Resolve `target` from `importing`, evaluate it, and return its value.
///
/// Each resolved path is evaluated at most once per runtime. Every import gets
/// its own copy of the tables in that value, so importers cannot see each
/// other's mutations.
pub fn load_import<T: FileTree + 'static>(
  lua: &Lua,
  imports: &Rc<Imports<T>>,
  importing: &str,
  target: &str,
) -> LuaResult<LuaValue> {
  let resolved = imports
    .resolver
    .borrow_mut()
    .resolve(importing, target)
    .map_err(LuaError::external)?;

  if let Some(value) = imports.loaded.borrow().get(&resolved.path) {
    return copy_value(lua, value, &mut HashMap::new());
  }

  if imports.loading.borrow().contains(&resolved.path) {
    let chain = imports.loading.borrow().join(" -> ");
    return Err(LuaError::external(format!(
      "import cycle: {} -> {}",
      chain, resolved.path
    )));
  }

  debug!(path = %resolved.path, "evaluating import");
  let env = file_environment(lua, imports, &resolved.path)?;

  imports.loading.borrow_mut().push(resolved.path.clone());
  let result = lua
    .load(&*resolved.contents)
    .set_name(format!("@{}", resolved.path))
    .set_mode(ChunkMode::Text)
    .set_environment(env)
    .eval::<LuaValue>();
  imports.loading.borrow_mut().pop();

  let value = result?;
  let copy = copy_value(lua, &value, &mut HashMap::new())?;
  imports.loaded.borrow_mut().insert(resolved.path, value);
  Ok(copy)
}

/// Deep-copy the tables reachable from `value`, keeping shared and cyclic
/// references intact within the copy. Metatables and non-table values are shared.
fn copy_value(lua: &Lua, value: &LuaValue, seen: &mut HashMap<*const c_void, LuaTable>) -> LuaResult<LuaValue> {
  let LuaValue::Table(table) = value else {
    return Ok(value.clone());
  };
  if let Some(copy) = seen.get(&table.to_pointer()) {
    return Ok(LuaValue::Table(copy.clone()));
  }

  let copy = lua.create_table()?;
  seen.insert(table.to_pointer(), copy.clone());
  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (k, v) = pair?;
    copy.raw_set(copy_value(lua, &k, seen)?, copy_value(lua, &v, seen)?)?;
  }
  copy.set_metatable(table.metatable())?;
  Ok(LuaValue::Table(copy))
}

/// Build the environment a file at `path` is evaluated in.
fn file_environment<T: FileTree + 'static>(lua: &Lua, imports: &Rc<Imports<T>>, path: &str) -> LuaResult<LuaTable> {
  let env = lua.create_table()?;

  let state = imports.clone();
  let importing = path.to_string();
  env.raw_set(
    "import",
    lua.create_function(move |lua, target: String| load_import(lua, &state, &importing, &target))?,
  )?;

  let state = imports.clone();
  let importing = path.to_string();
  env.raw_set(
    "importstr",
    lua.create_function(move |_, target: String| load_string(&state, &importing, &target))?,
  )?;

  let meta = lua.create_table()?;
  meta.raw_set("__index", lua.globals())?;
  imports.setmetatable.call::<LuaTable>((env, meta))
}
