//! Creation of the sandboxed Lua runtime.

use std::cell::{Ref, RefMut};
use std::io::Write;
use std::rc::Rc;

use mlua::prelude::*;

use super::convert::{json_to_lua, lua_to_json};
use super::loaders::{self, Imports};
use crate::consts::{NATIVE_GLOBAL, NULL_GLOBAL};
use crate::import::ImportResolver;
use crate::native::{Diagnostics, NativeError, NativeRegistry};
use crate::tree::{FileTree, VirtualFileTree};

/// Base-library functions that would reach the host filesystem.
const REMOVED_GLOBALS: &[&str] = &["dofile", "loadfile", "load"];

/// A Lua state wired to one import resolver and one native registry.
pub struct Runtime<T: FileTree + 'static = VirtualFileTree> {
  lua: Lua,
  imports: Rc<Imports<T>>,
}

impl<T: FileTree + 'static> Runtime<T> {
  pub fn new(resolver: ImportResolver<T>, registry: Rc<NativeRegistry>, diagnostics: Diagnostics) -> LuaResult<Self> {
    let lua = create_runtime(registry, diagnostics)?;
    let imports = Imports::new(&lua, resolver)?;
    Ok(Self { lua, imports })
  }

  /// Import `target` relative to the tree root and return its value.
  pub fn import(&self, target: &str) -> LuaResult<LuaValue> {
    loaders::load_import(&self.lua, &self.imports, "", target)
  }

  pub fn resolver(&self) -> Ref<'_, ImportResolver<T>> {
    self.imports.resolver().borrow()
  }

  pub fn resolver_mut(&self) -> RefMut<'_, ImportResolver<T>> {
    self.imports.resolver().borrow_mut()
  }
}

/// Create a Lua state with the sandboxed globals and the native call mechanism.
///
/// Only the coroutine, table, string, utf8 and math libraries are loaded; the
/// base functions that load code from disk are removed, and `print` writes to
/// `diagnostics`.
pub fn create_runtime(registry: Rc<NativeRegistry>, diagnostics: Diagnostics) -> LuaResult<Lua> {
  let lua = Lua::new_with(
    LuaStdLib::COROUTINE | LuaStdLib::TABLE | LuaStdLib::STRING | LuaStdLib::UTF8 | LuaStdLib::MATH,
    LuaOptions::default(),
  )?;
  let globals = lua.globals();

  for name in REMOVED_GLOBALS {
    globals.raw_set(*name, LuaValue::Nil)?;
  }
  globals.raw_set(NULL_GLOBAL, LuaValue::NULL)?;

  let tostring: LuaFunction = globals.raw_get("tostring")?;
  let print = lua.create_function(move |_, args: LuaMultiValue| {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
      parts.push(tostring.call::<String>(arg)?);
    }
    let mut out = diagnostics.borrow_mut();
    writeln!(out, "{}", parts.join("\t")).map_err(LuaError::external)?;
    Ok(())
  })?;
  globals.raw_set("print", print)?;

  let native = lua.create_function(move |lua, name: String| {
    if registry.get(&name).is_none() {
      return Err(LuaError::external(NativeError::Unknown(name)));
    }
    let registry = registry.clone();
    lua.create_function(move |lua, args: LuaMultiValue| {
      let args = args.into_iter().map(lua_to_json).collect::<LuaResult<Vec<_>>>()?;
      let result = registry.invoke(&name, &args).map_err(LuaError::external)?;
      json_to_lua(lua, &result)
    })
  })?;
  globals.raw_set(NATIVE_GLOBAL, native)?;

  Ok(lua)
}
