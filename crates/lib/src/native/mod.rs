//! Host functions callable from templates.
//!
//! Each function is registered under a unique name with its declared parameter
//! names. Calls must supply exactly that many arguments. [`NativeRegistry::stdlib_source`] renders
//! the registry as the module served for [`STDLIB_IMPORT`](crate::consts::STDLIB_IMPORT).

mod builtins;

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::consts::NATIVE_GLOBAL;

/// Destination for diagnostic output written by `log` and `print`.
pub type Diagnostics = Rc<RefCell<dyn Write>>;

/// Signature of a native function implementation.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value, NativeError>>;

/// Errors raised by native functions and the registry.
#[derive(Debug, Error)]
pub enum NativeError {
  #[error("invalid args: {func}: {expected}")]
  InvalidArgs { func: String, expected: String },

  #[error("failed to marshal {format}: {message}")]
  Marshal { format: &'static str, message: String },

  #[error("failed to unmarshal {format}: {message}")]
  Unmarshal { format: &'static str, message: String },

  #[error("failed writing logs: {0}")]
  Io(#[from] std::io::Error),

  #[error("unknown native function '{0}'")]
  Unknown(String),

  #[error("native function '{0}' is already registered")]
  Duplicate(String),
}

impl NativeError {
  pub fn invalid_args(func: &str, expected: impl Into<String>) -> Self {
    Self::InvalidArgs {
      func: func.to_string(),
      expected: expected.into(),
    }
  }

  /// Wrong argument count for `func`.
  pub fn arity(func: &str, expected: usize, got: usize) -> Self {
    let plural = if expected == 1 { "" } else { "s" };
    Self::invalid_args(func, format!("{func} needs {expected} argument{plural}, got {got}"))
  }
}

/// A named host function with its declared parameters.
#[derive(Clone)]
pub struct NativeFunction {
  name: String,
  params: Vec<String>,
  func: NativeFn,
}

impl NativeFunction {
  pub fn new<F>(name: &str, params: &[&str], func: F) -> Self
  where
    F: Fn(&[Value]) -> Result<Value, NativeError> + 'static,
  {
    Self {
      name: name.to_string(),
      params: params.iter().map(|p| p.to_string()).collect(),
      func: Rc::new(func),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn params(&self) -> &[String] {
    &self.params
  }

  pub fn call(&self, args: &[Value]) -> Result<Value, NativeError> {
    (self.func)(args)
  }
}

impl fmt::Debug for NativeFunction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NativeFunction")
      .field("name", &self.name)
      .field("params", &self.params)
      .finish_non_exhaustive()
  }
}

/// Ordered table of native functions.
#[derive(Debug, Clone, Default)]
pub struct NativeRegistry {
  functions: Vec<NativeFunction>,
}

impl NativeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding the standard primitives, with `log` writing to `diagnostics`.
  pub fn with_builtins(diagnostics: Diagnostics) -> Self {
    Self {
      functions: builtins::builtins(diagnostics),
    }
  }

  /// Add a function. Names must be unique.
  pub fn register(&mut self, function: NativeFunction) -> Result<(), NativeError> {
    if self.get(function.name()).is_some() {
      return Err(NativeError::Duplicate(function.name));
    }
    self.functions.push(function);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&NativeFunction> {
    self.functions.iter().find(|f| f.name == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &NativeFunction> {
    self.functions.iter()
  }

  pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, NativeError> {
    let function = self.get(name).ok_or_else(|| NativeError::Unknown(name.to_string()))?;
    if args.len() != function.params().len() {
      return Err(NativeError::arity(name, function.params().len(), args.len()));
    }
    trace!(name, args = args.len(), "invoking native function");
    function.call(args)
  }

  /// Render the stdlib module: one table field per function, in registration
  /// order. Wrappers forward every argument so the registry sees the real count;
  /// the declared parameters are kept as a trailing comment.
  pub fn stdlib_source(&self) -> String {
    let mut source = String::from("return {\n");
    for function in &self.functions {
      source.push_str(&format!(
        "  {name} = function(...) return {native}(\"{name}\")(...) end, -- ({params})\n",
        name = function.name,
        params = function.params.join(", "),
        native = NATIVE_GLOBAL,
      ));
    }
    source.push_str("}\n");
    source
  }
}
