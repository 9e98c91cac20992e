//! The embedded Lua evaluator.
//!
//! Templates are Lua chunks whose returned value is the file's value. Each file
//! runs in its own environment exposing `import` and `importstr` bound to that
//! file's path; everything else falls through to the shared, sandboxed globals.

pub mod convert;
pub mod loaders;
pub mod runtime;

pub use runtime::Runtime;
