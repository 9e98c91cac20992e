//! cfgen-lib: configuration generation from sandboxed Lua templates.
//!
//! A caller supplies a bundle of template files and an entry path. The entry is
//! evaluated in an embedded Lua runtime where every import is resolved against
//! the bundle, never the real filesystem, and host functions (JSON/YAML codecs,
//! merge patch, hashing, path joining) are reachable through the generated
//! `native:std` module. The entry's value is rendered as JSON or as a raw string.
//! A request can also be packed into a compact share code, see [`share`].
//!
//! ```ignore
//! use cfgen_lib::{OutputMode, Session, VirtualFileTree};
//!
//! let tree: VirtualFileTree = [("main.lua", "return { replicas = 3 }")].into_iter().collect();
//! let output = Session::new(tree)?.evaluate("main.lua", OutputMode::Json)?;
//! ```

pub mod consts;
pub mod error;
pub mod import;
pub mod json;
pub mod lua;
pub mod native;
pub mod session;
pub mod share;
pub mod tree;

pub use error::EngineError;
pub use import::{ImportError, ImportResolver};
pub use native::{NativeError, NativeFunction, NativeRegistry};
pub use session::{OutputMode, Request, Session};
pub use tree::{FileTree, VirtualFileTree};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
