/// Import target that always yields the generated native stdlib module.
///
/// Matched before any path handling; a tree file with the same name is never served.
pub const STDLIB_IMPORT: &str = "native:std";

/// Entry file evaluated when a request does not name one.
pub const DEFAULT_ENTRY: &str = "main.lua";

/// Global through which templates reach host functions.
pub const NATIVE_GLOBAL: &str = "native";

/// Global holding the JSON null sentinel.
pub const NULL_GLOBAL: &str = "null";
