use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use super::{ImportError, path};
use crate::consts::STDLIB_IMPORT;
use crate::tree::{FileTree, VirtualFileTree};

/// A successfully resolved import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
  /// Normalized path of the import, or [`STDLIB_IMPORT`] for the stdlib module.
  pub path: String,
  /// Source text of the import.
  pub contents: Rc<str>,
}

/// Maps import statements to file contents for one evaluation session.
///
/// Results are memoized by normalized path, failures included: once a path has
/// been looked up, the tree is never consulted for it again. The cache is owned
/// by the resolver and is not meant to be shared between sessions.
pub struct ImportResolver<T: FileTree = VirtualFileTree> {
  tree: T,
  stdlib: Rc<str>,
  cache: HashMap<String, Result<Rc<str>, ImportError>>,
}

impl<T: FileTree> ImportResolver<T> {
  /// Create a resolver over `tree` that serves `stdlib` for [`STDLIB_IMPORT`].
  pub fn new(tree: T, stdlib: impl Into<Rc<str>>) -> Self {
    Self {
      tree,
      stdlib: stdlib.into(),
      cache: HashMap::new(),
    }
  }

  /// Resolve `target` as imported from the file at `importing`.
  ///
  /// `importing` is the normalized path of the importing file; pass an empty
  /// string to resolve relative to the tree root.
  pub fn resolve(&mut self, importing: &str, target: &str) -> Result<Resolved, ImportError> {
    if target == STDLIB_IMPORT {
      return Ok(Resolved {
        path: STDLIB_IMPORT.to_string(),
        contents: self.stdlib.clone(),
      });
    }

    let path = normalize(importing, target)?;
    let contents = self.read(&path)?;
    Ok(Resolved { path, contents })
  }

  /// Number of distinct paths looked up so far, successful or not.
  pub fn cached_len(&self) -> usize {
    self.cache.len()
  }

  pub fn tree(&self) -> &T {
    &self.tree
  }

  fn read(&mut self, path: &str) -> Result<Rc<str>, ImportError> {
    if let Some(cached) = self.cache.get(path) {
      trace!(path, hit = cached.is_ok(), "import cache hit");
      return cached.clone();
    }

    let result = match self.tree.read(path) {
      Some(contents) => Ok(Rc::from(contents)),
      None => Err(ImportError::NotFound { path: path.to_string() }),
    };
    debug!(path, found = result.is_ok(), "resolved import");
    self.cache.insert(path.to_string(), result.clone());
    result
  }
}

/// Compute the tree path that `target`, imported from `importing`, refers to.
///
/// Fails with [`ImportError::InvalidPath`] when the result escapes the tree
/// root or does not name a file.
pub fn normalize(importing: &str, target: &str) -> Result<String, ImportError> {
  let name = match target.strip_prefix('/') {
    Some(rooted) => path::clean(rooted),
    None => path::join(&[path::dir(importing).as_str(), target]),
  };

  if !path::is_valid(&name) {
    return Err(ImportError::InvalidPath {
      target: target.to_string(),
      from: importing.to_string(),
    });
  }
  Ok(name)
}
