//! In-memory file trees that stand in for the filesystem during evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read-only lookup of template sources by normalized path.
///
/// The resolver is generic over this so tests can observe how often the
/// backing store is consulted.
pub trait FileTree {
  /// Return the contents at `path`, a normalized slash-separated path with no
  /// leading slash.
  fn read(&self, path: &str) -> Option<&str>;
}

/// A caller-supplied bundle of template files keyed by virtual path.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualFileTree {
  files: BTreeMap<String, String>,
}

impl VirtualFileTree {
  pub fn new(files: BTreeMap<String, String>) -> Self {
    Self { files }
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

impl FileTree for VirtualFileTree {
  fn read(&self, path: &str) -> Option<&str> {
    self.files.get(path).map(String::as_str)
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VirtualFileTree {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}
