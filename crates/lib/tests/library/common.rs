//! Shared test helpers for library integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use cfgen_lib::{Session, VirtualFileTree};

/// A session over `files` together with the buffer its diagnostics go to.
pub fn create_session(files: &[(&str, &str)]) -> (Session, Rc<RefCell<Vec<u8>>>) {
  let diagnostics = Rc::new(RefCell::new(Vec::new()));
  let tree: VirtualFileTree = files.iter().copied().collect();
  let session = Session::with_diagnostics(tree, diagnostics.clone()).expect("Failed to create session");
  (session, diagnostics)
}

pub fn diagnostics_text(diagnostics: &Rc<RefCell<Vec<u8>>>) -> String {
  String::from_utf8(diagnostics.borrow().clone()).expect("diagnostics are utf-8")
}
