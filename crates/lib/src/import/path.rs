//! Lexical handling of slash-separated virtual paths.
//!
//! These follow POSIX `path` semantics: no filesystem access, `..` collapses
//! the previous segment, and rooted paths cannot climb above `/`.

/// Lexically clean `path`: drop empty and `.` segments and collapse `..`.
///
/// An empty result becomes `.`; a rooted path stays rooted.
pub fn clean(path: &str) -> String {
  if path.is_empty() {
    return ".".to_string();
  }

  let rooted = path.starts_with('/');
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if segments.last().is_some_and(|last| *last != "..") {
          segments.pop();
        } else if !rooted {
          segments.push("..");
        }
      }
      other => segments.push(other),
    }
  }

  let body = segments.join("/");
  if rooted {
    format!("/{}", body)
  } else if body.is_empty() {
    ".".to_string()
  } else {
    body
  }
}

/// Join non-empty segments with `/` and clean the result.
///
/// Returns an empty string when every segment is empty.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
  let joined = segments
    .iter()
    .map(|s| s.as_ref())
    .filter(|s: &&str| !s.is_empty())
    .collect::<Vec<_>>()
    .join("/");
  if joined.is_empty() { joined } else { clean(&joined) }
}

/// The directory portion of `path`, cleaned. `.` when there is none.
pub fn dir(path: &str) -> String {
  match path.rfind('/') {
    Some(idx) => clean(&path[..=idx]),
    None => ".".to_string(),
  }
}

/// Whether `path` names a file inside the tree root.
///
/// Valid paths are relative, non-empty, and consist only of real names: no
/// empty, `.` or `..` segments.
pub fn is_valid(path: &str) -> bool {
  !path.is_empty()
    && !path.starts_with('/')
    && path
      .split('/')
      .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
