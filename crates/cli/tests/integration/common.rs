//! Shared helpers for CLI integration tests.

use assert_cmd::Command;
use serde_json::json;
use tempfile::TempDir;

/// A request document plus a scratch directory for writing it to disk.
pub struct TestEnv {
  pub dir: TempDir,
  pub request: serde_json::Value,
}

impl TestEnv {
  /// A request over `files` with the default entry.
  pub fn with_files(files: &[(&str, &str)]) -> Self {
    let files: serde_json::Map<String, serde_json::Value> =
      files.iter().map(|(k, v)| (k.to_string(), json!(v))).collect();
    Self {
      dir: TempDir::new().expect("Failed to create temp dir"),
      request: json!({ "files": files }),
    }
  }

  pub fn request_text(&self) -> String {
    self.request.to_string()
  }

  /// Write the request to `request.json` and return its path.
  pub fn write_request(&self) -> std::path::PathBuf {
    let path = self.dir.path().join("request.json");
    std::fs::write(&path, self.request_text()).expect("Failed to write request");
    path
  }

  pub fn cfgen_cmd(&self) -> Command {
    let mut cmd = Command::cargo_bin("cfgen").expect("Failed to find cfgen binary");
    cmd.env("NO_COLOR", "1");
    cmd
  }
}
