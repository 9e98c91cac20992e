//! Tests for the native stdlib module.

use cfgen_lib::{EngineError, OutputMode};
use serde_json::json;

use super::common::{create_session, diagnostics_text};

#[test]
fn merge_patch_builds_overlays() {
  let (session, _) = create_session(&[
    (
      "main.lua",
      r#"
        local std = import('native:std')
        local base = import('base.lua')
        return std.jsonMergePatch(base, { spec = { replicas = 5, debug = null }, labels = { 'prod' } })
      "#,
    ),
    (
      "base.lua",
      "return { name = 'web', spec = { replicas = 1, debug = true, image = 'web:1' }, labels = { 'dev', 'test' } }",
    ),
  ]);

  assert_eq!(
    session.evaluate_value("main.lua").unwrap(),
    json!({
      "name": "web",
      "spec": { "replicas": 5, "image": "web:1" },
      "labels": ["prod"]
    })
  );
}

#[test]
fn merge_patch_all_applies_in_order() {
  let (session, _) = create_session(&[(
    "main.lua",
    r#"
      local std = import('native:std')
      return std.jsonMergePatchAll({ a = 1 }, { { a = 2, b = 1 }, { a = null }, { c = { d = 1 } } })
    "#,
  )]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!({ "b": 1, "c": { "d": 1 } }));
}

#[test]
fn json_and_yaml_codecs() {
  let (session, _) = create_session(&[(
    "main.lua",
    r#"
      local std = import('native:std')
      return {
        json = std.jsonMarshal({ b = 1, a = '<tag>' }),
        parsed = std.jsonUnmarshal('{"x": [1, 2.5, null]}'),
        doc = std.yamlUnmarshal('name: app\nports:\n  - 80\n'),
        yaml = std.yamlMarshal({ enabled = true }),
      }
    "#,
  )]);

  assert_eq!(
    session.evaluate_value("main.lua").unwrap(),
    json!({
      "json": "{\"a\":\"<tag>\",\"b\":1}\n",
      "parsed": { "x": [1, 2.5, null] },
      "doc": { "name": "app", "ports": [80] },
      "yaml": "enabled: true\n",
    })
  );
}

#[test]
fn hash_of_marshaled_json_includes_newline() {
  let (session, _) = create_session(&[(
    "main.lua",
    "local std = import('native:std') return std.sha256hex(std.jsonMarshal({ a = 1 })) == std.sha256hex('{\"a\":1}\\n')",
  )]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!(true));
}

#[test]
fn path_join_and_hash() {
  let (session, _) = create_session(&[(
    "main.lua",
    r#"
      local std = import('native:std')
      return { path = std.pathJoin({ 'etc', 'app', '..', 'web.conf' }), digest = std.sha256hex('abc') }
    "#,
  )]);

  assert_eq!(
    session.evaluate_value("main.lua").unwrap(),
    json!({
      "path": "etc/web.conf",
      "digest": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    })
  );
}

#[test]
fn log_writes_diagnostics_and_returns_true() {
  let (session, diagnostics) = create_session(&[(
    "main.lua",
    "local std = import('native:std') return std.log('replicas', 3)",
  )]);

  let out = session.evaluate("main.lua", OutputMode::Json).unwrap();
  assert_eq!(out, "true");
  assert_eq!(diagnostics_text(&diagnostics), "[\n  \"replicas\",\n  3\n]\n");
}

#[test]
fn invalid_args_abort_evaluation() {
  let (session, _) = create_session(&[(
    "main.lua",
    "local std = import('native:std') return std.sha256hex(42)",
  )]);

  let err = session.evaluate("main.lua", OutputMode::Json).unwrap_err();
  assert!(matches!(err, EngineError::Evaluation { .. }));
  assert!(err.to_string().contains("sha256hex must have string argument"), "{}", err);
}

#[test]
fn stdlib_calls_with_wrong_argument_count_fail() {
  let cases = [
    ("std.jsonMergePatch({ a = 1 })", "jsonMergePatch needs 2 arguments, got 1"),
    ("std.jsonMarshal()", "jsonMarshal needs 1 argument, got 0"),
    ("std.sha256hex('a', 'b')", "sha256hex needs 1 argument, got 2"),
    ("std.log('only')", "log needs 2 arguments, got 1"),
  ];

  for (call, expected) in cases {
    let source = format!("local std = import('native:std') return {call}");
    let (session, _) = create_session(&[("main.lua", source.as_str())]);
    let err = session.evaluate("main.lua", OutputMode::Json).unwrap_err();
    assert!(matches!(err, EngineError::Evaluation { .. }), "{call}: {err}");
    assert!(err.to_string().contains(expected), "{call}: {err}");
  }
}

#[test]
fn explicit_nil_counts_as_an_argument() {
  let (session, _) = create_session(&[(
    "main.lua",
    "local std = import('native:std') return std.jsonMergePatch({ a = 1 }, nil)",
  )]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!(null));
}

#[test]
fn yaml_output_via_string_mode() {
  let (session, _) = create_session(&[(
    "main.lua",
    "local std = import('native:std') return std.yamlMarshal({ replicas = 2 })",
  )]);

  assert_eq!(session.evaluate("main.lua", OutputMode::String).unwrap(), "replicas: 2\n");
}
