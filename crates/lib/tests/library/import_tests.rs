//! Tests for import resolution from templates.

use cfgen_lib::consts::STDLIB_IMPORT;
use cfgen_lib::{EngineError, OutputMode};
use serde_json::json;

use super::common::{create_session, diagnostics_text};

#[test]
fn relative_imports_follow_the_importing_file() {
  let (session, _) = create_session(&[
    ("main.lua", "return import('apps/web.lua')"),
    ("apps/web.lua", "local defaults = import('../lib/defaults.lua') return { port = defaults.port }"),
    ("lib/defaults.lua", "return { port = 8080 }"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!({ "port": 8080 }));
}

#[test]
fn import_inside_function_uses_defining_file() {
  let (session, _) = create_session(&[
    ("main.lua", "local mk = import('lib/mk.lua') return mk()"),
    ("lib/mk.lua", "return function() return import('value.lua') end"),
    ("lib/value.lua", "return 'from lib'"),
    ("value.lua", "return 'from root'"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!("from lib"));
}

#[test]
fn imported_files_evaluate_once() {
  let (session, diagnostics) = create_session(&[
    ("main.lua", "local a = import('lib.lua') local b = import('./lib.lua') return a.n + b.n"),
    ("lib.lua", "print('loading lib') return { n = 1 }"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!(2));
  assert_eq!(diagnostics_text(&diagnostics), "loading lib\n");
}

#[test]
fn importers_do_not_share_mutations() {
  let (session, _) = create_session(&[
    (
      "main.lua",
      r#"
        local lib = import('lib.lua')
        lib.port = 1
        lib.nested.x = 2
        lib.added = true
        return { mine = lib, theirs = import('other.lua') }
      "#,
    ),
    ("other.lua", "return import('lib.lua')"),
    ("lib.lua", "local t = { port = 80, nested = { x = 1 } } t.alias = t.nested return t"),
  ]);

  assert_eq!(
    session.evaluate_value("main.lua").unwrap(),
    json!({
      "mine": { "port": 1, "nested": { "x": 2 }, "alias": { "x": 2 }, "added": true },
      "theirs": { "port": 80, "nested": { "x": 1 }, "alias": { "x": 1 } }
    })
  );
}

#[test]
fn imported_functions_survive_copying() {
  let (session, _) = create_session(&[
    ("main.lua", "local a = import('lib.lua') local b = import('lib.lua') return a.inc(1) + b.inc(2)"),
    ("lib.lua", "return { inc = function(n) return n + 1 end }"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!(5));
}

#[test]
fn importstr_returns_raw_contents() {
  let (session, _) = create_session(&[
    ("main.lua", "return { banner = importstr('files/banner.txt') }"),
    ("files/banner.txt", "hello\nworld\n"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!({ "banner": "hello\nworld\n" }));
}

#[test]
fn escaping_the_tree_fails() {
  let (session, _) = create_session(&[("main.lua", "return importstr('/../outside')")]);

  let err = session.evaluate("main.lua", OutputMode::Json).unwrap_err();
  assert!(matches!(err, EngineError::Evaluation { .. }));
  assert!(err.to_string().contains("invalid import path '/../outside'"), "{}", err);
}

#[test]
fn missing_import_names_the_path() {
  let (session, _) = create_session(&[("main.lua", "return import('lib/missing.lua')")]);

  let err = session.evaluate("main.lua", OutputMode::Json).unwrap_err();
  assert!(err.to_string().contains("lib/missing.lua: file not found"), "{}", err);
}

#[test]
fn failed_import_is_replayed_from_cache() {
  let (session, _) = create_session(&[(
    "main.lua",
    r#"
      local ok1, err1 = pcall(import, 'nope.lua')
      local ok2, err2 = pcall(import, 'nope.lua')
      return {
        ok1 = ok1,
        ok2 = ok2,
        named = tostring(err1):find('nope.lua', 1, true) ~= nil and tostring(err2):find('nope.lua', 1, true) ~= nil,
      }
    "#,
  )]);

  assert_eq!(
    session.evaluate_value("main.lua").unwrap(),
    json!({ "ok1": false, "ok2": false, "named": true })
  );
  assert_eq!(session.cached_imports(), 2);
}

#[test]
fn import_cycles_are_reported() {
  let (session, _) = create_session(&[
    ("main.lua", "return import('a.lua')"),
    ("a.lua", "return import('b.lua')"),
    ("b.lua", "return import('a.lua')"),
  ]);

  let err = session.evaluate("main.lua", OutputMode::Json).unwrap_err();
  assert!(err.to_string().contains("import cycle: main.lua -> a.lua -> b.lua -> a.lua"), "{}", err);
}

#[test]
fn stdlib_wins_over_tree_file_of_same_name() {
  let (session, _) = create_session(&[
    ("main.lua", "return type(import('native:std').sha256hex)"),
    (STDLIB_IMPORT, "return { sha256hex = 'shadowed' }"),
  ]);

  assert_eq!(session.evaluate_value("main.lua").unwrap(), json!("function"));
}

#[test]
fn entry_path_is_normalized() {
  let (session, _) = create_session(&[("conf/main.lua", "return 1")]);

  assert_eq!(session.evaluate_value("./conf/../conf/main.lua").unwrap(), json!(1));
  let err = session.evaluate("../main.lua", OutputMode::Json).unwrap_err();
  assert!(matches!(err, EngineError::Import(_)));
}
