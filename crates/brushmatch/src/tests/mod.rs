use libbrushmatch::prelude::*;
use serde_json::{Value, json};
use serde_json_assert::assert_json_include;

use crate::run::{RunStats, run};

fn resolve_lines(matcher: &BrushMatcher, input: &str) -> (RunStats, Vec<Value>) {
  let mut output = Vec::new();
  let stats = run(matcher, input.as_bytes(), &mut output, false).unwrap();
  let documents = String::from_utf8(output).unwrap().lines().map(|line| serde_json::from_str(line).unwrap()).collect();

  (stats, documents)
}

#[test]
fn one_document_per_input() {
  let matcher = BrushMatcher::new().build().unwrap();
  let (stats, documents) = resolve_lines(&matcher, "Simpson Chubby II\n\n   \nSimpson Chubby 2 w/ Zenith B07 Boar\nsomething else entirely\n");

  assert_eq!(stats, RunStats { inputs: 3, matched: 2, failed: 0 });
  assert_eq!(documents.len(), 3);

  assert_json_include!(
    actual: &documents[0],
    expected: json!({
      "input": "Simpson Chubby II",
      "best": {
        "strategy": "correct_matches",
        "match_type": "exact",
        "score": 100.0,
        "matched": { "brand": "Simpson", "model": "Chubby 2", "source_type": "exact" }
      }
    })
  );

  assert_json_include!(
    actual: &documents[1],
    expected: json!({
      "input": "Simpson Chubby 2 w/ Zenith B07 Boar",
      "best": {
        "strategy": "automated_split",
        "match_type": "composite",
        "matched": {
          "handle": { "brand": "Simpson" },
          "knot": { "brand": "Zenith", "model": "B07" }
        }
      }
    })
  );

  assert_eq!(documents[2]["best"], Value::Null);
  assert_eq!(documents[2]["all_candidates"], json!([]));
}

#[test]
fn failures_are_reported_inline() {
  let matcher = BrushMatcher::new().config(ConfigSource::Inline("not: [a, valid, config]".into())).build().unwrap();

  assert!(!matcher.config().is_loaded());
  assert!(!matcher.last_validation().errors.is_empty());

  let (stats, documents) = resolve_lines(&matcher, "Simpson Chubby 2\nOmega 10049\n");

  assert_eq!(stats, RunStats { inputs: 2, matched: 0, failed: 2 });
  assert_json_include!(
    actual: &documents[1],
    expected: json!({ "input": "Omega 10049", "error": "invalid configuration: scoring configuration is not loaded" })
  );
}

#[test]
fn pretty_output() {
  let matcher = BrushMatcher::new().build().unwrap();
  let mut output = Vec::new();

  run(&matcher, "Omega Pro 49".as_bytes(), &mut output, true).unwrap();

  let output = String::from_utf8(output).unwrap();

  assert!(output.lines().count() > 1);
  assert_eq!(serde_json::from_str::<Value>(&output).unwrap()["best"]["strategy"], "correct_matches");
}
