use crate::model::{MatchCandidate, Matched};

pub const UNKNOWN_PATTERN: &str = "unknown";

/// Shape a winning candidate into its final output form.
///
/// The payload always exists and records where it came from. Provenance a
/// strategy already set is kept, otherwise `source_text` defaults to the input
/// as received and `source_type` to the match type. The original
/// text is filled in when the strategy left it out, and a missing pattern is
/// reported as `unknown`. Nothing happens when there is no candidate.
pub fn finalize(candidate: Option<MatchCandidate>, original: &str) -> Option<MatchCandidate> {
  let mut candidate = candidate?;

  candidate.fill_original(original);

  let source_type = candidate.match_type.as_str().to_string();
  let matched = candidate.matched.get_or_insert_with(Matched::default);

  matched.source_text.get_or_insert_with(|| original.to_string());
  matched.source_type.get_or_insert(source_type);

  if candidate.pattern.as_deref().is_none_or(|pattern| pattern.trim().is_empty()) {
    candidate.pattern = Some(UNKNOWN_PATTERN.to_string());
  }

  Some(candidate)
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use serde_json_assert::assert_json_include;

  use super::finalize;
  use crate::model::{MatchCandidate, MatchType, Matched};

  #[test]
  fn nothing_in_nothing_out() {
    assert_eq!(finalize(None, "Simpson Chubby 2"), None);
  }

  #[test]
  fn provenance_is_recorded() {
    let candidate = MatchCandidate::new("complete_brush", "Simpson Chubby 2")
      .with_matched(Matched::simple("Simpson", "Chubby 2"))
      .with_pattern("chubby\\s*2");

    let finalized = finalize(Some(candidate), "  Simpson Chubby 2 ").unwrap();

    assert_json_include!(
      actual: serde_json::to_value(&finalized).unwrap(),
      expected: json!({
        "original": "Simpson Chubby 2",
        "strategy": "complete_brush",
        "pattern": "chubby\\s*2",
        "match_type": "regex",
        "matched": {
          "brand": "Simpson",
          "model": "Chubby 2",
          "source_text": "  Simpson Chubby 2 ",
          "source_type": "regex"
        }
      })
    );
  }

  #[test]
  fn strategy_provenance_is_kept() {
    let matched = Matched {
      source_text: Some("Chubby 2 (handle side)".into()),
      source_type: Some("regex_catalog".into()),
      ..Matched::simple("Simpson", "Chubby 2")
    };

    let finalized = finalize(Some(MatchCandidate::new("complete_brush", "Simpson Chubby 2").with_matched(matched)), "Simpson Chubby 2").unwrap();
    let matched = finalized.matched.unwrap();

    assert_eq!(matched.source_text.as_deref(), Some("Chubby 2 (handle side)"));
    assert_eq!(matched.source_type.as_deref(), Some("regex_catalog"));
  }

  #[test]
  fn missing_parts_are_filled_in() {
    let finalized = finalize(Some(MatchCandidate::new("custom", "").with_match_type(MatchType::Fallback).with_pattern("   ")), "Semogue 610").unwrap();
    let matched = finalized.matched.as_ref().unwrap();

    assert_eq!(finalized.original(), "Semogue 610");
    assert_eq!(finalized.pattern.as_deref(), Some("unknown"));
    assert_eq!(matched.source_text.as_deref(), Some("Semogue 610"));
    assert_eq!(matched.source_type.as_deref(), Some("fallback"));
    assert!(matched.brand.is_none());
  }

  #[test]
  fn composite_payload_is_kept() {
    let candidate = MatchCandidate::new("automated_split", "Dogwood w/ B2")
      .with_match_type(MatchType::Composite)
      .with_matched(Matched::composite(Some(Default::default()), None));

    let finalized = finalize(Some(candidate), "Dogwood w/ B2").unwrap();
    let matched = finalized.matched.unwrap();

    assert!(matched.is_composite());
    assert_eq!(matched.source_type.as_deref(), Some("composite"));
    assert_eq!(finalized.pattern.as_deref(), Some("unknown"));
  }
}
