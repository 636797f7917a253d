use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mechanism a strategy used to produce a candidate.
///
/// This is informational only and never participates in scoring.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
  Exact,
  #[default]
  Regex,
  Composite,
  Split,
  Fallback,
}

impl MatchType {
  pub fn as_str(&self) -> &'static str {
    match self {
      MatchType::Exact => "exact",
      MatchType::Regex => "regex",
      MatchType::Composite => "composite",
      MatchType::Split => "split",
      MatchType::Fallback => "fallback",
    }
  }
}

impl fmt::Display for MatchType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One independently matched half of a composite brush.
///
/// `score`, when present, was computed once by the strategy that produced the
/// component and already includes every bonus (priority tier included).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Component {
  pub brand: Option<String>,
  pub model: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fiber: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub knot_size_mm: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score: Option<f64>,
}

/// Structured payload of a candidate.
///
/// A simple match carries `brand`/`model` at the top level. A composite match
/// leaves both empty and carries a `handle` and/or a `knot` instead.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Matched {
  pub brand: Option<String>,
  pub model: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fiber: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub knot_size_mm: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub handle: Option<Component>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub knot: Option<Component>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_type: Option<String>,
  #[serde(default, flatten)]
  pub extra: Map<String, Value>,
}

impl Matched {
  pub fn simple(brand: impl Into<String>, model: impl Into<String>) -> Matched {
    Matched {
      brand: Some(brand.into()),
      model: Some(model.into()),
      ..Default::default()
    }
  }

  pub fn composite(handle: Option<Component>, knot: Option<Component>) -> Matched {
    Matched { handle, knot, ..Default::default() }
  }

  pub fn is_composite(&self) -> bool {
    self.brand.is_none() && self.model.is_none() && (self.handle.is_some() || self.knot.is_some())
  }

  /// Whether the payload identifies nothing at all.
  ///
  /// Provenance fields (`source_text`, `source_type`) do not count as content.
  pub fn is_empty(&self) -> bool {
    self.brand.is_none() && self.model.is_none() && self.fiber.is_none() && self.knot_size_mm.is_none() && self.handle.is_none() && self.knot.is_none() && self.extra.is_empty()
  }
}

/// The output of one strategy attempt against one input.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchCandidate {
  original: String,
  pub matched: Option<Matched>,
  pub match_type: MatchType,
  pub pattern: Option<String>,
  pub strategy: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score: Option<f64>,
}

impl MatchCandidate {
  pub fn new(strategy: impl Into<String>, original: impl Into<String>) -> MatchCandidate {
    MatchCandidate {
      original: original.into(),
      strategy: strategy.into(),
      ..Default::default()
    }
  }

  pub fn with_matched(mut self, matched: Matched) -> MatchCandidate {
    self.matched = Some(matched);
    self
  }

  pub fn with_match_type(mut self, match_type: MatchType) -> MatchCandidate {
    self.match_type = match_type;
    self
  }

  pub fn with_pattern(mut self, pattern: impl Into<String>) -> MatchCandidate {
    self.pattern = Some(pattern.into());
    self
  }

  /// The input text the candidate was produced from, as received.
  pub fn original(&self) -> &str {
    &self.original
  }

  pub(crate) fn fill_original(&mut self, original: &str) {
    if self.original.is_empty() {
      self.original = original.to_string();
    }
  }

  pub fn has_payload(&self) -> bool {
    self.matched.as_ref().is_some_and(|matched| !matched.is_empty())
  }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ModifierContribution {
  pub name: String,
  pub raw_value: f64,
  pub weight: f64,
  pub contribution: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ScoreBreakdown {
  pub base_score: f64,
  pub modifier_contributions: Vec<ModifierContribution>,
  /// Set when the raw total fell under the minimum threshold and was raised to it.
  #[serde(default)]
  pub floored: bool,
}

impl ScoreBreakdown {
  pub fn modifier_total(&self) -> f64 {
    self.modifier_contributions.iter().map(|modifier| modifier.contribution).sum()
  }
}

/// A candidate with its finalized score and the full breakdown behind it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredResult {
  #[serde(flatten)]
  candidate: MatchCandidate,
  total_score: f64,
  breakdown: ScoreBreakdown,
}

impl ScoredResult {
  pub(crate) fn new(mut candidate: MatchCandidate, total_score: f64, breakdown: ScoreBreakdown) -> ScoredResult {
    candidate.score = Some(total_score);

    ScoredResult { candidate, total_score, breakdown }
  }

  pub fn candidate(&self) -> &MatchCandidate {
    &self.candidate
  }

  pub fn strategy(&self) -> &str {
    &self.candidate.strategy
  }

  pub fn total_score(&self) -> f64 {
    self.total_score
  }

  pub fn breakdown(&self) -> &ScoreBreakdown {
    &self.breakdown
  }

  pub fn into_candidate(self) -> MatchCandidate {
    self.candidate
  }
}
