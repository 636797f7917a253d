use std::collections::{BTreeMap, HashMap};

use ahash::RandomState;
use serde::Deserialize;

use crate::{
  model::{Component, MatchCandidate, MatchType, Matched},
  text::normalize,
};

/// Name reported as the strategy of curated matches.
pub const CURATED_STRATEGY: &str = "correct_matches";

/// Score tier given to curated matches, which are never run through the scoring engine.
pub const CURATED_SCORE: f64 = 100.0;

/// Curated table of human-confirmed text to product mappings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CuratedMatches {
  /// Brand, then model, then the literal strings known to designate it.
  #[serde(default)]
  pub brush: BTreeMap<String, BTreeMap<String, Vec<String>>>,
  #[serde(default)]
  pub composite: Vec<CuratedComposite>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CuratedComposite {
  pub handle: Option<Component>,
  pub knot: Option<Component>,
  #[serde(default)]
  pub strings: Vec<String>,
}

/// Lookup of normalized input text into the curated table.
#[derive(Clone, Debug, Default)]
pub struct ExactMatchLookup {
  index: HashMap<String, Matched, RandomState>,
}

impl ExactMatchLookup {
  pub fn new(curated: &CuratedMatches) -> ExactMatchLookup {
    let mut index = HashMap::<String, Matched, RandomState>::default();

    for (brand, models) in &curated.brush {
      for (model, strings) in models {
        for string in strings {
          insert(&mut index, string, Matched::simple(brand, model));
        }
      }
    }

    for composite in &curated.composite {
      if composite.handle.is_none() && composite.knot.is_none() {
        tracing::warn!(strings = ?composite.strings, "ignoring curated composite without handle or knot");
        continue;
      }

      for string in &composite.strings {
        insert(&mut index, string, Matched::composite(composite.handle.clone(), composite.knot.clone()));
      }
    }

    ExactMatchLookup { index }
  }

  /// Find the curated match for the text, if any.
  ///
  /// Hits come back with their score preset to [`CURATED_SCORE`].
  pub fn lookup(&self, text: &str) -> Option<MatchCandidate> {
    let key = normalize(text);
    let matched = self.index.get(&key)?;

    let mut candidate = MatchCandidate::new(CURATED_STRATEGY, text).with_match_type(MatchType::Exact).with_matched(matched.clone()).with_pattern(key);

    candidate.score = Some(CURATED_SCORE);

    tracing::debug!(strategy = CURATED_STRATEGY, composite = matched.is_composite(), "curated match");

    Some(candidate)
  }

  pub fn len(&self) -> usize {
    self.index.len()
  }

  pub fn is_empty(&self) -> bool {
    self.index.is_empty()
  }
}

fn insert(index: &mut HashMap<String, Matched, RandomState>, string: &str, matched: Matched) {
  let key = normalize(string);

  if key.is_empty() {
    return;
  }

  if index.contains_key(&key) {
    tracing::warn!(text = %key, "duplicate curated string, keeping the first entry");
    return;
  }

  index.insert(key, matched);
}
