use std::sync::Arc;

use crate::{
  catalog::Catalogs,
  model::{Component, MatchCandidate, MatchType, Matched},
  strategy::{ComponentScorer, Strategy, StrategyError},
  text::{DelimiterConfidence, split_components},
};

/// Splits the input into a handle and a knot around a delimiter and matches
/// both halves independently.
pub struct AutomatedSplitStrategy {
  catalogs: Arc<Catalogs>,
  scorer: ComponentScorer,
}

impl AutomatedSplitStrategy {
  pub const NAME: &'static str = "automated_split";

  pub fn new(catalogs: Arc<Catalogs>) -> AutomatedSplitStrategy {
    AutomatedSplitStrategy {
      catalogs,
      scorer: ComponentScorer::default(),
    }
  }

  pub fn with_scorer(mut self, scorer: ComponentScorer) -> AutomatedSplitStrategy {
    self.scorer = scorer;
    self
  }

  fn components(&self, handle_text: &str, knot_text: &str) -> (Option<Component>, Option<Component>) {
    let handle = self.catalogs.handles.first_match(handle_text).map(|(entry, pattern)| self.scorer.component(entry, pattern, handle_text));
    let knot = self.catalogs.knots.first_match(knot_text).map(|(entry, pattern)| self.scorer.component(entry, pattern, knot_text));

    (handle, knot)
  }
}

impl Strategy for AutomatedSplitStrategy {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn try_match(&self, text: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    let Some((lhs, rhs, confidence)) = split_components(text) else {
      return Ok(None);
    };

    // Both "handle w/ knot" and "knot in handle" are common, keep whichever
    // reading identifies more components.
    let forward = self.components(lhs, rhs);
    let backward = self.components(rhs, lhs);

    let found = |(handle, knot): &(Option<Component>, Option<Component>)| usize::from(handle.is_some()) + usize::from(knot.is_some());

    let (handle, knot) = match found(&backward) > found(&forward) {
      true => backward,
      false => forward,
    };

    if handle.is_none() && knot.is_none() {
      return Ok(None);
    }

    let pattern = match confidence {
      DelimiterConfidence::High => "high_confidence_delimiter",
      DelimiterConfidence::Medium => "medium_confidence_delimiter",
    };

    Ok(Some(
      MatchCandidate::new(Self::NAME, text)
        .with_match_type(MatchType::Composite)
        .with_pattern(pattern)
        .with_matched(Matched::composite(handle, knot)),
    ))
  }
}
