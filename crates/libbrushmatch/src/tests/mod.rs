use crate::{
  catalog::{CatalogSource, Catalogs},
  model::{MatchCandidate, Matched},
  strategy::{Strategy, StrategyError},
  text::Lexicon,
};

pub(crate) const TEST_CONFIG: &str = "
base_strategy_scores:
  complete_brush: 90
  automated_split: 60
  known_knot: 50
  placeholder: 10
strategy_modifiers:
  complete_brush:
    brand_in_text: 5
    model_in_text: 5
    fiber_mismatch: -20
    high_confidence_delimiter: -15
  automated_split:
    multiple_brands: 25
    dual_component: 10
    handle_weight: 0.5
    knot_weight: 0.5
    handle_only: -10
    knot_only: -5
  known_knot:
    fiber_words: 5
    knot_indicators: 5
    size_specification: 2
    multiple_brands: -60
  placeholder:
    not_implemented_yet: 7.5
routing_rules:
  minimum_score_threshold: 0
  max_strategies_to_run: 10
  stop_on_good_match: false
";

/// Brand names from the embedded catalogs.
pub(crate) fn brands() -> Lexicon {
  Catalogs::load(&CatalogSource::Embedded).unwrap().brand_lexicon().unwrap()
}

/// Always returns the same simple payload under its own name.
pub(crate) struct FixedStrategy {
  name: String,
  matched: Matched,
}

impl FixedStrategy {
  pub(crate) fn simple(name: &str, brand: &str, model: &str) -> FixedStrategy {
    FixedStrategy {
      name: name.to_string(),
      matched: Matched::simple(brand, model),
    }
  }
}

impl Strategy for FixedStrategy {
  fn name(&self) -> &str {
    &self.name
  }

  fn try_match(&self, text: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    Ok(Some(MatchCandidate::new(&self.name, text).with_matched(self.matched.clone()).with_pattern(&self.name)))
  }
}

pub(crate) struct FailingStrategy;

impl Strategy for FailingStrategy {
  fn name(&self) -> &str {
    "failing"
  }

  fn try_match(&self, _: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    Err(StrategyError::Failed("always fails".into()))
  }
}

pub(crate) struct NoMatchStrategy;

impl Strategy for NoMatchStrategy {
  fn name(&self) -> &str {
    "no_match"
  }

  fn try_match(&self, _: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    Ok(None)
  }
}

pub(crate) struct PanickingStrategy;

impl Strategy for PanickingStrategy {
  fn name(&self) -> &str {
    "panicking"
  }

  fn try_match(&self, _: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    panic!("strategy bug");
  }
}
