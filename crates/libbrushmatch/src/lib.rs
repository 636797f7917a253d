mod assets;
mod error;
mod exact;
mod matcher;
mod model;
mod result;
mod text;

pub mod catalog;
pub mod config;
pub mod scoring;
pub mod strategy;

#[cfg(test)]
mod tests;

/// Build the keyword dictionaries and the modifier registry up front.
///
/// They are otherwise built on first use, which would land on the first
/// resolved input.
pub fn init() {
  let _ = *crate::text::FIBERS;
  let _ = *crate::text::HANDLE_WORDS;
  let _ = *crate::text::KNOT_WORDS;
  let _ = crate::scoring::known_modifiers();
}

pub mod prelude {
  pub use crate::catalog::{CatalogSource, Catalogs};
  pub use crate::config::{ConfigSource, RoutingRuleValue, RoutingRules, ScoringConfig, ScoringConfigStore, ValidationResult};
  pub use crate::error::BrushMatchError;
  pub use crate::exact::{CURATED_SCORE, CURATED_STRATEGY, CuratedMatches, ExactMatchLookup};
  pub use crate::matcher::{BrushMatcher, Resolution};
  pub use crate::model::{Component, MatchCandidate, MatchType, Matched, ModifierContribution, ScoreBreakdown, ScoredResult};
  pub use crate::result::finalize;
  pub use crate::scoring::{ScoringEngine, known_modifiers};
  pub use crate::strategy::{AutomatedSplitStrategy, CompleteBrushStrategy, ComponentScorer, KnownKnotStrategy, Strategy, StrategyAttempt, StrategyError, StrategyOrchestrator, StrategyOutcome};
  pub use crate::text::{Lexicon, normalize};
}
