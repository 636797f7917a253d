use std::sync::{Arc, PoisonError, RwLock};

use bon::bon;
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::instrument;

use crate::{
  catalog::{CatalogSource, Catalogs},
  config::{ConfigSource, ScoringConfig, ScoringConfigStore, ValidationResult},
  error::BrushMatchError,
  exact::{CURATED_SCORE, CURATED_STRATEGY, ExactMatchLookup},
  model::{MatchCandidate, ScoreBreakdown, ScoredResult},
  result::finalize,
  scoring::{ScoringEngine, known_modifiers},
  strategy::{StrategyOrchestrator, StrategyOutcome},
  text::Lexicon,
};

/// Outcome of resolving one input.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Resolution {
  /// The winning candidate, finalized for output.
  pub best: Option<MatchCandidate>,
  /// Every scored candidate, highest score first.
  pub all_candidates: Vec<ScoredResult>,
}

/// Entry point of the library.
///
/// Resolves free-form brush descriptions into structured matches, first
/// through the curated table, then by running every configured strategy and
/// scoring what they return.
///
/// # Examples
///
/// ```rust
/// # use libbrushmatch::prelude::*;
/// let matcher = BrushMatcher::new().build().unwrap();
/// let resolution = matcher.resolve("Simpson Chubby 2 w/ Zenith B07 Boar").unwrap();
///
/// if let Some(best) = resolution.best {
///   println!("{} matched with {:?}", best.strategy, best.score);
/// }
/// ```
#[derive(Debug)]
pub struct BrushMatcher {
  config: Arc<ScoringConfigStore>,
  exact: ExactMatchLookup,
  strategies: StrategyOrchestrator,
  brands: Lexicon,
  last_validation: RwLock<ValidationResult>,
}

#[bon]
impl BrushMatcher {
  /// Create a new matcher.
  ///
  /// Catalogs are loaded eagerly and any error there is fatal. The scoring
  /// configuration is loaded as well, but a rejected document only leaves the
  /// matcher unable to resolve until a valid one is loaded through
  /// [`BrushMatcher::config`].
  ///
  /// When no orchestrator is given, the built-in strategies are used.
  #[allow(clippy::new_ret_no_self)]
  #[builder(start_fn = new, finish_fn = build)]
  pub fn _new(
    #[builder(default)] config: ConfigSource,
    #[builder(default)] catalogs: CatalogSource,
    strategies: Option<StrategyOrchestrator>,
  ) -> Result<BrushMatcher, BrushMatchError> {
    crate::init();

    let catalogs = Arc::new(Catalogs::load(&catalogs)?);
    let brands = catalogs.brand_lexicon()?;
    let exact = ExactMatchLookup::new(&catalogs.curated);
    let strategies = strategies.unwrap_or_else(|| StrategyOrchestrator::with_default_strategies(catalogs));

    let matcher = BrushMatcher {
      config: Arc::new(ScoringConfigStore::new(config)),
      exact,
      strategies,
      brands,
      last_validation: RwLock::default(),
    };

    matcher.audit(matcher.config.load());

    Ok(matcher)
  }
}

impl BrushMatcher {
  /// The configuration store, shared with whoever needs to reload it.
  pub fn config(&self) -> &Arc<ScoringConfigStore> {
    &self.config
  }

  /// Re-read the scoring configuration from its current source.
  ///
  /// On rejection, the previous configuration stays in use.
  pub fn reload_config(&self) -> ValidationResult {
    self.audit(self.config.reload())
  }

  /// Outcome of the last load made by the matcher, at build time or through
  /// [`BrushMatcher::reload_config`].
  pub fn last_validation(&self) -> ValidationResult {
    self.last_validation.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  #[instrument(name = "resolve", skip_all, fields(input = text))]
  pub fn resolve(&self, text: &str) -> Result<Resolution, BrushMatchError> {
    let Some(config) = self.config.snapshot() else {
      return Err(BrushMatchError::ConfigError("scoring configuration is not loaded".into()));
    };

    if let Some(candidate) = self.exact.lookup(text) {
      counter!("brushmatch_exact_matches_total").increment(1);
      histogram!("brushmatch_resolve_scores").record(CURATED_SCORE);

      let curated = ScoredResult::new(
        candidate.clone(),
        CURATED_SCORE,
        ScoreBreakdown {
          base_score: CURATED_SCORE,
          ..Default::default()
        },
      );

      return Ok(Resolution {
        best: finalize(Some(candidate), text),
        all_candidates: vec![curated],
      });
    }

    let engine = ScoringEngine::new(&config, &self.brands);
    let candidates = self.run_strategies(&config, &engine, text);
    let all_candidates = ScoringEngine::rank(engine.score_all(candidates, text)?);
    let best = ScoringEngine::best(&all_candidates).map(|result| result.candidate().clone());

    match &best {
      Some(best) => {
        histogram!("brushmatch_resolve_scores").record(best.score.unwrap_or_default());

        tracing::debug!(strategy = best.strategy.as_str(), score = best.score, candidates = all_candidates.len(), "resolved input");
      }

      None => tracing::debug!(candidates = all_candidates.len(), "no strategy matched input"),
    }

    Ok(Resolution {
      best: finalize(best, text),
      all_candidates,
    })
  }

  fn run_strategies(&self, config: &ScoringConfig, engine: &ScoringEngine, text: &str) -> Vec<MatchCandidate> {
    let rules = &config.routing_rules;

    let good_match = |candidate: &MatchCandidate| {
      rules.stop_on_good_match
        && candidate.has_payload()
        && engine.score(candidate.clone(), text).is_ok_and(|scored| scored.total_score() >= rules.good_match_threshold)
    };

    self
      .strategies
      .run_until(text, rules.max_strategies_to_run, good_match)
      .into_iter()
      .filter_map(|attempt| match attempt.outcome {
        StrategyOutcome::Matched(candidate) => Some(candidate),
        _ => None,
      })
      .collect()
  }

  /// Record the outcome of a load and report configuration entries that will
  /// silently be ignored or defaulted.
  fn audit(&self, result: ValidationResult) -> ValidationResult {
    *self.last_validation.write().unwrap_or_else(PoisonError::into_inner) = result.clone();

    if !result.is_valid() {
      return result;
    }

    let Some(config) = self.config.snapshot() else {
      return result;
    };

    let known = known_modifiers();
    let registered = self.strategies.names();

    for (strategy, modifiers) in &config.strategy_modifiers {
      for modifier in modifiers.keys().filter(|modifier| !known.contains(&modifier.as_str())) {
        tracing::warn!(strategy = strategy.as_str(), modifier = modifier.as_str(), "configured modifier has no computation, its weight will be added as is");
      }
    }

    for strategy in config.base_strategy_scores.keys().filter(|strategy| strategy.as_str() != CURATED_STRATEGY && !registered.contains(&strategy.as_str())) {
      tracing::warn!(strategy = strategy.as_str(), "configured strategy is not registered");
    }

    for strategy in registered.iter().filter(|strategy| !config.base_strategy_scores.contains_key(**strategy)) {
      tracing::warn!(strategy = *strategy, "registered strategy has no base score, its candidates will start from zero");
    }

    result
  }
}
