use std::time::Instant;

use metrics::histogram;
use tracing::instrument;

use crate::{
  config::ScoringConfig,
  error::BrushMatchError,
  model::{MatchCandidate, ModifierContribution, ScoreBreakdown, ScoredResult},
  text::Lexicon,
};

pub(crate) mod modifiers;

pub use modifiers::known_modifiers;

/// Scores candidates against a configuration snapshot.
///
/// For every candidate, `total = base + Σ(raw × weight)` over the modifiers
/// configured for its strategy, floored at the minimum score threshold.
pub struct ScoringEngine<'e> {
  config: &'e ScoringConfig,
  brands: &'e Lexicon,
}

impl<'e> ScoringEngine<'e> {
  pub fn new(config: &'e ScoringConfig, brands: &'e Lexicon) -> ScoringEngine<'e> {
    ScoringEngine { config, brands }
  }

  /// Score every candidate, preserving their order.
  ///
  /// Fails on the first candidate without a strategy name, which is a bug in
  /// the strategy that produced it.
  #[instrument(name = "score_all", skip_all, fields(candidates = candidates.len()))]
  pub fn score_all(&self, candidates: Vec<MatchCandidate>, text: &str) -> Result<Vec<ScoredResult>, BrushMatchError> {
    let then = Instant::now();
    let scored = candidates.into_iter().map(|candidate| self.score(candidate, text)).collect::<Result<Vec<_>, _>>()?;

    histogram!("brushmatch_scoring_latency_seconds").record(then.elapsed().as_secs_f64());

    Ok(scored)
  }

  pub fn score(&self, candidate: MatchCandidate, text: &str) -> Result<ScoredResult, BrushMatchError> {
    let strategy = candidate.strategy.trim();

    if strategy.is_empty() {
      return Err(BrushMatchError::MissingStrategy {
        pattern: candidate.pattern.clone(),
        match_type: candidate.match_type.to_string(),
      });
    }

    if !self.config.base_strategy_scores.contains_key(strategy) {
      tracing::debug!(strategy, "strategy has no base score, scoring it as zero");
    }

    let base_score = self.config.base_score(strategy);
    let ctx = modifiers::ModifierContext {
      text,
      candidate: &candidate,
      brands: self.brands,
    };

    let modifier_contributions = self
      .config
      .modifiers(strategy)
      .map(|(name, weight)| {
        let raw_value = match modifiers::modifier(name) {
          Some(modifier) => modifier.compute(&ctx),

          None => {
            tracing::debug!(strategy, modifier = name, "modifier has no computation, applying its weight as is");
            1.0
          }
        };

        let contribution = raw_value * weight;

        tracing::debug!(strategy, modifier = name, raw_value, weight, contribution, "computed modifier");

        ModifierContribution {
          name: name.to_string(),
          raw_value,
          weight,
          contribution,
        }
      })
      .collect::<Vec<_>>();

    let mut breakdown = ScoreBreakdown {
      base_score,
      modifier_contributions,
      floored: false,
    };

    let raw_total = base_score + breakdown.modifier_total();
    let threshold = self.config.routing_rules.minimum_score_threshold;

    let total_score = match raw_total < threshold {
      true => {
        breakdown.floored = true;
        threshold
      }
      false => raw_total,
    };

    tracing::debug!(strategy, base_score, total_score, "computed score");

    Ok(ScoredResult::new(candidate, total_score, breakdown))
  }

  /// The winning result: highest total among results with a non-empty
  /// payload, the earliest one winning ties.
  pub fn best(scored: &[ScoredResult]) -> Option<&ScoredResult> {
    scored.iter().filter(|result| result.candidate().has_payload()).fold(None, |best: Option<&ScoredResult>, result| match best {
      Some(best) if result.total_score() <= best.total_score() => Some(best),
      _ => Some(result),
    })
  }

  /// Order results by descending total score, keeping scoring order among ties.
  pub fn rank(mut scored: Vec<ScoredResult>) -> Vec<ScoredResult> {
    scored.sort_by(|lhs, rhs| rhs.total_score().total_cmp(&lhs.total_score()));
    scored
  }
}
