use std::{
  any::Any,
  fmt,
  panic::{self, AssertUnwindSafe},
  sync::Arc,
};

use metrics::counter;
use tracing::instrument;

use crate::{catalog::Catalogs, model::MatchCandidate};

pub(crate) mod automated_split;
pub(crate) mod complete_brush;
pub(crate) mod component;
pub(crate) mod known_knot;

pub use automated_split::AutomatedSplitStrategy;
pub use complete_brush::CompleteBrushStrategy;
pub use component::ComponentScorer;
pub use known_knot::KnownKnotStrategy;

#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
  #[error("{0}")]
  Failed(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

/// A single, independent text matching heuristic.
///
/// Implementations must report the name they are configured under in every
/// candidate they return: the scoring engine refuses candidates without one.
pub trait Strategy: Send + Sync {
  fn name(&self) -> &str;
  fn try_match(&self, text: &str) -> Result<Option<MatchCandidate>, StrategyError>;
}

/// What became of running one strategy against one input.
#[derive(Clone, Debug, PartialEq)]
pub enum StrategyOutcome {
  Matched(MatchCandidate),
  NoMatch,
  Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrategyAttempt {
  pub strategy: String,
  pub outcome: StrategyOutcome,
}

/// Ordered collection of strategies run against every input.
///
/// A strategy returning an error, or panicking, only costs its own candidate:
/// the remaining strategies still run.
#[derive(Default)]
pub struct StrategyOrchestrator {
  strategies: Vec<Box<dyn Strategy>>,
}

impl fmt::Debug for StrategyOrchestrator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StrategyOrchestrator").field("strategies", &self.names()).finish()
  }
}

impl StrategyOrchestrator {
  pub fn new() -> StrategyOrchestrator {
    StrategyOrchestrator::default()
  }

  /// The built-in strategies, in their default order.
  pub fn with_default_strategies(catalogs: Arc<Catalogs>) -> StrategyOrchestrator {
    StrategyOrchestrator::new()
      .with(CompleteBrushStrategy::new(catalogs.clone()))
      .with(AutomatedSplitStrategy::new(catalogs.clone()))
      .with(KnownKnotStrategy::new(catalogs))
  }

  pub fn register<S: Strategy + 'static>(&mut self, strategy: S) -> &mut Self {
    self.strategies.push(Box::new(strategy));
    self
  }

  pub fn with<S: Strategy + 'static>(mut self, strategy: S) -> Self {
    self.register(strategy);
    self
  }

  pub fn names(&self) -> Vec<&str> {
    self.strategies.iter().map(|strategy| strategy.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.strategies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strategies.is_empty()
  }

  /// Run at most `limit` strategies in registration order and collect every candidate.
  pub fn run_all(&self, text: &str, limit: usize) -> Vec<MatchCandidate> {
    self
      .run_until(text, limit, |_| false)
      .into_iter()
      .filter_map(|attempt| match attempt.outcome {
        StrategyOutcome::Matched(candidate) => Some(candidate),
        _ => None,
      })
      .collect()
  }

  /// Run at most `limit` strategies in registration order, stopping after the
  /// first candidate for which `stop` returns `true`.
  #[instrument(name = "run_strategies", skip_all, fields(strategies = self.strategies.len(), limit = limit))]
  pub fn run_until<F>(&self, text: &str, limit: usize, mut stop: F) -> Vec<StrategyAttempt>
  where
    F: FnMut(&MatchCandidate) -> bool,
  {
    let mut attempts = Vec::with_capacity(self.strategies.len().min(limit));

    for strategy in self.strategies.iter().take(limit) {
      let outcome = attempt(strategy.as_ref(), text);
      let done = matches!(&outcome, StrategyOutcome::Matched(candidate) if stop(candidate));

      attempts.push(StrategyAttempt {
        strategy: strategy.name().to_string(),
        outcome,
      });

      if done {
        tracing::debug!(strategy = strategy.name(), "good match found, skipping remaining strategies");
        break;
      }
    }

    attempts
  }
}

fn attempt(strategy: &dyn Strategy, text: &str) -> StrategyOutcome {
  let outcome = match panic::catch_unwind(AssertUnwindSafe(|| strategy.try_match(text))) {
    Ok(Ok(Some(candidate))) => StrategyOutcome::Matched(candidate),
    Ok(Ok(None)) => StrategyOutcome::NoMatch,
    Ok(Err(err)) => StrategyOutcome::Failed { reason: format!("{err:#}") },
    Err(payload) => StrategyOutcome::Failed { reason: panic_reason(payload.as_ref()) },
  };

  match &outcome {
    StrategyOutcome::Failed { reason } => {
      counter!("brushmatch_strategy_failures_total", "strategy" => strategy.name().to_string()).increment(1);

      tracing::warn!(strategy = strategy.name(), input = text, reason = reason.as_str(), "strategy failed");
    }

    StrategyOutcome::Matched(_) => tracing::debug!(strategy = strategy.name(), "strategy matched"),
    StrategyOutcome::NoMatch => tracing::trace!(strategy = strategy.name(), "strategy did not match"),
  }

  outcome
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
  match (payload.downcast_ref::<&str>(), payload.downcast_ref::<String>()) {
    (Some(message), _) => format!("panicked: {message}"),
    (_, Some(message)) => format!("panicked: {message}"),
    _ => "panicked".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::{StrategyOrchestrator, StrategyOutcome};
  use crate::tests::{FailingStrategy, FixedStrategy, NoMatchStrategy, PanickingStrategy};

  fn orchestrator() -> StrategyOrchestrator {
    StrategyOrchestrator::new()
      .with(FixedStrategy::simple("first", "Alpha", "One"))
      .with(FailingStrategy)
      .with(NoMatchStrategy)
      .with(PanickingStrategy)
      .with(FixedStrategy::simple("last", "Beta", "Two"))
  }

  #[test]
  fn failures_do_not_abort_the_run() {
    let candidates = orchestrator().run_all("anything", usize::MAX);

    assert_eq!(candidates.iter().map(|candidate| candidate.strategy.as_str()).collect::<Vec<_>>(), vec!["first", "last"]);
  }

  #[test]
  fn attempts_record_every_outcome() {
    let attempts = orchestrator().run_until("anything", usize::MAX, |_| false);

    assert_eq!(attempts.len(), 5);
    assert!(matches!(attempts[0].outcome, StrategyOutcome::Matched(_)));
    assert_eq!(attempts[1].outcome, StrategyOutcome::Failed { reason: "always fails".into() });
    assert_eq!(attempts[2].outcome, StrategyOutcome::NoMatch);
    assert_eq!(attempts[3].strategy, "panicking");
    assert_eq!(attempts[3].outcome, StrategyOutcome::Failed { reason: "panicked: strategy bug".into() });
  }

  #[test]
  fn limit_bounds_the_strategies_run() {
    let orchestrator = orchestrator();

    assert_eq!(orchestrator.run_until("anything", 2, |_| false).len(), 2);
    assert_eq!(orchestrator.run_all("anything", 1).len(), 1);
    assert!(orchestrator.run_all("anything", 0).is_empty());
  }

  #[test]
  fn stop_after_good_candidate() {
    let attempts = orchestrator().run_until("anything", usize::MAX, |candidate| candidate.strategy == "first");

    assert_eq!(attempts.len(), 1);
  }

  #[test]
  fn names_in_registration_order() {
    assert_eq!(orchestrator().names(), vec!["first", "failing", "no_match", "panicking", "last"]);
    assert!(StrategyOrchestrator::new().run_all("anything", usize::MAX).is_empty());
  }
}
