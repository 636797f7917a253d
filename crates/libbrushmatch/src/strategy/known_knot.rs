use std::sync::Arc;

use crate::{
  catalog::Catalogs,
  model::{MatchCandidate, MatchType},
  strategy::{Strategy, StrategyError, complete_brush::simple},
};

/// Identifies a known knot anywhere in the input and reports it as the brush.
pub struct KnownKnotStrategy {
  catalogs: Arc<Catalogs>,
}

impl KnownKnotStrategy {
  pub const NAME: &'static str = "known_knot";

  pub fn new(catalogs: Arc<Catalogs>) -> KnownKnotStrategy {
    KnownKnotStrategy { catalogs }
  }
}

impl Strategy for KnownKnotStrategy {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn try_match(&self, text: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    let Some((entry, pattern)) = self.catalogs.knots.first_match(text) else {
      return Ok(None);
    };

    Ok(Some(MatchCandidate::new(Self::NAME, text).with_match_type(MatchType::Regex).with_pattern(pattern).with_matched(simple(entry))))
  }
}
