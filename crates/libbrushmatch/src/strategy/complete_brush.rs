use std::sync::Arc;

use crate::{
  catalog::{CatalogEntry, Catalogs},
  model::{MatchCandidate, MatchType, Matched},
  strategy::{Strategy, StrategyError},
};

/// Matches the whole input against the catalog of complete brushes.
pub struct CompleteBrushStrategy {
  catalogs: Arc<Catalogs>,
}

impl CompleteBrushStrategy {
  pub const NAME: &'static str = "complete_brush";

  pub fn new(catalogs: Arc<Catalogs>) -> CompleteBrushStrategy {
    CompleteBrushStrategy { catalogs }
  }
}

impl Strategy for CompleteBrushStrategy {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn try_match(&self, text: &str) -> Result<Option<MatchCandidate>, StrategyError> {
    if text.trim().is_empty() {
      return Ok(None);
    }

    let Some((entry, pattern)) = self.catalogs.brushes.first_match(text) else {
      return Ok(None);
    };

    Ok(Some(MatchCandidate::new(Self::NAME, text).with_match_type(MatchType::Regex).with_pattern(pattern).with_matched(simple(entry))))
  }
}

pub(crate) fn simple(entry: &CatalogEntry) -> Matched {
  Matched {
    brand: Some(entry.brand.clone()),
    model: entry.model.clone(),
    fiber: entry.fiber.clone(),
    knot_size_mm: entry.knot_size_mm,
    ..Default::default()
  }
}
