use crate::{
  catalog::CatalogEntry,
  model::Component,
  text::{FIBERS, knot_size},
};

/// Scores one half of a composite brush.
///
/// The score is computed once, when the component is built, and stored on the
/// component. It already includes the priority tier bonus, so anything reading
/// it later must take it as-is.
#[derive(Clone, Copy, Debug)]
pub struct ComponentScorer {
  pub brand: f64,
  pub model: f64,
  pub fiber: f64,
  pub size: f64,
  pub priority_bonus: [f64; 2],
}

impl Default for ComponentScorer {
  fn default() -> Self {
    ComponentScorer {
      brand: 5.0,
      model: 5.0,
      fiber: 3.0,
      size: 2.0,
      priority_bonus: [3.0, 2.0],
    }
  }
}

impl ComponentScorer {
  pub fn score(&self, component: &Component, text: &str) -> f64 {
    let mut score = 0.0;

    if component.brand.is_some() {
      score += self.brand;
    }

    if component.model.is_some() {
      score += self.model;
    }

    if let Some(fiber) = &component.fiber
      && FIBERS.find_all(text).contains(&fiber.as_str())
    {
      score += self.fiber;
    }

    if let (Some(size), Some(mentioned)) = (component.knot_size_mm, knot_size(text))
      && (size - mentioned).abs() < f64::EPSILON
    {
      score += self.size;
    }

    score + self.priority_bonus(component.priority)
  }

  fn priority_bonus(&self, priority: Option<u8>) -> f64 {
    match priority {
      Some(tier @ 1..=2) => self.priority_bonus[usize::from(tier - 1)],
      _ => 0.0,
    }
  }

  /// Build a scored component from a catalog entry matched against `text`.
  pub fn component(&self, entry: &CatalogEntry, pattern: &str, text: &str) -> Component {
    let mut component = Component {
      brand: Some(entry.brand.clone()),
      model: entry.model.clone(),
      fiber: entry.fiber.clone(),
      knot_size_mm: entry.knot_size_mm,
      priority: entry.priority,
      source_text: Some(text.to_string()),
      pattern: Some(pattern.to_string()),
      score: None,
    };

    component.score = Some(self.score(&component, text));
    component
  }
}
