use std::{collections::HashMap, sync::LazyLock};

use ahash::RandomState;

use crate::{
  model::{MatchCandidate, Matched},
  text::Lexicon,
};

mod composite;
mod payload;
mod text;

/// Everything a modifier may look at to compute its raw value.
pub(crate) struct ModifierContext<'c> {
  pub text: &'c str,
  pub candidate: &'c MatchCandidate,
  pub brands: &'c Lexicon,
}

impl ModifierContext<'_> {
  pub(crate) fn matched(&self) -> Option<&Matched> {
    self.candidate.matched.as_ref()
  }
}

/// A named scoring adjustment.
///
/// `compute` returns the raw value, which the engine multiplies by the weight
/// configured for the candidate's strategy.
pub(crate) trait Modifier: Send + Sync {
  fn name(&self) -> &'static str;
  fn compute(&self, ctx: &ModifierContext) -> f64;
}

static MODIFIERS: LazyLock<HashMap<&'static str, &'static dyn Modifier, RandomState>> = LazyLock::new(|| {
  let modifiers: [&'static dyn Modifier; 17] = [
    &text::MultipleBrands,
    &text::FiberWords,
    &text::SizeSpecification,
    &text::HighConfidenceDelimiter,
    &text::MediumConfidenceDelimiter,
    &text::HandleIndicators,
    &text::KnotIndicators,
    &composite::DualComponent,
    &composite::HandleWeight,
    &composite::KnotWeight,
    &composite::HandleOnly,
    &composite::KnotOnly,
    &payload::BrandInText,
    &payload::ModelInText,
    &payload::FiberMatch,
    &payload::FiberMismatch,
    &payload::SizeMatch,
  ];

  modifiers.into_iter().map(|modifier| (modifier.name(), modifier)).collect()
});

pub(crate) fn modifier(name: &str) -> Option<&'static dyn Modifier> {
  MODIFIERS.get(name).copied()
}

/// Names of every modifier with a computation behind it, sorted.
pub fn known_modifiers() -> Vec<&'static str> {
  let mut names = MODIFIERS.keys().copied().collect::<Vec<_>>();

  names.sort_unstable();
  names
}

#[cfg(test)]
mod tests {
  #[test]
  fn registry() {
    assert_eq!(super::known_modifiers().len(), 17);
    assert_eq!(super::modifier("knot_weight").map(|modifier| modifier.name()), Some("knot_weight"));
    assert!(super::modifier("not_implemented_yet").is_none());
  }
}
