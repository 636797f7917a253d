use libbrushmatch_macros::scoring_modifier;

use crate::{
  scoring::modifiers::{Modifier, ModifierContext},
  text::{DelimiterConfidence, FIBERS, HANDLE_WORDS, KNOT_WORDS, has_delimiter, knot_size},
};

#[scoring_modifier(MultipleBrands, name = "multiple_brands")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.brands.find_all(ctx.text).len() >= 2)
}

#[scoring_modifier(FiberWords, name = "fiber_words")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(FIBERS.contains_any(ctx.text))
}

#[scoring_modifier(SizeSpecification, name = "size_specification")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(knot_size(ctx.text).is_some())
}

#[scoring_modifier(HighConfidenceDelimiter, name = "high_confidence_delimiter")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(has_delimiter(ctx.text, DelimiterConfidence::High))
}

#[scoring_modifier(MediumConfidenceDelimiter, name = "medium_confidence_delimiter")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(has_delimiter(ctx.text, DelimiterConfidence::Medium))
}

#[scoring_modifier(HandleIndicators, name = "handle_indicators")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(HANDLE_WORDS.contains_any(ctx.text))
}

#[scoring_modifier(KnotIndicators, name = "knot_indicators")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(KNOT_WORDS.contains_any(ctx.text))
}

#[inline]
pub(super) fn flag(value: bool) -> f64 {
  match value {
    true => 1.0,
    false => 0.0,
  }
}
