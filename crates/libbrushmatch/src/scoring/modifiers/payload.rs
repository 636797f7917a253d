use libbrushmatch_macros::scoring_modifier;

use crate::{
  model::Matched,
  scoring::modifiers::{Modifier, ModifierContext, text::flag},
  text::{FIBERS, contains_phrase, knot_size},
};

#[scoring_modifier(BrandInText, name = "brand_in_text")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.matched().and_then(|matched| matched.brand.as_deref()).is_some_and(|brand| contains_phrase(ctx.text, brand)))
}

#[scoring_modifier(ModelInText, name = "model_in_text")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.matched().and_then(|matched| matched.model.as_deref()).is_some_and(|model| contains_phrase(ctx.text, model)))
}

#[scoring_modifier(FiberMatch, name = "fiber_match")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  let Some(fiber) = ctx.matched().and_then(payload_fiber) else {
    return 0.0;
  };

  flag(FIBERS.find_all(ctx.text).contains(&fiber))
}

#[scoring_modifier(FiberMismatch, name = "fiber_mismatch")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  let Some(fiber) = ctx.matched().and_then(payload_fiber) else {
    return 0.0;
  };

  let mentioned = FIBERS.find_all(ctx.text);

  flag(!mentioned.is_empty() && !mentioned.contains(&fiber))
}

#[scoring_modifier(SizeMatch, name = "size_match")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  match (ctx.matched().and_then(payload_size), knot_size(ctx.text)) {
    (Some(size), Some(mentioned)) => flag((size - mentioned).abs() < f64::EPSILON),
    _ => 0.0,
  }
}

/// The payload's fiber, falling back on the knot's for composites.
fn payload_fiber(matched: &Matched) -> Option<&str> {
  matched.fiber.as_deref().or_else(|| matched.knot.as_ref().and_then(|knot| knot.fiber.as_deref()))
}

fn payload_size(matched: &Matched) -> Option<f64> {
  matched.knot_size_mm.or_else(|| matched.knot.as_ref().and_then(|knot| knot.knot_size_mm))
}
