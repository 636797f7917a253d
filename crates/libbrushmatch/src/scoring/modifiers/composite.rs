use libbrushmatch_macros::scoring_modifier;

use crate::scoring::modifiers::{Modifier, ModifierContext, text::flag};

#[scoring_modifier(DualComponent, name = "dual_component")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.matched().is_some_and(|matched| matched.is_composite() && matched.handle.is_some() && matched.knot.is_some()))
}

// Component scores are final once the strategy computed them (priority bonus
// included). They are read here, never recomputed.
#[scoring_modifier(HandleWeight, name = "handle_weight")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  ctx.matched().and_then(|matched| matched.handle.as_ref()).and_then(|handle| handle.score).unwrap_or_default()
}

#[scoring_modifier(KnotWeight, name = "knot_weight")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  ctx.matched().and_then(|matched| matched.knot.as_ref()).and_then(|knot| knot.score).unwrap_or_default()
}

#[scoring_modifier(HandleOnly, name = "handle_only")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.matched().is_some_and(|matched| matched.is_composite() && matched.handle.is_some() && matched.knot.is_none()))
}

#[scoring_modifier(KnotOnly, name = "knot_only")]
fn compute(&self, ctx: &ModifierContext) -> f64 {
  flag(ctx.matched().is_some_and(|matched| matched.is_composite() && matched.knot.is_some() && matched.handle.is_none()))
}
