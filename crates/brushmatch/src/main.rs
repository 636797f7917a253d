mod config;
mod errors;
mod run;
mod trace;

#[cfg(test)]
mod tests;

use std::io;

use libbrushmatch::prelude::*;

use crate::{config::Config, errors::AppError};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;
  let _guard = trace::init_tracing(&config, io::stderr());

  let matcher = BrushMatcher::new().config(config.scoring_config.clone()).catalogs(config.catalogs.clone()).build()?;

  if !matcher.config().is_loaded() {
    return Err(AppError::ConfigError(matcher.last_validation().errors.join(", ")).into());
  }

  tracing::info!(brushmatch = env!("CARGO_PKG_VERSION"), config = %config.scoring_config, "reading inputs from stdin");

  let stats = run::run(&matcher, io::stdin().lock(), io::stdout().lock(), config.pretty)?;

  tracing::info!(inputs = stats.inputs, matched = stats.matched, failed = stats.failed, "done");

  Ok(())
}
