use libbrushmatch::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid catalog: {0}")]
  CatalogError(String),
  #[error("could not resolve input: {0}")]
  ResolveError(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<BrushMatchError> for AppError {
  fn from(value: BrushMatchError) -> Self {
    match value {
      BrushMatchError::ConfigError(err) => AppError::ConfigError(err),
      BrushMatchError::CatalogError(err) => AppError::CatalogError(err),
      err @ BrushMatchError::MissingStrategy { .. } => AppError::ResolveError(err.to_string()),
      BrushMatchError::OtherError(err) => AppError::OtherError(err),
    }
  }
}
