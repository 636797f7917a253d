#[derive(Debug, thiserror::Error)]
pub enum BrushMatchError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid catalog: {0}")]
  CatalogError(String),
  #[error("candidate without a strategy name reached the scoring engine (pattern: {pattern:?}, match type: {match_type})")]
  MissingStrategy { pattern: Option<String>, match_type: String },
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}
