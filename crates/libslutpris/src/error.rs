#[derive(Debug, thiserror::Error)]
pub enum SlutprisError {
  #[error("invalid input collection: {0}")]
  InvalidCollection(String),
  #[error("invalid merge parameters: {0}")]
  InvalidParams(#[from] validator::ValidationErrors),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}
