use std::{io, path::PathBuf};

use libslutpris::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("could not access {}: {source}", path.display())]
  Io { path: PathBuf, source: io::Error },
  #[error("invalid JSON document: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Engine(#[from] SlutprisError),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl AppError {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> AppError {
    let path = path.into();

    move |source| AppError::Io { path, source }
  }
}
