//! Error types for `scribe-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("page number is not a positive integer: {0:?}")]
  InvalidPageNumber(String),

  #[error("page size is not a positive integer: {0:?}")]
  InvalidPageSize(String),

  #[error("page size {size} exceeds the maximum of {max}")]
  PageSizeTooLarge { size: usize, max: usize },

  #[error("page {number} contains no results (last page is {last})")]
  EmptyPage { number: usize, last: usize },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
