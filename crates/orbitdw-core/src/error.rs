//! Error taxonomy shared by every stage of a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Network failure, timeout, or a non-success HTTP status.
  #[error("transport error fetching {endpoint}: {message}")]
  Transport { endpoint: String, message: String },

  /// The payload did not have the expected shape.
  #[error("unexpected payload from {endpoint}: {message}")]
  Format { endpoint: String, message: String },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("illegal stage transition: expected {expected}, found {found}")]
  Stage {
    expected: &'static str,
    found:    &'static str,
  },
}

impl Error {
  pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
    Error::Transport {
      endpoint: endpoint.into(),
      message:  message.to_string(),
    }
  }

  pub fn format(endpoint: impl Into<String>, message: impl ToString) -> Self {
    Error::Format {
      endpoint: endpoint.into(),
      message:  message.to_string(),
    }
  }

  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Storage(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
