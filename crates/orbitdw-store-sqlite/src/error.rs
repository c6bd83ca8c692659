//! Error type for `orbitdw-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A loader ran before `ensure_schema` on this handle.
  #[error("schema not initialised on this connection")]
  SchemaNotReady,

  #[error("could not create directory for {path}: {source}")]
  CreateDir {
    path:   std::path::PathBuf,
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
