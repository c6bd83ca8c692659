//! Raw snapshot sink: archives fetched payloads as JSON documents.

use std::{
  fs::File,
  io::{self, BufWriter, Write},
  path::PathBuf,
};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
  #[error("could not write {path}: {source}")]
  Io { path: PathBuf, source: io::Error },

  #[error("could not serialise {path}: {source}")]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },
}

/// Writes `<dir>/<name>.json`, creating `dir` on first use.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
  dir: PathBuf,
}

impl SnapshotSink {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  /// Serialise `data` to `<dir>/<name>.json`, replacing any earlier file.
  pub fn write<T: Serialize + ?Sized>(
    &self,
    name: &str,
    data: &T,
  ) -> Result<PathBuf, SnapshotError> {
    let path = self.dir.join(format!("{name}.json"));
    let io_err = |source| SnapshotError::Io { path: path.clone(), source };

    std::fs::create_dir_all(&self.dir).map_err(io_err)?;
    let mut writer = BufWriter::new(File::create(&path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, data).map_err(|source| SnapshotError::Json {
      path: path.clone(),
      source,
    })?;
    writer.flush().map_err(io_err)?;

    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;

  #[test]
  fn writes_named_document() {
    let dir = tempfile::tempdir().unwrap();
    let sink = SnapshotSink::new(dir.path().join("raw"));

    let path = sink.write("launches", &json!([{ "id": "l1" }])).unwrap();

    assert_eq!(path, dir.path().join("raw").join("launches.json"));
    let back: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(back, json!([{ "id": "l1" }]));
  }

  #[test]
  fn unwritable_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let err = SnapshotSink::new(&blocker).write("rockets", &json!({})).unwrap_err();

    assert!(matches!(err, SnapshotError::Io { .. }));
  }
}
