//! The `LaunchSource` trait: read access to the upstream API.
//!
//! Implemented by `orbitdw-source-http`. Payloads are returned raw so the
//! driver can archive them before decoding into [`crate::record`] types.

use std::future::Future;

use serde_json::Value;

use crate::{Result, record::Resource};

/// A read-only upstream exposing a collection and a by-id endpoint per
/// resource.
///
/// Any error is fatal to the run: implementations report
/// [`Error::Transport`](crate::Error::Transport) for network faults and
/// non-success statuses, and [`Error::Format`](crate::Error::Format) when the
/// body has the wrong shape.
pub trait LaunchSource: Send + Sync {
  /// Fetch a whole collection. The payload must be a JSON array.
  fn fetch_collection(
    &self,
    resource: Resource,
  ) -> impl Future<Output = Result<Vec<Value>>> + Send + '_;

  /// Fetch one entity by natural key. The payload must be a JSON object.
  fn fetch_by_id<'a>(
    &'a self,
    resource: Resource,
    id: &'a str,
  ) -> impl Future<Output = Result<Value>> + Send + 'a;
}
