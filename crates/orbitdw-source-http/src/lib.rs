//! HTTP implementation of [`LaunchSource`] over the public launch API.

use std::time::Duration;

use orbitdw_core::{Error, Result, record::Resource, source::LaunchSource};
use reqwest::Client;
use serde_json::Value;

/// Default upstream.
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4";

/// Connection settings for the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
  pub base_url: String,
  /// Per-request timeout, covering connect, headers and body.
  pub timeout:  Duration,
}

impl Default for HttpSourceConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(20),
    }
  }
}

/// Async HTTP client for the upstream JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Requests
/// are never retried; the first failure is returned to the caller.
#[derive(Clone)]
pub struct HttpSource {
  client: Client,
  config: HttpSourceConfig,
}

impl HttpSource {
  pub fn new(config: HttpSourceConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| Error::transport(&config.base_url, e))?;
    Ok(Self { client, config })
  }

  fn url(&self, endpoint: &str) -> String {
    format!(
      "{}/{}",
      self.config.base_url.trim_end_matches('/'),
      endpoint.trim_start_matches('/')
    )
  }

  /// `GET <base_url>/<endpoint>` and parse the body as JSON.
  async fn get_json(&self, endpoint: &str) -> Result<(String, Value)> {
    let url = self.url(endpoint);
    tracing::debug!(%url, "GET");

    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| Error::transport(&url, e))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::transport(&url, format!("HTTP {status}")));
    }

    match resp.json::<Value>().await {
      Ok(value) => Ok((url, value)),
      Err(e) if e.is_decode() => Err(Error::format(&url, e)),
      Err(e) => Err(Error::transport(&url, e)),
    }
  }
}

impl LaunchSource for HttpSource {
  async fn fetch_collection(&self, resource: Resource) -> Result<Vec<Value>> {
    match self.get_json(resource.path()).await? {
      (_, Value::Array(items)) => Ok(items),
      (url, other) => Err(Error::format(
        url,
        format!("expected an array, got {}", kind_of(&other)),
      )),
    }
  }

  async fn fetch_by_id<'a>(&'a self, resource: Resource, id: &'a str) -> Result<Value> {
    match self.get_json(&resource.item_path(id)).await? {
      (_, value @ Value::Object(_)) => Ok(value),
      (url, other) => Err(Error::format(
        url,
        format!("expected an object, got {}", kind_of(&other)),
      )),
    }
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
