//! Firebase Realtime Database backend over the REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use votehub_core::config::StoreConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::{Subscription, SyncStore};
use votehub_core::types::path::StorePath;

use super::sse::{SseDecoder, StreamEvent};
use crate::push_id::PushIdGenerator;

/// Initial delay before reconnecting a dropped stream.
const RECONNECT_MIN: Duration = Duration::from_secs(1);
/// Upper bound for the reconnect backoff.
const RECONNECT_MAX: Duration = Duration::from_secs(30);

/// How a stream loop ended.
enum StreamEnd {
    /// The server closed or the connection broke; reconnect. `received`
    /// is set when at least one event arrived before the drop.
    Dropped { received: bool },
    /// The server revoked access, or nobody is listening; stop.
    Finished,
}

/// Delay before the next reconnect attempt.
///
/// A stream that delivered events before dropping starts over from
/// [`RECONNECT_MIN`]; repeated failures double the delay up to
/// [`RECONNECT_MAX`].
fn next_backoff(previous: Duration, received: bool) -> Duration {
    if received || previous.is_zero() {
        RECONNECT_MIN
    } else {
        (previous * 2).min(RECONNECT_MAX)
    }
}

/// Realtime Database client.
///
/// Writes are `PUT`/`DELETE` requests; subscriptions are streaming `GET`s
/// that keep a local copy of the subscribed value and publish it whole on
/// every change.
#[derive(Debug, Clone)]
pub struct FirebaseStore {
    /// HTTP client shared by requests and streams.
    client: Client,
    /// Database URL without trailing slash.
    base_url: String,
    /// Optional `auth` query parameter.
    auth_token: Option<String>,
    /// Timeout for one-shot requests.
    request_timeout: Duration,
    /// Child key generator for `append`.
    ids: Arc<PushIdGenerator>,
    /// Cancels every stream task started by this client.
    shutdown: CancellationToken,
}

impl FirebaseStore {
    /// Create a client from configuration.
    pub fn connect(config: &StoreConfig) -> AppResult<Self> {
        let base_url = config
            .database_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                AppError::configuration("store.database_url is required for the firebase backend")
            })?
            .trim_end_matches('/')
            .to_string();

        Url::parse(&base_url)
            .map_err(|e| AppError::configuration(format!("Invalid database URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        info!(url = %base_url, "Firebase store configured");

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            ids: Arc::new(PushIdGenerator::new()),
            shutdown: CancellationToken::new(),
        })
    }

    /// Stop every running subscription stream.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn url(&self, path: &StorePath) -> AppResult<Url> {
        let raw = format!("{}/{}.json", self.base_url, path.as_str());
        let url = match &self.auth_token {
            Some(token) => Url::parse_with_params(&raw, &[("auth", token.as_str())]),
            None => Url::parse(&raw),
        };
        url.map_err(|e| AppError::internal(format!("Invalid request URL for {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder, path: &StorePath) -> AppResult<reqwest::Response> {
        request
            .timeout(self.request_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::write_failed(format!("Request to {path} failed: {e}")))
    }

    async fn stream_once(&self, url: &Url, tx: &watch::Sender<Value>, local: &mut Value) -> StreamEnd {
        let response = match self
            .client
            .get(url.clone())
            .header("Accept", "text/event-stream")
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Failed to open realtime stream");
                return StreamEnd::Dropped { received: false };
            }
        };

        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();
        let mut received = false;

        loop {
            let chunk = tokio::select! {
                _ = self.shutdown.cancelled() => return StreamEnd::Finished,
                _ = tx.closed() => return StreamEnd::Finished,
                chunk = body.next() => chunk,
            };

            let chunk = match chunk {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    warn!(error = %e, "Realtime stream broke");
                    return StreamEnd::Dropped { received };
                }
                None => return StreamEnd::Dropped { received },
            };

            for frame in decoder.feed(&chunk) {
                let event = match StreamEvent::from_frame(&frame) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "Ignoring malformed stream frame");
                        continue;
                    }
                };
                received = true;
                match event {
                    StreamEvent::Cancel | StreamEvent::AuthRevoked => {
                        warn!(event = %frame.event, "Realtime stream revoked by server");
                        return StreamEnd::Finished;
                    }
                    other => {
                        if other.apply(local) {
                            let latest = local.clone();
                            tx.send_if_modified(|current| {
                                if *current == latest {
                                    false
                                } else {
                                    *current = latest;
                                    true
                                }
                            });
                        }
                    }
                }
            }
        }
    }

    async fn run_stream(self, path: StorePath, url: Url, tx: watch::Sender<Value>, mut local: Value) {
        let mut backoff = Duration::ZERO;
        loop {
            match self.stream_once(&url, &tx, &mut local).await {
                StreamEnd::Finished => break,
                StreamEnd::Dropped { received } => {
                    backoff = next_backoff(backoff, received);
                    debug!(path = %path, delay = ?backoff, "Reconnecting realtime stream");
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = tx.closed() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
        debug!(path = %path, "Realtime stream ended");
    }
}

#[async_trait]
impl SyncStore for FirebaseStore {
    async fn subscribe(&self, path: &StorePath) -> AppResult<Subscription> {
        let initial = self.read(path).await?;
        let (tx, rx) = watch::channel(initial.clone());
        let url = self.url(path)?;

        tokio::spawn(self.clone().run_stream(path.clone(), url, tx, initial));
        debug!(path = %path, "Subscribed to firebase path");
        Ok(rx)
    }

    async fn read(&self, path: &StorePath) -> AppResult<Value> {
        let url = self.url(path)?;
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::external_service(format!("Read of {path} failed: {e}")))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::malformed(format!("Read of {path} returned invalid JSON: {e}")))
    }

    async fn write(&self, path: &StorePath, value: Value) -> AppResult<()> {
        let url = self.url(path)?;
        let request = if value.is_null() {
            self.client.delete(url)
        } else {
            self.client.put(url).json(&value)
        };
        self.send(request, path).await?;
        debug!(path = %path, "Firebase write applied");
        Ok(())
    }

    async fn append(&self, path: &StorePath) -> AppResult<StorePath> {
        Ok(path.child(&self.ids.next_id()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = self.url(&StorePath::tree())?;
        let url = {
            let mut url = url;
            url.query_pairs_mut().append_pair("shallow", "true");
            url
        };
        Ok(self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .is_ok_and(|r| r.status().is_success()))
    }
}
