use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::kernel::display::{BackendStats, RemoteExtension};
use crate::kernel::quiz::QuizSubmission;
use crate::kernel::vote::{VoteEvent, VoteSink};

/// HTTP client for the vote and quiz endpoints.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    votes: &'a [VoteEvent],
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), TransportError> {
        let url = self.endpoint(path);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                endpoint: url,
                status: response.status(),
            });
        }

        let status = response.status();
        let body = response.text().await?;
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(reason) = rejection(&value) {
                return Err(TransportError::Rejected(reason));
            }
        }

        debug!("POST {} -> {}", url, status);
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.endpoint(path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                endpoint: url,
                status: response.status(),
            });
        }

        let value: Value = response.json().await?;
        if let Some(reason) = rejection(&value) {
            return Err(TransportError::Rejected(reason));
        }

        debug!("GET {}", url);
        Ok(serde_json::from_value(payload(value))?)
    }

    /// Current per-extension counts. Accepts the bare list as well as the
    /// enveloped one.
    pub async fn extensions(&self) -> Result<Vec<RemoteExtension>, TransportError> {
        let value: Value = self.get("extensions").await?;
        let list = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Array(Vec::new())),
            _ => Value::Array(Vec::new()),
        };
        Ok(serde_json::from_value(list)?)
    }

    pub async fn stats(&self) -> Result<BackendStats, TransportError> {
        self.get("stats").await
    }

    /// Stores a finished quiz. Failure only warrants a warning: the
    /// recommendation is computed locally and shown regardless.
    pub async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<(), TransportError> {
        self.post("quiz/submit", submission).await.map_err(|e| {
            warn!("Quiz result not saved: {}", e);
            e
        })
    }
}

#[async_trait]
impl VoteSink for ApiClient {
    async fn submit_batch(&self, events: &[VoteEvent]) -> Result<(), TransportError> {
        self.post("extensions/vote/batch", &BatchRequest { votes: events }).await
    }

    async fn submit_one(&self, event: &VoteEvent) -> Result<(), TransportError> {
        self.post("extensions/vote", event).await
    }
}

/// The backend wraps replies as `{"success": bool, "data": .., "error": ..}`.
/// A 2xx carrying `success: false` is still a rejection.
fn rejection(value: &Value) -> Option<String> {
    if value.get("success")?.as_bool()? {
        return None;
    }
    let reason = value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|e| e.as_str())
        .unwrap_or("backend reported failure");
    Some(reason.to_string())
}

/// Unwraps `data` from a successful envelope; anything else is returned as is.
fn payload(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("success").and_then(Value::as_bool) == Some(true) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
