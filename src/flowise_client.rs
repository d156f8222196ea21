use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::app_config::AppConfig;
use crate::errors::{WorkoutError, WorkoutResult};

// Upper bound on a single generation round trip
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Seam for the external generation service so the workflow can be
/// exercised without a live endpoint
#[async_trait]
pub trait WorkoutGenerator: Send + Sync {
    /// Sends the rendered prompt and returns the raw completion text
    async fn generate(&self, prompt: &str) -> WorkoutResult<String>;
}

// Struct to hold the Flowise prediction reply
#[derive(Debug, Deserialize)]
struct FlowiseReply {
    text: Option<String>,
}

/// HTTP client for the Flowise prediction endpoint. Holds a stateless
/// `reqwest::Client`, safe to share across in-flight requests.
pub struct FlowiseClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl FlowiseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.flowise_api_url.clone(),
            api_key: config.flowise_api_key.clone(),
        }
    }
}

#[async_trait]
impl WorkoutGenerator for FlowiseClient {
    async fn generate(&self, prompt: &str) -> WorkoutResult<String> {
        let payload = json!({ "question": prompt });

        debug!("Sending prompt to Flowise ({} chars)", prompt.len());

        let mut request = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&payload);

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                WorkoutError::UpstreamTimeout(REQUEST_TIMEOUT_SECS)
            } else {
                WorkoutError::UpstreamUnavailable {
                    status: e.status().map_or(0, |s| s.as_u16()),
                    message: format!("Failed to send request to Flowise: {}", e),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WorkoutError::UpstreamUnavailable {
                status: status.as_u16(),
                message,
            });
        }

        let reply = response.json::<FlowiseReply>().await.map_err(|e| {
            WorkoutError::MalformedUpstreamResponse(format!(
                "Failed to parse Flowise response: {}",
                e
            ))
        })?;

        match reply.text {
            Some(text) => {
                info!("Received {} chars of completion text", text.len());
                Ok(text)
            }
            None => Err(WorkoutError::MalformedUpstreamResponse(
                "reply has no text field".to_string(),
            )),
        }
    }
}
