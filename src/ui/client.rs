use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use super::state::{Outcome, ShortData};
use crate::error::{Result, ShortError};
use crate::scene::ScriptRequest;

/// Shown when the endpoint fails without saying why.
pub const FALLBACK_ERROR: &str = "Failed to generate";

/// Talks to a running script endpoint on behalf of the terminal view.
#[derive(Debug, Clone)]
pub struct ScriptClient {
    base_url: String,
    client: Client,
}

impl ScriptClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Requests a script for `topic`. Every failure is folded into
    /// [`Outcome::Error`] so the view always has something to show.
    pub async fn generate(&self, topic: &str) -> Outcome {
        match self.request(topic).await {
            Ok(data) => Outcome::Script(data),
            Err(e) => {
                warn!("Generation failed: {}", e);
                // 只有服务端返回的错误用它自己的文案，本地故障显示原始信息
                let message = match e {
                    ShortError::UpstreamError { message, .. } => {
                        message.unwrap_or_else(|| FALLBACK_ERROR.to_string())
                    }
                    other => other.to_string(),
                };
                Outcome::Error(message)
            }
        }
    }

    async fn request(&self, topic: &str) -> Result<ShortData> {
        let url = format!("{}/api/short", self.base_url);
        info!("Requesting script from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ScriptRequest {
                topic: topic.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        let error = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty());

        // An `error` field wins even on a success status.
        if !status.is_success() || error.is_some() {
            return Err(ShortError::UpstreamError {
                status: status.as_u16(),
                message: Some(error.unwrap_or(FALLBACK_ERROR).to_string()),
            });
        }

        let data: ShortData = serde_json::from_value(body)?;
        Ok(data)
    }
}
