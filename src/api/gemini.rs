use crate::config::Config;
use crate::error::{Result, ShortError};
use crate::scene::{parse_script, ShortScript};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

/// What a successful `generateContent` body turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamReply {
    /// Text of the first part of the first candidate
    WellFormed(String),
    /// Valid shape, but nothing to read (no candidates, parts or text)
    Empty,
    /// Not the `generateContent` shape at all
    Malformed(String),
}

impl UpstreamReply {
    /// Classifies a raw success body before any field is trusted.
    pub fn classify(body: &str) -> Self {
        let response: GenerateContentResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => return UpstreamReply::Malformed(e.to_string()),
        };

        let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
            return UpstreamReply::Empty;
        };

        if let Some(reason) = &candidate.finish_reason {
            debug!("First candidate finish reason: {}", reason);
        }

        candidate
            .content
            .and_then(|content| content.parts)
            .and_then(|parts| parts.into_iter().next())
            .and_then(|part| part.text)
            .map(UpstreamReply::WellFormed)
            .unwrap_or(UpstreamReply::Empty)
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            UpstreamReply::WellFormed(text) => Ok(text),
            UpstreamReply::Empty => Err(ShortError::MalformedResponse(
                "response has no candidate text".to_string(),
            )),
            UpstreamReply::Malformed(reason) => Err(ShortError::MalformedResponse(reason)),
        }
    }
}

/// Builds the instruction sent to the model. The topic is embedded verbatim.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Generate a YouTube Short script about {} in JSON format: {{"title": "str", "script": "str", "scenes": [{{"voiceover": "str", "visual_prompt": "str"}}]}}"#,
        topic
    )
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // 不设置全局超时，生成请求单独限时
        let client = Client::builder().build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: config.timeout,
            client,
        })
    }

    /// Fetches the provider's model listing and returns the body untouched,
    /// whatever the status code. No time limit is applied.
    pub async fn list_models(&self) -> Result<Value> {
        let url = format!("{}/models", self.base_url);
        info!("Listing models from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Model listing returned HTTP {}", status);
        }

        let listing: Value = response.json().await?;
        Ok(listing)
    }

    /// Asks the model for a short script about `topic`.
    ///
    /// The whole upstream exchange is bounded by the configured timeout.
    /// When it expires the in-flight request future is dropped, which aborts
    /// the connection and releases the timer.
    pub async fn generate_script(&self, topic: &str) -> Result<ShortScript> {
        info!("Generating short script for topic: {}", topic);
        let prompt = build_prompt(topic);

        let body = match tokio::time::timeout(self.timeout, self.request_generation(&prompt)).await
        {
            Ok(result) => result?,
            Err(_) => {
                error!(
                    "Generation request timed out after {}s",
                    self.timeout.as_secs()
                );
                return Err(ShortError::TimeoutError(self.timeout.as_secs()));
            }
        };

        let text = UpstreamReply::classify(&body).into_text()?;
        debug!("Generated script text: {}", text);

        let script = parse_script(&text)?;
        info!(
            "Generated \"{}\" with {} scenes",
            script.title,
            script.scenes.len()
        );
        Ok(script)
    }

    async fn request_generation(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request_body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                let e = ShortError::from(e);
                error!("Connection error: {}", e);
                e
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<UpstreamErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message);
            error!("Gemini API error (HTTP {}): {}", status, text);
            return Err(ShortError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_topic_and_schema() {
        let prompt = build_prompt("a lighthouse keeper's last night");
        assert!(prompt.contains("about a lighthouse keeper's last night in JSON format"));
        assert!(prompt.contains(r#""scenes": [{"voiceover": "str", "visual_prompt": "str"}]"#));
    }

    #[test]
    fn test_classify_well_formed() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]},"finishReason":"STOP"},{"content":{"parts":[{"text":"other"}]}}]}"#;
        assert_eq!(
            UpstreamReply::classify(body),
            UpstreamReply::WellFormed("first".to_string())
        );
    }

    #[test]
    fn test_classify_empty_shapes() {
        let bodies = [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
        ];
        for body in bodies {
            assert_eq!(UpstreamReply::classify(body), UpstreamReply::Empty, "{}", body);
        }
    }

    #[test]
    fn test_classify_malformed() {
        assert!(matches!(
            UpstreamReply::classify("<html>oops</html>"),
            UpstreamReply::Malformed(_)
        ));
        assert!(matches!(
            UpstreamReply::classify(r#"{"candidates":"none"}"#),
            UpstreamReply::Malformed(_)
        ));
    }

    #[test]
    fn test_empty_reply_becomes_malformed_response_error() {
        let err = UpstreamReply::Empty.into_text().unwrap_err();
        assert!(matches!(err, ShortError::MalformedResponse(_)));
    }
}
