/// Gemini Client: the single point of entry for generative-AI calls.
///
/// No other module may call the Gemini API directly.
/// Overloaded responses (429/503) are retried on the primary model, then the
/// request is sent once to the lighter fallback model.
use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const FALLBACK_MODEL: &str = "gemini-2.5-flash-lite";
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model overloaded after {retries} attempts")]
    Overloaded { retries: u32 },

    #[error("Gemini returned empty content")]
    EmptyContent,

    #[error("No JSON object found in Gemini response")]
    MissingJson,
}

impl GeminiError {
    fn is_overloaded(&self) -> bool {
        match self {
            GeminiError::Api { status, .. } => *status == 429 || *status == 503,
            GeminiError::Overloaded { .. } => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: &'a [Part<'a>],
}

/// One piece of a user turn: prompt text, or a file sent as base64 inline data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

impl<'a> Part<'a> {
    pub fn text(text: &'a str) -> Self {
        Part::Text { text }
    }

    pub fn inline(mime_type: &'a str, data: &[u8]) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type,
                data: BASE64_STANDARD.encode(data),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One raw `generateContent` call against `model`. No retries.
    pub async fn generate(
        &self,
        model: &str,
        parts: &[Part<'_>],
        system: &str,
    ) -> Result<GenerateResponse, GeminiError> {
        let system_parts = [Part::text(system)];
        let request_body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: &system_parts,
            },
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{model}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded (model={model}): prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        Ok(parsed)
    }

    /// Calls the primary model with backoff on overload, then the fallback model once.
    pub async fn call(
        &self,
        parts: &[Part<'_>],
        system: &str,
    ) -> Result<GenerateResponse, GeminiError> {
        let mut last_error: Option<GeminiError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.generate(PRIMARY_MODEL, parts, system).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_overloaded() || matches!(e, GeminiError::Http(_)) => {
                    let delay = Duration::from_millis(BACKOFF_STEP_MS * u64::from(attempt));
                    warn!(
                        "Gemini {PRIMARY_MODEL} attempt {attempt} failed ({e}), retrying after {}ms...",
                        delay.as_millis()
                    );
                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Falling back to {FALLBACK_MODEL} after {MAX_ATTEMPTS} failed attempts: {}",
            last_error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        );
        self.generate(FALLBACK_MODEL, parts, system)
            .await
            .map_err(|e| {
                if e.is_overloaded() {
                    GeminiError::Overloaded {
                        retries: MAX_ATTEMPTS + 1,
                    }
                } else {
                    e
                }
            })
    }

    /// Calls the model and deserializes the JSON object embedded in its reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        parts: &[Part<'_>],
        system: &str,
    ) -> Result<T, GeminiError> {
        let response = self.call(parts, system).await?;
        let text = response.text().ok_or(GeminiError::EmptyContent)?;
        let json = extract_json_object(&text).ok_or(GeminiError::MissingJson)?;
        serde_json::from_str(json).map_err(GeminiError::Parse)
    }
}

/// Returns the span from the first `{` to the last `}`, skipping prose or code fences.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
