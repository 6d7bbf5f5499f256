// Remote AI analysis of transcripts. Best-effort and untrusted: any
// failure here routes the caller back to the local heuristic parser.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiConfig;
use crate::task::{TaskCategory, TaskDraft, TaskFrequency};

const SYSTEM_PROMPT: &str = "Eres un asistente especializado en entender instrucciones para \
crear recordatorios. Tu trabajo es extraer: título de la tarea (title), hora (time, formato \
HH:MM de 24 horas), fecha (date, formato YYYY-MM-DD), categoría (category: medicine, meal o \
general) y frecuencia (frequency: once, daily, weekly o monthly) del texto proporcionado por \
un usuario mayor. Responde solo en formato JSON sin explicaciones adicionales.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Fallback,
}

/// Raw outcome of one analysis request. `text` is an opaque payload
/// (expected JSON) that the caller attempts to parse; created per
/// request, consumed immediately, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub text: String,
    pub success: bool,
    pub source: AnalysisSource,
}

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("AI request failed: {0}")]
    Request(String),
    #[error("AI returned a payload that is not JSON")]
    BadPayload,
    #[error("AI payload lacks a usable task")]
    Incomplete,
}

/// Higher-fidelity extraction attempt over the same transcript the local
/// parser sees. Implementations must be safe to call from a worker
/// thread; failure is an expected, recoverable outcome.
pub trait TaskEnhancer: Send + Sync {
    fn enhance(&self, transcript: &str) -> Result<TaskDraft, EnhanceError>;
}

pub struct AiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl AiClient {
    /// Build a client from config. The API key may come from the config
    /// file or the RECUERDA_OPENAI_KEY environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        if !config.enabled {
            anyhow::bail!("AI analysis is disabled in config ([ai] enabled = false)");
        }

        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("RECUERDA_OPENAI_KEY")
                .context("AI API key not configured. Set [ai] api_key or RECUERDA_OPENAI_KEY")?
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            client,
        })
    }

    /// Analyze a transcript. Never errors: on any failure the result is
    /// a fallback analysis echoing the transcript with `success: false`,
    /// mirroring the wire shape of the analysis API.
    pub fn analyze(&self, transcript: &str) -> AiAnalysis {
        match self.chat(transcript) {
            Ok(text) => AiAnalysis {
                text,
                success: true,
                source: AnalysisSource::Remote,
            },
            Err(e) => {
                tracing::warn!("AI analysis failed, falling back to local parsing: {:#}", e);
                AiAnalysis {
                    text: transcript.to_string(),
                    success: false,
                    source: AnalysisSource::Fallback,
                }
            }
        }
    }

    fn chat(&self, transcript: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Failed to send analysis request")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            anyhow::bail!("AI endpoint returned HTTP {}: {}", status.as_u16(), error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .context("Failed to parse chat completion response")?;

        let choice = chat_response
            .choices
            .first()
            .context("No choices in chat completion response")?;

        Ok(choice.message.content.clone())
    }
}

impl TaskEnhancer for AiClient {
    fn enhance(&self, transcript: &str) -> Result<TaskDraft, EnhanceError> {
        let analysis = self.analyze(transcript);
        if !analysis.success {
            return Err(EnhanceError::Request(
                "remote analysis unavailable".to_string(),
            ));
        }
        draft_from_payload(&analysis.text)
    }
}

/// Map an analysis payload onto a task draft. The model answers in
/// whichever language it picked up from the utterance, so every field
/// accepts both its English and Spanish key spelling. Category and
/// frequency default to general/once when absent.
pub fn draft_from_payload(text: &str) -> Result<TaskDraft, EnhanceError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| EnhanceError::BadPayload)?;

    let draft = TaskDraft {
        title: pick_str(&value, &["title", "titulo", "título", "tarea"]).unwrap_or_default(),
        time: pick_str(&value, &["time", "hora"]).unwrap_or_default(),
        date: pick_str(&value, &["date", "fecha"]).unwrap_or_default(),
        category: pick_str(&value, &["category", "categoria", "categoría"])
            .and_then(|s| TaskCategory::parse_lenient(&s))
            .unwrap_or_default(),
        frequency: pick_str(&value, &["frequency", "frecuencia"])
            .and_then(|s| TaskFrequency::parse_lenient(&s))
            .unwrap_or_default(),
    };

    if draft.is_usable() {
        Ok(draft)
    } else {
        Err(EnhanceError::Incomplete)
    }
}

fn pick_str(value: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(k))
        .filter_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_english_keys() {
        let draft = draft_from_payload(
            r#"{"title": "Tomar medicina", "time": "21:00", "date": "2026-08-28",
                "category": "medicine", "frequency": "daily"}"#,
        )
        .unwrap();
        assert_eq!(draft.title, "Tomar medicina");
        assert_eq!(draft.time, "21:00");
        assert_eq!(draft.category, TaskCategory::Medicine);
        assert_eq!(draft.frequency, TaskFrequency::Daily);
    }

    #[test]
    fn test_payload_with_spanish_keys() {
        let draft = draft_from_payload(
            r#"{"título": "Almorzar", "hora": "12:30", "fecha": "2026-08-28",
                "categoría": "comida", "frecuencia": "una vez"}"#,
        )
        .unwrap();
        assert_eq!(draft.title, "Almorzar");
        assert_eq!(draft.time, "12:30");
        assert_eq!(draft.category, TaskCategory::Meal);
        assert_eq!(draft.frequency, TaskFrequency::Once);
    }

    #[test]
    fn test_category_and_frequency_default_when_absent() {
        let draft =
            draft_from_payload(r#"{"title": "Cita médica", "time": "10:00"}"#).unwrap();
        assert_eq!(draft.category, TaskCategory::General);
        assert_eq!(draft.frequency, TaskFrequency::Once);
    }

    #[test]
    fn test_non_json_payload_is_bad_payload() {
        assert!(matches!(
            draft_from_payload("recuérdame tomar mi medicina"),
            Err(EnhanceError::BadPayload)
        ));
    }

    #[test]
    fn test_payload_without_title_is_incomplete() {
        assert!(matches!(
            draft_from_payload(r#"{"time": "10:00", "date": "2026-08-28"}"#),
            Err(EnhanceError::Incomplete)
        ));
    }

    #[test]
    fn test_payload_without_date_or_time_is_incomplete() {
        assert!(matches!(
            draft_from_payload(r#"{"title": "Cita médica"}"#),
            Err(EnhanceError::Incomplete)
        ));
    }

    #[test]
    fn test_from_config_disabled_errors() {
        let config = AiConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(AiClient::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_with_key_succeeds() {
        let config = AiConfig {
            enabled: true,
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        let client = AiClient::from_config(&config).unwrap();
        let debug_output = format!("{:?}", client);
        assert!(!debug_output.contains("test-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
