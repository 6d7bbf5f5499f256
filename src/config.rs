use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub ai: AiConfig,
    pub tasks: TasksConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// User the created tasks belong to.
    pub user_id: u32,
    /// BCP 47 locale for speech playback.
    pub locale: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    /// OpenAI-compatible API base URL.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Remote analysis timeout; a timeout is treated as a failed
    /// analysis and falls back to the local parser.
    pub timeout_secs: u64,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Task sink backend: "local" (JSONL store) or "http" (REST API).
    pub backend: String,
    /// Directory for the local task store.
    pub directory: PathBuf,
    /// Base URL for the http backend.
    pub api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether to speak feedback aloud via an external TTS command.
    pub enabled: bool,
    /// TTS command to spawn; the utterance is appended as the last
    /// argument.
    pub command: String,
    /// Extra arguments. "{locale}" is replaced with the assistant locale.
    pub args: Vec<String>,
}

// --- Default implementations ---

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            locale: "es-ES".to_string(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        let directory = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recuerda");
        Self {
            backend: "local".to_string(),
            directory,
            api_base_url: String::new(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "espeak-ng".to_string(),
            args: vec!["-v".to_string(), "{locale}".to_string()],
        }
    }
}

// --- Config loading ---

impl Config {
    /// Load config and return the resolved file path (if any).
    pub fn load_with_path(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        // 1. Check explicit path
        if let Some(p) = path {
            let content = std::fs::read_to_string(p).map_err(|e| {
                anyhow::anyhow!("Failed to read config file {}: {}", p.display(), e)
            })?;
            let config: Config = toml::from_str(&content)?;
            return Ok((config, Some(p.to_path_buf())));
        }

        // 2. Check beside the executable
        if let Ok(exe_path) = std::env::current_exe() {
            let beside_exe = exe_path.parent().map(|p| p.join("recuerda.toml"));
            if let Some(p) = beside_exe {
                if p.exists() {
                    let content = std::fs::read_to_string(&p)?;
                    let config: Config = toml::from_str(&content)?;
                    return Ok((config, Some(p)));
                }
            }
        }

        // 3. Check platform config directory (e.g. ~/.config/recuerda/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_config = config_dir.join("recuerda").join("config.toml");
            if platform_config.exists() {
                let content = std::fs::read_to_string(&platform_config)?;
                let config: Config = toml::from_str(&content)?;
                return Ok((config, Some(platform_config)));
            }
        }

        // 4. Fall back to defaults
        tracing::info!("No config file found, using defaults");
        Ok((Config::default(), None))
    }

    /// Load config without tracking the resolved path.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_path(path).map(|(config, _)| config)
    }

    /// Generate a default config file with all fields and inline documentation.
    pub fn generate_default_commented() -> String {
        let default_tasks_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recuerda");
        let tasks_dir_str = default_tasks_dir.to_string_lossy().replace('\\', "\\\\");

        format!(
            r#"# recuerda configuration
# Edit this file to customize task parsing, AI analysis, and speech feedback.

[assistant]
# User id attached to created tasks.
user_id = 1
# Locale for spoken feedback.
locale = "es-ES"

[ai]
# Enable AI-assisted transcript analysis. When disabled (or when the
# remote call fails) the built-in heuristic parser is used instead.
enabled = false
# OpenAI-compatible API base URL.
endpoint = "https://api.openai.com/v1"
# API key (or set the RECUERDA_OPENAI_KEY environment variable).
# api_key = ""
# Model used for transcript analysis.
model = "gpt-4o-mini"
# Remote analysis timeout in seconds. A timeout counts as a failed
# analysis and falls back to local parsing.
timeout_secs = 30

[tasks]
# Task storage backend: "local" (JSONL file) or "http" (REST API).
backend = "local"
# Directory for the local task store.
directory = "{tasks_dir}"
# Base URL of the reminder API (http backend only).
# api_base_url = "http://localhost:5000"

[speech]
# Speak feedback aloud by spawning an external TTS command.
enabled = false
# Command and arguments; "{{locale}}" is replaced with the assistant
# locale and the utterance is appended as the final argument.
command = "espeak-ng"
args = ["-v", "{{locale}}"]
"#,
            tasks_dir = tasks_dir_str
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.assistant.user_id, 1);
        assert_eq!(config.assistant.locale, "es-ES");
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.tasks.backend, "local");
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.command, "espeak-ng");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            [assistant]
            user_id = 7

            [ai]
            enabled = true
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.user_id, 7);
        assert!(config.ai.enabled);
        // Defaults still applied for unspecified fields
        assert_eq!(config.assistant.locale, "es-ES");
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.tasks.backend, "local");
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_str = r#"
            [assistant]
            user_id = 2
            locale = "es-MX"

            [ai]
            enabled = true
            endpoint = "https://example.openai.azure.com/v1"
            api_key = "test-key"
            model = "gpt-4o"
            timeout_secs = 10

            [tasks]
            backend = "http"
            directory = "/tmp/recuerda"
            api_base_url = "http://localhost:5000"

            [speech]
            enabled = true
            command = "say"
            args = []
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.locale, "es-MX");
        assert!(config.ai.enabled);
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.ai.timeout_secs, 10);
        assert_eq!(config.tasks.backend, "http");
        assert_eq!(config.tasks.api_base_url, "http://localhost:5000");
        assert!(config.speech.enabled);
        assert_eq!(config.speech.command, "say");
        assert!(config.speech.args.is_empty());
    }

    #[test]
    fn test_config_roundtrip_serialize() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.assistant.user_id, config.assistant.user_id);
        assert_eq!(parsed.ai.model, config.ai.model);
        assert_eq!(parsed.tasks.backend, config.tasks.backend);
    }

    #[test]
    fn test_load_nonexistent_path_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_path_returns_resolved_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config_file = tmp.path().join("recuerda.toml");
        std::fs::write(&config_file, "[assistant]\nuser_id = 9\n").unwrap();

        let (config, resolved) = Config::load_with_path(Some(config_file.as_path())).unwrap();
        assert_eq!(config.assistant.user_id, 9);
        assert_eq!(resolved, Some(config_file));
    }

    #[test]
    fn test_generate_default_commented_is_valid_toml() {
        let content = Config::generate_default_commented();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.assistant.user_id, 1);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.tasks.backend, "local");
    }

    #[test]
    fn test_generate_default_commented_has_all_sections() {
        let content = Config::generate_default_commented();
        assert!(content.contains("[assistant]"));
        assert!(content.contains("[ai]"));
        assert!(content.contains("[tasks]"));
        assert!(content.contains("[speech]"));
    }

    #[test]
    fn test_ai_config_debug_redacts_api_key() {
        let config = AiConfig {
            api_key: "super-secret-key-12345".to_string(),
            ..Default::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("super-secret-key-12345"),
            "Debug output should not contain the API key"
        );
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should show [REDACTED] for api_key"
        );
    }

    #[test]
    fn test_config_debug_redacts_nested_secret() {
        let mut config = Config::default();
        config.ai.api_key = "nested-secret-key".to_string();
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("nested-secret-key"));
    }
}
