// Spoken feedback. Fire-and-forget: the assistant never waits for
// playback to finish, and playback failure is only logged.

use crate::config::SpeechConfig;
use crate::task::TaskDraft;

/// Canned assistant phrases, matching the original voice dialog.
pub mod prompts {
    use super::*;

    pub const WELCOME: &str = "¿Qué necesitas recordar y cuándo?";
    pub const RETRY: &str =
        "No he podido entender completamente. Por favor, intenta nuevamente.";
    pub const INVALID: &str = "No he podido crear el recordatorio. Falta información importante.";
    pub const ERROR: &str =
        "Ha ocurrido un error al crear el recordatorio. Por favor intenta nuevamente.";

    /// Confirmation readout. "21:00" is spoken as "21 y 00".
    pub fn created(draft: &TaskDraft) -> String {
        format!(
            "He creado un recordatorio para {} a las {}.",
            draft.title,
            draft.time.replace(':', " y ")
        )
    }
}

pub struct Speaker {
    enabled: bool,
    command: String,
    args: Vec<String>,
}

impl Speaker {
    pub fn from_config(config: &SpeechConfig, locale: &str) -> Self {
        let args = config
            .args
            .iter()
            .map(|a| a.replace("{locale}", locale))
            .collect();
        Self {
            enabled: config.enabled,
            command: config.command.clone(),
            args,
        }
    }

    /// Display the utterance and, when enabled, hand it to the external
    /// TTS command without waiting for completion.
    pub fn say(&self, utterance: &str) {
        println!("{}", utterance);

        if !self.enabled {
            return;
        }

        let mut cmd = std::process::Command::new(&self.command);
        cmd.args(&self.args)
            .arg(utterance)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());

        match cmd.spawn() {
            Ok(_) => tracing::debug!(command = %self.command, "Speaking: {}", utterance),
            Err(e) => tracing::warn!("Failed to spawn TTS command {}: {}", self.command, e),
        }
    }
}
