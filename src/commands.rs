use anyhow::Result;

use crate::ai::{AiClient, TaskEnhancer};
use crate::config::Config;
use crate::parser;
use crate::sink::JsonlSink;

/// One-shot parse of a single utterance; prints the draft as JSON.
/// With `use_ai`, remote analysis is attempted first and the local
/// parser is the fallback, same as a live session.
pub fn run_parse(config: &Config, text: &str, use_ai: bool) -> Result<()> {
    let remote = if use_ai {
        match AiClient::from_config(&config.ai) {
            Ok(client) => match client.enhance(text) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    tracing::warn!("Remote analysis failed, using local parser: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("AI analysis unavailable: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let draft = remote.or_else(|| parser::parse_transcript_today(text));

    match draft {
        Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
        None => println!("No se detectó un recordatorio en el texto."),
    }
    Ok(())
}

/// List the tasks in the local store.
pub fn run_list(config: &Config) -> Result<()> {
    if config.tasks.backend != "local" {
        anyhow::bail!("'list' only supports the local task backend");
    }

    let sink = JsonlSink::new(&config.tasks.directory);
    let tasks = sink.list_tasks()?;
    if tasks.is_empty() {
        println!("No hay recordatorios guardados.");
        return Ok(());
    }

    for task in tasks {
        let done = if task.completed { "x" } else { " " };
        println!(
            "[{}] #{} {} — {} {} ({}, {})",
            done,
            task.id,
            task.title,
            task.date,
            task.time,
            task.category.as_str(),
            task.frequency.as_str()
        );
    }
    Ok(())
}

/// Write a commented default config file. Refuses to overwrite unless
/// forced.
pub fn run_init_config(force: bool) -> Result<()> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine platform config directory"))?
        .join("recuerda");
    let path = config_dir.join("config.toml");

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&path, Config::generate_default_commented())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_ai_prints_local_result() {
        let config = Config::default();
        assert!(run_parse(&config, "recuérdame tomar mi medicina a las 9pm", false).is_ok());
        assert!(run_parse(&config, "hola, ¿cómo estás?", false).is_ok());
    }

    #[test]
    fn test_list_rejects_http_backend() {
        let mut config = Config::default();
        config.tasks.backend = "http".to_string();
        assert!(run_list(&config).is_err());
    }

    #[test]
    fn test_list_empty_store() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.tasks.directory = tmp.path().to_path_buf();
        assert!(run_list(&config).is_ok());
    }
}
