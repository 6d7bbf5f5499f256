use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use thiserror::Error;

use crate::config::Config;
use crate::task::{NewTask, Task};

#[derive(Debug, Error)]
pub enum SinkError {
    /// The record violates the persistence layer's required fields.
    /// Distinct from an incomplete draft: this means a bug or a remote
    /// payload that slipped through, and the caller reports a creation
    /// error rather than "could not understand".
    #[error("invalid task record: {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Destination for confirmed tasks.
pub trait TaskSink: Send {
    fn name(&self) -> &str;
    fn create_task(&self, task: &NewTask) -> Result<Task, SinkError>;
}

/// Reject records the persistence layer would refuse: every field
/// required, nothing empty.
fn validate(task: &NewTask) -> Result<(), SinkError> {
    let mut missing = Vec::new();
    if task.title.is_empty() {
        missing.push("title");
    }
    if task.time.is_empty() {
        missing.push("time");
    }
    if task.date.is_empty() {
        missing.push("date");
    }
    if task.user_id == 0 {
        missing.push("user_id");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SinkError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Append-only JSONL store in the tasks directory. Ids are assigned from
/// the highest id currently in the file.
pub struct JsonlSink {
    directory: PathBuf,
}

impl JsonlSink {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    fn store_path(&self) -> PathBuf {
        self.directory.join("tasks.jsonl")
    }

    pub fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read task store {}", path.display()))?;

        let mut tasks = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<Task>(line) {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::warn!("Skipping corrupt task record: {}", e),
            }
        }
        Ok(tasks)
    }
}

impl TaskSink for JsonlSink {
    fn name(&self) -> &str {
        "local"
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, SinkError> {
        validate(task)?;

        std::fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create {}", self.directory.display()))
            .map_err(SinkError::Storage)?;

        let next_id = self
            .list_tasks()?
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1;

        let created = Task {
            id: next_id,
            title: task.title.clone(),
            time: task.time.clone(),
            date: task.date.clone(),
            category: task.category,
            frequency: task.frequency,
            user_id: task.user_id,
            completed: task.completed,
            created_at: Utc::now(),
        };

        let path = self.store_path();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open task store {}", path.display()))
            .map_err(SinkError::Storage)?;
        use std::io::Write;
        writeln!(
            file,
            "{}",
            serde_json::to_string(&created).map_err(|e| SinkError::Storage(e.into()))?
        )
        .map_err(|e| SinkError::Storage(e.into()))?;

        tracing::info!(id = created.id, title = %created.title, "Task created");
        Ok(created)
    }
}

/// Posts tasks to the reminder REST API, the same endpoint the web UI
/// uses.
pub struct HttpSink {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSink {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        if base_url.is_empty() {
            anyhow::bail!("Task API base URL not configured. Set [tasks] api_base_url");
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl TaskSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, SinkError> {
        validate(task)?;

        let url = format!("{}/api/tasks", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(task)
            .send()
            .context("Failed to send task creation request")?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(SinkError::Validation(body));
        }
        if !status.is_success() {
            return Err(SinkError::Storage(anyhow::anyhow!(
                "Task API returned HTTP {}",
                status.as_u16()
            )));
        }

        let created: Task = response
            .json()
            .context("Failed to parse created task response")?;
        Ok(created)
    }
}

/// Build the configured sink.
pub fn build_sink(config: &Config) -> anyhow::Result<Box<dyn TaskSink>> {
    match config.tasks.backend.as_str() {
        "local" => Ok(Box::new(JsonlSink::new(&config.tasks.directory))),
        "http" => Ok(Box::new(HttpSink::new(&config.tasks.api_base_url)?)),
        other => anyhow::bail!("Unknown task backend: {}", other),
    }
}
