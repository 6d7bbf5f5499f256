use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task category. The remote AI payload and spoken Spanish both use
/// localized spellings, so parsing is lenient about the value names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Medicine,
    Meal,
    #[default]
    General,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Medicine => "medicine",
            TaskCategory::Meal => "meal",
            TaskCategory::General => "general",
        }
    }

    /// Accepts English and Spanish spellings ("medicina", "comida", ...).
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "medicine" | "medicina" | "medicamento" => Some(TaskCategory::Medicine),
            "meal" | "comida" | "comer" => Some(TaskCategory::Meal),
            "general" => Some(TaskCategory::General),
            _ => None,
        }
    }

    /// Canned title used when no title could be extracted from speech.
    pub fn default_title(&self) -> &'static str {
        match self {
            TaskCategory::Medicine => "Tomar medicina",
            TaskCategory::Meal => "Hora de comer",
            TaskCategory::General => "Nuevo recordatorio",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFrequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl TaskFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFrequency::Once => "once",
            TaskFrequency::Daily => "daily",
            TaskFrequency::Weekly => "weekly",
            TaskFrequency::Monthly => "monthly",
        }
    }

    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "once" | "una vez" => Some(TaskFrequency::Once),
            "daily" | "diario" | "diaria" => Some(TaskFrequency::Daily),
            "weekly" | "semanal" => Some(TaskFrequency::Weekly),
            "monthly" | "mensual" => Some(TaskFrequency::Monthly),
            _ => None,
        }
    }
}

/// Possibly-incomplete task extracted from a transcript. `time` is
/// "HH:MM" (24h) or empty for unspecified; `date` is "YYYY-MM-DD" or
/// empty. Either extraction path produces this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub time: String,
    pub date: String,
    pub category: TaskCategory,
    pub frequency: TaskFrequency,
}

impl TaskDraft {
    /// Worth surfacing to the caller: a title plus at least one of
    /// date/time. Anything less is discarded.
    pub fn is_usable(&self) -> bool {
        !self.title.is_empty() && (!self.date.is_empty() || !self.time.is_empty())
    }

    /// Ready for the persistence sink, which requires all three.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.date.is_empty() && !self.time.is_empty()
    }
}

/// Record shape handed to a task sink for creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub time: String,
    pub date: String,
    pub category: TaskCategory,
    pub frequency: TaskFrequency,
    pub user_id: u32,
    pub completed: bool,
}

impl NewTask {
    pub fn from_draft(draft: TaskDraft, user_id: u32) -> Self {
        Self {
            title: draft.title,
            time: draft.time,
            date: draft.date,
            category: draft.category,
            frequency: draft.frequency,
            user_id,
            completed: false,
        }
    }
}

/// Persisted task as returned by a sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub time: String,
    pub date: String,
    pub category: TaskCategory,
    pub frequency: TaskFrequency,
    pub user_id: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
