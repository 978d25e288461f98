//! Task model for the GamiTask engine.
//!
//! Note: we keep this small + serializable. Storage (the JSON blobs the CLI
//! writes) is a later layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl Priority {
    /// Sort rank: high sorts before medium before low.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Study,
}

/// Emotion recorded after completing a task. Serialized as the emoji itself
/// so persisted blobs stay human-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😎")]
    Cool,
    #[serde(rename = "💪")]
    Pumped,
    #[serde(rename = "😴")]
    Tired,
    #[serde(rename = "😤")]
    Frustrated,
    #[serde(rename = "🤔")]
    Thoughtful,
    #[serde(rename = "🎉")]
    Celebrating,
    #[serde(rename = "😌")]
    Relieved,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Happy,
        Emotion::Cool,
        Emotion::Pumped,
        Emotion::Tired,
        Emotion::Frustrated,
        Emotion::Thoughtful,
        Emotion::Celebrating,
        Emotion::Relieved,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Cool => "😎",
            Emotion::Pumped => "💪",
            Emotion::Tired => "😴",
            Emotion::Frustrated => "😤",
            Emotion::Thoughtful => "🤔",
            Emotion::Celebrating => "🎉",
            Emotion::Relieved => "😌",
        }
    }

    /// Look an emotion up by its emoji.
    pub fn from_emoji(s: &str) -> Option<Emotion> {
        Emotion::ALL.into_iter().find(|e| e.emoji() == s)
    }
}

/// Core task type.
///
/// `id` and `created_at` are assigned at creation and never change.
/// `order` is the manual-ordering key: millisecond-timestamp based so keys
/// from a reorder stay comparable to keys of tasks created afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub completed: bool,
    pub priority: Priority,
    pub category: Category,

    /// Calendar due date, compared end-of-day in the configured timezone.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Estimated effort in minutes.
    #[serde(default)]
    pub estimated_minutes: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    /// Manual ordering key (ascending).
    pub order: i64,

    /// Set when `completed` flips to true; cleared when it flips back.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Recorded after completion only.
    #[serde(default)]
    pub emotion: Option<Emotion>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            completed: false,
            priority: Priority::Medium,
            category: Category::Personal,
            due_date: None,
            estimated_minutes: None,
            tags: Vec::new(),
            created_at: now,
            order: now.timestamp_millis(),
            completed_at: None,
            emotion: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}
