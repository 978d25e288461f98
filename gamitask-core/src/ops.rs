//! Collection transforms over the task list.
//!
//! All functions are pure: they take the current collection and return a new
//! one. Operations on an unknown id leave the collection unchanged rather
//! than erroring — the caller re-renders whatever comes back.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::task::{Category, Emotion, Priority, Task};

/// Fields the caller supplies when creating a task. Everything except the
/// title has a default.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
    pub estimated_minutes: Option<u32>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves a field untouched; the `clear_*` flags
/// explicitly empty the optional fields.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
    pub estimated_minutes: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub clear_description: bool,
    pub clear_due_date: bool,
    pub clear_estimate: bool,
}

/// Build a new task from a draft. Returns `None` when the trimmed title is
/// blank; a blank title must never enter the collection.
pub fn create_task(draft: TaskDraft, now: DateTime<Utc>) -> Option<Task> {
    let title = draft.title.trim();
    if title.is_empty() {
        return None;
    }

    let mut task = Task::new(Uuid::new_v4().to_string(), title, now);
    task.description = draft.description;
    if let Some(p) = draft.priority {
        task.priority = p;
    }
    if let Some(c) = draft.category {
        task.category = c;
    }
    task.due_date = draft.due_date;
    task.estimated_minutes = draft.estimated_minutes;
    task.tags = draft.tags;
    Some(task)
}

/// Apply a patch to the task with the given id. Identifier and creation
/// timestamp are immutable; a blank patched title is ignored.
pub fn update_task(tasks: &[Task], id: &str, patch: &TaskPatch) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id != id {
                return t.clone();
            }
            let mut t = t.clone();
            if let Some(title) = &patch.title {
                let title = title.trim();
                if !title.is_empty() {
                    t.title = title.to_string();
                }
            }
            if patch.clear_description {
                t.description = None;
            } else if let Some(d) = &patch.description {
                t.description = Some(d.clone());
            }
            if let Some(p) = patch.priority {
                t.priority = p;
            }
            if let Some(c) = patch.category {
                t.category = c;
            }
            if patch.clear_due_date {
                t.due_date = None;
            } else if let Some(d) = patch.due_date {
                t.due_date = Some(d);
            }
            if patch.clear_estimate {
                t.estimated_minutes = None;
            } else if let Some(m) = patch.estimated_minutes {
                t.estimated_minutes = Some(m);
            }
            if let Some(tags) = &patch.tags {
                t.tags = tags.clone();
            }
            t
        })
        .collect()
}

pub fn delete_task(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != id).cloned().collect()
}

/// Flip the completed flag. Completing stamps `completed_at`; un-completing
/// clears both `completed_at` and the recorded emotion, since exp earned for
/// the completion is never refunded and the metadata would be stale.
pub fn toggle_complete(tasks: &[Task], id: &str, now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id != id {
                return t.clone();
            }
            let mut t = t.clone();
            if t.completed {
                t.completed = false;
                t.completed_at = None;
                t.emotion = None;
            } else {
                t.completed = true;
                t.completed_at = Some(now);
            }
            t
        })
        .collect()
}

/// Record an emotion on an already-completed task. No-op for active tasks.
pub fn record_emotion(tasks: &[Task], id: &str, emotion: Emotion) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id != id || !t.completed {
                return t.clone();
            }
            let mut t = t.clone();
            t.emotion = Some(emotion);
            t
        })
        .collect()
}

/// Re-key the collection to match a caller-supplied id sequence.
///
/// `ordered_ids` must be a permutation of the collection's ids; anything
/// else (missing, unknown, duplicate ids) leaves the collection unchanged.
/// Fresh keys are `now` millis + position, so they remain globally ordered
/// against keys assigned by later creations.
pub fn reorder_tasks(tasks: &[Task], ordered_ids: &[String], now: DateTime<Utc>) -> Vec<Task> {
    if ordered_ids.len() != tasks.len() {
        return tasks.to_vec();
    }

    let base = now.timestamp_millis();
    let mut out = Vec::with_capacity(tasks.len());
    for (i, id) in ordered_ids.iter().enumerate() {
        let Some(t) = tasks.iter().find(|t| &t.id == id) else {
            return tasks.to_vec();
        };
        let mut t = t.clone();
        t.order = base + i as i64;
        out.push(t);
    }

    // A duplicate id in the input would have shadowed a missing one.
    let mut seen: Vec<&str> = ordered_ids.iter().map(String::as_str).collect();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != tasks.len() {
        return tasks.to_vec();
    }

    out
}
