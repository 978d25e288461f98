//! Filtering and sorting of the task list.
//!
//! A `FilterSpec` is a conjunction: a task must pass every populated
//! criterion. The default spec matches everything, so filtering with it is
//! the identity.

use serde::{Deserialize, Serialize};

use crate::task::{Category, Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Filter criteria. `None` for category/priority means "all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub completed: CompletionFilter,
    pub search_query: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Priority,
    DueDate,
    CreatedAt,
    Custom,
}

fn matches(task: &Task, spec: &FilterSpec) -> bool {
    if let Some(c) = spec.category {
        if task.category != c {
            return false;
        }
    }

    if let Some(p) = spec.priority {
        if task.priority != p {
            return false;
        }
    }

    match spec.completed {
        CompletionFilter::Active if task.completed => return false,
        CompletionFilter::Completed if !task.completed => return false,
        _ => {}
    }

    if !spec.search_query.is_empty() {
        let query = spec.search_query.to_lowercase();
        let title_match = task.title.to_lowercase().contains(&query);
        let description_match = task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&query));
        let tag_match = task.tags.iter().any(|t| t.to_lowercase().contains(&query));
        if !title_match && !description_match && !tag_match {
            return false;
        }
    }

    // Required tags: task must carry every one of them (exact match).
    spec.tags.iter().all(|tag| task.tags.contains(tag))
}

pub fn filter_tasks(tasks: &[Task], spec: &FilterSpec) -> Vec<Task> {
    tasks.iter().filter(|t| matches(t, spec)).cloned().collect()
}

/// Stable: equal-priority tasks keep their relative order.
pub fn sort_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|t| t.priority.rank());
    out
}

/// Due date ascending; tasks without a due date sort last.
pub fn sort_by_due_date(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|t| match t.due_date {
        Some(d) => (0, d),
        None => (1, chrono::NaiveDate::MAX),
    });
    out
}

/// Newest first.
pub fn sort_by_created_at(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|t| std::cmp::Reverse(t.created_at));
    out
}

/// Manual order key ascending.
pub fn sort_by_custom_order(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|t| t.order);
    out
}

pub fn sort_tasks(tasks: &[Task], key: SortKey) -> Vec<Task> {
    match key {
        SortKey::Priority => sort_by_priority(tasks),
        SortKey::DueDate => sort_by_due_date(tasks),
        SortKey::CreatedAt => sort_by_created_at(tasks),
        SortKey::Custom => sort_by_custom_order(tasks),
    }
}

pub fn filter_and_sort(tasks: &[Task], spec: &FilterSpec, key: SortKey) -> Vec<Task> {
    sort_tasks(&filter_tasks(tasks, spec), key)
}

/// Stable partition: active tasks first, completed tasks after.
pub fn move_completed_to_bottom(tasks: &[Task]) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
    out.extend(tasks.iter().filter(|t| t.completed).cloned());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("t1", "Write quarterly report", at(9))
                .with_priority(Priority::High)
                .with_category(Category::Work)
                .with_tags(vec!["writing".into(), "deadline".into()]),
            Task::new("t2", "Buy groceries", at(10))
                .with_priority(Priority::Low)
                .with_due_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
            Task::new("t3", "Study rust lifetimes", at(11))
                .with_category(Category::Study)
                .with_description("borrow checker deep dive")
                .with_tags(vec!["rust".into()]),
        ]
    }

    #[test]
    fn default_spec_is_identity() {
        let tasks = sample();
        let out = filter_tasks(&tasks, &FilterSpec::default());
        assert_eq!(out, tasks);
    }

    #[test]
    fn category_and_priority_filters() {
        let tasks = sample();
        let spec = FilterSpec {
            category: Some(Category::Work),
            ..FilterSpec::default()
        };
        assert_eq!(filter_tasks(&tasks, &spec).len(), 1);

        let spec = FilterSpec {
            priority: Some(Priority::Low),
            ..FilterSpec::default()
        };
        let out = filter_tasks(&tasks, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "t2");
    }

    #[test]
    fn completion_state_filter() {
        let mut tasks = sample();
        tasks[1].completed = true;

        let spec = FilterSpec {
            completed: CompletionFilter::Active,
            ..FilterSpec::default()
        };
        assert_eq!(filter_tasks(&tasks, &spec).len(), 2);

        let spec = FilterSpec {
            completed: CompletionFilter::Completed,
            ..FilterSpec::default()
        };
        let out = filter_tasks(&tasks, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "t2");
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let tasks = sample();
        let hits = |q: &str| {
            let spec = FilterSpec {
                search_query: q.to_string(),
                ..FilterSpec::default()
            };
            filter_tasks(&tasks, &spec)
        };

        assert_eq!(hits("QUARTERLY")[0].id, "t1"); // title
        assert_eq!(hits("borrow")[0].id, "t3"); // description
        assert_eq!(hits("DeadLine")[0].id, "t1"); // tag
        assert!(hits("nonexistent").is_empty());
    }

    #[test]
    fn tag_filter_requires_superset() {
        let tasks = sample();
        let spec = FilterSpec {
            tags: vec!["writing".into(), "deadline".into()],
            ..FilterSpec::default()
        };
        assert_eq!(filter_tasks(&tasks, &spec).len(), 1);

        let spec = FilterSpec {
            tags: vec!["writing".into(), "rust".into()],
            ..FilterSpec::default()
        };
        assert!(filter_tasks(&tasks, &spec).is_empty());
    }

    #[test]
    fn priority_sort_is_stable() {
        let tasks = vec![
            Task::new("a", "med 1", at(9)),
            Task::new("b", "low", at(9)).with_priority(Priority::Low),
            Task::new("c", "med 2", at(9)),
            Task::new("d", "high", at(9)).with_priority(Priority::High),
        ];
        let ids: Vec<_> = sort_by_priority(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["d", "a", "c", "b"]);
    }

    #[test]
    fn due_date_sort_puts_undated_last() {
        let tasks = sample();
        let ids: Vec<_> = sort_by_due_date(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids[0], "t2");
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn created_at_sort_is_newest_first() {
        let tasks = sample();
        let ids: Vec<_> = sort_by_created_at(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["t3", "t2", "t1"]);
    }

    #[test]
    fn custom_sort_follows_order_keys() {
        let mut tasks = sample();
        tasks[0].order = 300;
        tasks[1].order = 100;
        tasks[2].order = 200;
        let ids: Vec<_> = sort_by_custom_order(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["t2", "t3", "t1"]);
    }

    #[test]
    fn completed_moves_to_bottom_stably() {
        let mut tasks = sample();
        tasks[0].completed = true;
        let ids: Vec<_> = move_completed_to_bottom(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["t2", "t3", "t1"]);
    }
}
