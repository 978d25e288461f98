//! Aggregate statistics over the task list, for the stats dashboard.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::task::{Category, Emotion, Priority, Task};
use crate::time::local_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Rounded integer percent; 0 when the list is empty.
    pub completion_rate: u32,

    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,

    pub work: usize,
    pub personal: usize,
    pub study: usize,
}

/// Completed-task count for one of the trailing calendar weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// 0 = the week starting today, 1 = the week starting 7 days ago, ...
    pub weeks_ago: u32,
    pub completed: usize,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let completion_rate = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    let mut stats = TaskStats {
        total,
        completed,
        active: total - completed,
        completion_rate,
        ..TaskStats::default()
    };

    for t in tasks {
        match t.priority {
            Priority::High => stats.high_priority += 1,
            Priority::Medium => stats.medium_priority += 1,
            Priority::Low => stats.low_priority += 1,
        }
        match t.category {
            Category::Work => stats.work += 1,
            Category::Personal => stats.personal += 1,
            Category::Study => stats.study += 1,
        }
    }

    stats
}

/// Count recorded emotions among completed tasks, most frequent first.
pub fn emotion_counts(tasks: &[Task]) -> Vec<(Emotion, usize)> {
    let mut out: Vec<(Emotion, usize)> = Vec::new();
    for e in Emotion::ALL {
        let count = tasks
            .iter()
            .filter(|t| t.completed && t.emotion == Some(e))
            .count();
        if count > 0 {
            out.push((e, count));
        }
    }
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Completed-task counts for the past `WEEKS` calendar weeks, oldest first.
///
/// Week boundaries are local calendar days: bucket 0 starts today and runs
/// 7 days, bucket 1 starts 7 days before that, and so on — matching a
/// trailing "this week / N weeks ago" chart.
pub fn weekly_completions(tasks: &[Task], now: DateTime<Utc>, tz: Tz) -> Vec<WeekBucket> {
    const WEEKS: u32 = 7;
    let today = local_date(now, tz);

    let mut out = Vec::with_capacity(WEEKS as usize);
    for weeks_ago in (0..WEEKS).rev() {
        let start = today - Duration::days(7 * weeks_ago as i64);
        let end = start + Duration::days(7);

        let completed = tasks
            .iter()
            .filter(|t| {
                t.completed
                    && t.completed_at
                        .map(|at| {
                            let d = local_date(at, tz);
                            d >= start && d < end
                        })
                        .unwrap_or(false)
            })
            .count();

        out.push(WeekBucket {
            weeks_ago,
            completed,
        });
    }

    out
}
