//! gamitask-core: task model, collection transforms, and the gamification
//! engine behind the GamiTask CLI.

pub mod achievements;
pub mod filter;
pub mod gamification;
pub mod ops;
pub mod stats;
pub mod task;
pub mod time;

pub use achievements::{Badge, evaluate as evaluate_badges, unlocked as unlocked_badges};
pub use filter::{
    CompletionFilter, FilterSpec, SortKey, filter_and_sort, filter_tasks, move_completed_to_bottom,
    sort_by_created_at, sort_by_custom_order, sort_by_due_date, sort_by_priority, sort_tasks,
};
pub use gamification::{
    ExpGain, LevelInfo, StreakUpdate, TaskReward, User, add_exp, calculate_level, calculate_reward,
    complete_task, exp_for_next_level, update_streak,
};
pub use ops::{
    TaskDraft, TaskPatch, create_task, delete_task, record_emotion, reorder_tasks, toggle_complete,
    update_task,
};
pub use stats::{TaskStats, WeekBucket, emotion_counts, task_stats, weekly_completions};
pub use task::{Category, Emotion, Priority, Task};
pub use time::{is_overdue, local_date};
