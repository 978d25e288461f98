//! Gamification engine: exp rewards, level derivation, daily streaks.
//!
//! Everything here is a pure function of its inputs; the completion instant
//! and timezone are passed in so the calendar-day logic stays testable.
//!
//! Level is never an independent counter. It is always derived from
//! cumulative exp: advancing from level L to L+1 costs `L * 500`, so the
//! cumulative threshold to reach level L is `500 * (L-1) * L / 2`. The
//! stored `User.level` is rewritten from the derivation on every mutation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};
use crate::time::{local_date, on_time};

pub const BASE_EXP: u64 = 50;
pub const HIGH_PRIORITY_BONUS: u64 = 30;
pub const MEDIUM_PRIORITY_BONUS: u64 = 15;
pub const ON_TIME_BONUS: u64 = 20;
pub const BIG_TASK_BONUS: u64 = 25;
/// Estimated minutes at or above which the big-task bonus applies.
pub const BIG_TASK_MINUTES: u32 = 120;

/// The per-installation progression record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub level: u32,
    pub exp: u64,
    pub streak: u32,
    pub max_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    pub total_completed: u64,
}

impl Default for User {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            streak: 0,
            max_streak: 0,
            last_completed_date: None,
            total_completed: 0,
        }
    }
}

/// One completion event's reward, reported once and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReward {
    pub base_exp: u64,
    pub bonus_exp: u64,
    pub total_exp: u64,
    pub bonus_reasons: Vec<String>,
    pub leveled_up: bool,
    pub new_level: Option<u32>,
    pub streak_increased: bool,
    pub new_streak: Option<u32>,
}

/// Level derived from cumulative exp, plus where the user sits inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    /// Exp needed to go from this level to the next.
    pub exp_for_next: u64,
    /// Exp accumulated within the current level.
    pub current_level_exp: u64,
}

impl LevelInfo {
    /// Display progress toward the next level, 0-100.
    pub fn progress_percent(&self) -> u32 {
        ((self.current_level_exp as f64 / self.exp_for_next as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone)]
pub struct ExpGain {
    pub user: User,
    pub leveled_up: bool,
    pub new_level: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct StreakUpdate {
    pub user: User,
    pub increased: bool,
    pub streak: u32,
}

/// Exp required to advance from `level` to `level + 1`.
pub fn exp_for_next_level(level: u32) -> u64 {
    level as u64 * 500
}

/// Derive level from cumulative exp by consuming each level's requirement
/// in turn.
pub fn calculate_level(exp: u64) -> LevelInfo {
    let mut level = 1u32;
    let mut consumed = 0u64;
    let mut for_next = exp_for_next_level(level);

    while exp >= consumed + for_next {
        consumed += for_next;
        level += 1;
        for_next = exp_for_next_level(level);
    }

    LevelInfo {
        level,
        exp_for_next: for_next,
        current_level_exp: exp - consumed,
    }
}

/// Compute the reward for completing `task` at instant `now`.
///
/// Level-up and streak fields are left unset here; `complete_task` merges
/// them in after applying the exp and streak updates.
pub fn calculate_reward(task: &Task, now: DateTime<Utc>, tz: Tz) -> TaskReward {
    let mut bonus_exp = 0u64;
    let mut bonus_reasons = Vec::new();

    match task.priority {
        Priority::High => {
            bonus_exp += HIGH_PRIORITY_BONUS;
            bonus_reasons.push(format!("high priority +{HIGH_PRIORITY_BONUS}"));
        }
        Priority::Medium => {
            bonus_exp += MEDIUM_PRIORITY_BONUS;
            bonus_reasons.push(format!("medium priority +{MEDIUM_PRIORITY_BONUS}"));
        }
        Priority::Low => {}
    }

    if let Some(due) = task.due_date {
        if on_time(due, now, tz) {
            bonus_exp += ON_TIME_BONUS;
            bonus_reasons.push(format!("completed on time +{ON_TIME_BONUS}"));
        }
    }

    if task.estimated_minutes.is_some_and(|m| m >= BIG_TASK_MINUTES) {
        bonus_exp += BIG_TASK_BONUS;
        bonus_reasons.push(format!("big task done +{BIG_TASK_BONUS}"));
    }

    TaskReward {
        base_exp: BASE_EXP,
        bonus_exp,
        total_exp: BASE_EXP + bonus_exp,
        bonus_reasons,
        leveled_up: false,
        new_level: None,
        streak_increased: false,
        new_streak: None,
    }
}

/// Add exp to the user, re-deriving level before and after.
pub fn add_exp(user: &User, gained: u64) -> ExpGain {
    let old_level = calculate_level(user.exp).level;
    let exp = user.exp + gained;
    let new_level = calculate_level(exp).level;
    let leveled_up = new_level > old_level;

    let mut user = user.clone();
    user.exp = exp;
    user.level = new_level;

    ExpGain {
        user,
        leveled_up,
        new_level: leveled_up.then_some(new_level),
    }
}

/// Update the daily completion streak for a completion happening on `today`.
///
/// A second completion on the same calendar day is a bookkeeping no-op: the
/// user comes back untouched, including `total_completed` and
/// `last_completed_date`. Completing the day after the last completion
/// extends the streak; anything else (first completion ever, or a gap)
/// resets it to 1.
pub fn update_streak(user: &User, today: NaiveDate) -> StreakUpdate {
    if user.last_completed_date == Some(today) {
        return StreakUpdate {
            user: user.clone(),
            increased: false,
            streak: user.streak,
        };
    }

    let yesterday = today - Duration::days(1);
    let streak = if user.last_completed_date == Some(yesterday) {
        user.streak + 1
    } else {
        1
    };

    let mut user = user.clone();
    user.streak = streak;
    user.max_streak = user.max_streak.max(streak);
    user.last_completed_date = Some(today);
    user.total_completed += 1;

    StreakUpdate {
        user,
        increased: true,
        streak,
    }
}

/// Single entry point for a false-to-true completion transition:
/// reward -> exp -> streak, merged into one report.
pub fn complete_task(user: &User, task: &Task, now: DateTime<Utc>, tz: Tz) -> (User, TaskReward) {
    let mut reward = calculate_reward(task, now, tz);

    let gain = add_exp(user, reward.total_exp);
    let streak = update_streak(&gain.user, local_date(now, tz));

    reward.leveled_up = gain.leveled_up;
    reward.new_level = gain.new_level;
    reward.streak_increased = streak.increased;
    reward.new_streak = streak.increased.then_some(streak.streak);

    (streak.user, reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(calculate_level(0).level, 1);
        assert_eq!(calculate_level(499).level, 1);
        assert_eq!(calculate_level(500).level, 2);
        assert_eq!(calculate_level(1499).level, 2);
        assert_eq!(calculate_level(1500).level, 3);
    }

    #[test]
    fn level_info_tracks_remainder() {
        let info = calculate_level(700);
        assert_eq!(info.level, 2);
        assert_eq!(info.exp_for_next, 1000);
        assert_eq!(info.current_level_exp, 200);
        assert_eq!(info.progress_percent(), 20);
    }

    #[test]
    fn cumulative_threshold_formula_holds() {
        // Reaching level L costs 500 * (L-1) * L / 2 in total.
        for level in 1u64..=12 {
            let threshold = 500 * (level - 1) * level / 2;
            assert_eq!(calculate_level(threshold).level as u64, level);
            if threshold > 0 {
                assert_eq!(calculate_level(threshold - 1).level as u64, level - 1);
            }
        }
    }

    #[test]
    fn reward_base_only_for_low_priority() {
        let task = Task::new("t", "x", noon()).with_priority(Priority::Low);
        let r = calculate_reward(&task, noon(), UTC);
        assert_eq!(r.base_exp, 50);
        assert_eq!(r.bonus_exp, 0);
        assert_eq!(r.total_exp, 50);
        assert!(r.bonus_reasons.is_empty());
    }

    #[test]
    fn reward_stacks_all_bonuses() {
        let task = Task::new("t", "x", noon())
            .with_priority(Priority::High)
            .with_due_date(date(2026, 8, 31))
            .with_estimate(180);
        let r = calculate_reward(&task, noon(), UTC);
        assert_eq!(r.bonus_exp, 30 + 20 + 25);
        assert_eq!(r.total_exp, 125);
        assert_eq!(r.bonus_reasons.len(), 3);
    }

    #[test]
    fn on_time_bonus_respects_end_of_day() {
        let due = date(2026, 8, 30);
        let task = Task::new("t", "x", noon())
            .with_priority(Priority::Low)
            .with_due_date(due);

        // Same day, late evening: still on time.
        let evening = Utc.with_ymd_and_hms(2026, 8, 30, 23, 50, 0).unwrap();
        assert_eq!(calculate_reward(&task, evening, UTC).bonus_exp, 20);

        // Next day: bonus gone.
        let next = Utc.with_ymd_and_hms(2026, 8, 31, 0, 10, 0).unwrap();
        assert_eq!(calculate_reward(&task, next, UTC).bonus_exp, 0);
    }

    #[test]
    fn big_task_bonus_needs_two_hours() {
        let short = Task::new("t", "x", noon())
            .with_priority(Priority::Low)
            .with_estimate(119);
        assert_eq!(calculate_reward(&short, noon(), UTC).bonus_exp, 0);

        let long = Task::new("t", "x", noon())
            .with_priority(Priority::Low)
            .with_estimate(120);
        assert_eq!(calculate_reward(&long, noon(), UTC).bonus_exp, 25);
    }

    #[test]
    fn add_exp_detects_level_up() {
        let user = User {
            exp: 480,
            ..User::default()
        };
        let gain = add_exp(&user, 30);
        assert!(gain.leveled_up);
        assert_eq!(gain.new_level, Some(2));
        assert_eq!(gain.user.level, 2);
        assert_eq!(gain.user.exp, 510);

        let no_gain = add_exp(&gain.user, 10);
        assert!(!no_gain.leveled_up);
        assert_eq!(no_gain.new_level, None);
    }

    #[test]
    fn first_completion_starts_streak_at_one() {
        let update = update_streak(&User::default(), date(2026, 8, 30));
        assert!(update.increased);
        assert_eq!(update.user.streak, 1);
        assert_eq!(update.user.max_streak, 1);
        assert_eq!(update.user.total_completed, 1);
        assert_eq!(update.user.last_completed_date, Some(date(2026, 8, 30)));
    }

    #[test]
    fn same_day_completion_changes_nothing() {
        let user = User {
            streak: 3,
            max_streak: 5,
            last_completed_date: Some(date(2026, 8, 30)),
            total_completed: 9,
            ..User::default()
        };
        let update = update_streak(&user, date(2026, 8, 30));
        assert!(!update.increased);
        assert_eq!(update.user, user);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let user = User {
            streak: 3,
            max_streak: 3,
            last_completed_date: Some(date(2026, 8, 29)),
            total_completed: 7,
            ..User::default()
        };
        let update = update_streak(&user, date(2026, 8, 30));
        assert!(update.increased);
        assert_eq!(update.user.streak, 4);
        assert_eq!(update.user.max_streak, 4);
        assert_eq!(update.user.total_completed, 8);
    }

    #[test]
    fn gap_resets_streak_but_keeps_max() {
        let user = User {
            streak: 4,
            max_streak: 4,
            last_completed_date: Some(date(2026, 8, 25)),
            total_completed: 10,
            ..User::default()
        };
        let update = update_streak(&user, date(2026, 8, 30));
        assert!(update.increased);
        assert_eq!(update.user.streak, 1);
        assert_eq!(update.user.max_streak, 4);
    }

    #[test]
    fn complete_task_first_ever_high_priority() {
        let user = User::default();
        let task = Task::new("t", "x", noon()).with_priority(Priority::High);

        let (user, reward) = complete_task(&user, &task, noon(), UTC);

        assert_eq!(reward.base_exp, 50);
        assert_eq!(reward.bonus_exp, 30);
        assert_eq!(reward.total_exp, 80);
        assert!(!reward.leveled_up);
        assert!(reward.streak_increased);
        assert_eq!(reward.new_streak, Some(1));

        assert_eq!(user.exp, 80);
        assert_eq!(user.level, 1);
        assert_eq!(user.streak, 1);
        assert_eq!(user.max_streak, 1);
        assert_eq!(user.total_completed, 1);
        assert_eq!(user.last_completed_date, Some(date(2026, 8, 30)));
    }

    #[test]
    fn same_day_double_completion_accumulates_exp_only() {
        let task = Task::new("t", "x", noon()).with_priority(Priority::Low);
        let (after_first, _) = complete_task(&User::default(), &task, noon(), UTC);
        let (after_second, reward) = complete_task(&after_first, &task, noon(), UTC);

        assert_eq!(after_second.exp, after_first.exp + 50);
        assert!(!reward.streak_increased);
        assert_eq!(reward.new_streak, None);
        assert_eq!(after_second.streak, after_first.streak);
        assert_eq!(after_second.max_streak, after_first.max_streak);
        assert_eq!(after_second.total_completed, after_first.total_completed);
        assert_eq!(
            after_second.last_completed_date,
            after_first.last_completed_date
        );
    }

    #[test]
    fn complete_task_reports_level_up() {
        let user = User {
            exp: 450,
            ..User::default()
        };
        let task = Task::new("t", "x", noon()).with_priority(Priority::High);
        let (user, reward) = complete_task(&user, &task, noon(), UTC);
        assert!(reward.leveled_up);
        assert_eq!(reward.new_level, Some(2));
        assert_eq!(user.level, 2);
        assert_eq!(user.exp, 530);
    }
}
