//! Achievement badges derived from the progression record.
//!
//! The catalog is fixed; unlock state is recomputed from the user on every
//! evaluation, never stored.

use serde::Serialize;

use crate::gamification::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

struct BadgeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    unlocked: fn(&User) -> bool,
}

const CATALOG: [BadgeDef; 9] = [
    BadgeDef {
        id: "first-step",
        name: "First Step",
        description: "Complete your first task",
        unlocked: |u| u.total_completed >= 1,
    },
    BadgeDef {
        id: "ten-done",
        name: "Getting Things Done",
        description: "Complete 10 tasks",
        unlocked: |u| u.total_completed >= 10,
    },
    BadgeDef {
        id: "fifty-done",
        name: "Task Machine",
        description: "Complete 50 tasks",
        unlocked: |u| u.total_completed >= 50,
    },
    BadgeDef {
        id: "century",
        name: "Centurion",
        description: "Complete 100 tasks",
        unlocked: |u| u.total_completed >= 100,
    },
    BadgeDef {
        id: "streak-3",
        name: "Warming Up",
        description: "Reach a 3-day streak",
        unlocked: |u| u.max_streak >= 3,
    },
    BadgeDef {
        id: "streak-7",
        name: "Full Week",
        description: "Reach a 7-day streak",
        unlocked: |u| u.max_streak >= 7,
    },
    BadgeDef {
        id: "streak-30",
        name: "Habit Formed",
        description: "Reach a 30-day streak",
        unlocked: |u| u.max_streak >= 30,
    },
    BadgeDef {
        id: "level-5",
        name: "Seasoned",
        description: "Reach level 5",
        unlocked: |u| u.level >= 5,
    },
    BadgeDef {
        id: "level-10",
        name: "Veteran",
        description: "Reach level 10",
        unlocked: |u| u.level >= 10,
    },
];

/// Evaluate the whole catalog against the user record.
pub fn evaluate(user: &User) -> Vec<Badge> {
    CATALOG
        .iter()
        .map(|def| Badge {
            id: def.id,
            name: def.name,
            description: def.description,
            unlocked: (def.unlocked)(user),
        })
        .collect()
}

/// Only the badges the user has earned.
pub fn unlocked(user: &User) -> Vec<Badge> {
    evaluate(user).into_iter().filter(|b| b.unlocked).collect()
}
