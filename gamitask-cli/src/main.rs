use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use gamitask_core::{
    Category, CompletionFilter, Emotion, FilterSpec, Priority, SortKey, Task, TaskDraft, TaskPatch,
    TaskReward, calculate_level, complete_task, create_task, delete_task, filter_and_sort,
    is_overdue, record_emotion, reorder_tasks, task_stats, toggle_complete, unlocked_badges,
    update_task, weekly_completions,
};

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "gamitask", version, about = "Gamified to-do list: earn exp, keep your streak alive")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task
    Add {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// high | medium | low (default: medium)
        #[arg(long)]
        priority: Option<String>,

        /// work | personal | study (default: personal)
        #[arg(long)]
        category: Option<String>,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Estimated minutes
        #[arg(long)]
        estimate: Option<u32>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks, optionally filtered and sorted
    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// all | active | completed (default: all)
        #[arg(long, default_value = "all")]
        status: String,

        /// Case-insensitive match against title, description, and tags
        #[arg(long)]
        search: Option<String>,

        /// Required tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// priority | due | created | custom (default: custom)
        #[arg(long, default_value = "custom")]
        sort: String,
    },

    /// Complete a task and collect the reward
    Done {
        id: String,

        /// Emotion to record: an emoji or its name (happy, cool, pumped,
        /// tired, frustrated, thoughtful, celebrating, relieved)
        #[arg(long)]
        emotion: Option<String>,
    },

    /// Revert a completed task to active (exp is not refunded)
    Undo { id: String },

    /// Edit fields of a task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        clear_due: bool,

        #[arg(long)]
        estimate: Option<u32>,

        #[arg(long)]
        clear_estimate: bool,

        /// Replace the tag set (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a task
    Rm { id: String },

    /// Re-key manual ordering: list every task id (or unique prefix) in the
    /// desired order
    Reorder { ids: Vec<String> },

    /// Statistics dashboard: totals, breakdowns, weekly trend, badges
    Stats,

    /// Level, exp progress, and streak
    Status,

    /// Delete all tasks and progression data
    Reset {
        /// Confirm: this cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Config management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the active config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let tz = cfg.tz()?;

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            category,
            due,
            estimate,
            tags,
        } => {
            let draft = TaskDraft {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                due_date: due.as_deref().map(parse_due).transpose()?,
                estimated_minutes: estimate,
                tags,
            };
            match create_task(draft, Utc::now()) {
                Some(task) => {
                    let mut tasks = state::load_tasks()?;
                    tasks.push(task.clone());
                    state::save_tasks(&tasks)?;
                    println!("Added [{}] {}", short_id(&task.id), task.title);
                }
                None => println!("Title must not be blank; nothing added."),
            }
        }

        Command::List {
            category,
            priority,
            status,
            search,
            tags,
            sort,
        } => {
            let spec = FilterSpec {
                category: category.as_deref().map(parse_category).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                completed: parse_status(&status)?,
                search_query: search.unwrap_or_default(),
                tags,
            };
            let key = parse_sort(&sort)?;

            let tasks = state::load_tasks()?;
            let shown = filter_and_sort(&tasks, &spec, key);
            if shown.is_empty() {
                println!("No tasks.");
            }
            let now = Utc::now();
            for t in &shown {
                print_task_line(t, now, tz);
            }
        }

        Command::Done { id, emotion } => {
            let emotion = emotion.as_deref().map(parse_emotion).transpose()?;
            let tasks = state::load_tasks()?;
            let Some(idx) = resolve(&tasks, &id) else {
                println!("No task matching '{id}'.");
                return Ok(());
            };
            if tasks[idx].completed {
                println!("Already completed: {}", tasks[idx].title);
                return Ok(());
            }

            let now = Utc::now();
            let task_id = tasks[idx].id.clone();
            let mut tasks = toggle_complete(&tasks, &task_id, now);
            if let Some(e) = emotion {
                tasks = record_emotion(&tasks, &task_id, e);
            }

            let user = state::load_user()?;
            let (user, reward) = complete_task(&user, &tasks[idx], now, tz);
            state::save_tasks(&tasks)?;
            state::save_user(&user)?;
            print_reward(&tasks[idx], &reward);
        }

        Command::Undo { id } => {
            let tasks = state::load_tasks()?;
            let Some(idx) = resolve(&tasks, &id) else {
                println!("No task matching '{id}'.");
                return Ok(());
            };
            if !tasks[idx].completed {
                println!("Not completed: {}", tasks[idx].title);
                return Ok(());
            }
            let task_id = tasks[idx].id.clone();
            let tasks = toggle_complete(&tasks, &task_id, Utc::now());
            state::save_tasks(&tasks)?;
            println!("Reverted to active: {} (exp is kept)", tasks[idx].title);
        }

        Command::Edit {
            id,
            title,
            description,
            clear_description,
            priority,
            category,
            due,
            clear_due,
            estimate,
            clear_estimate,
            tags,
        } => {
            let tasks = state::load_tasks()?;
            let Some(idx) = resolve(&tasks, &id) else {
                println!("No task matching '{id}'.");
                return Ok(());
            };
            let patch = TaskPatch {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                due_date: due.as_deref().map(parse_due).transpose()?,
                estimated_minutes: estimate,
                tags: (!tags.is_empty()).then_some(tags),
                clear_description,
                clear_due_date: clear_due,
                clear_estimate,
            };
            let task_id = tasks[idx].id.clone();
            let tasks = update_task(&tasks, &task_id, &patch);
            state::save_tasks(&tasks)?;
            println!("Updated [{}] {}", short_id(&task_id), tasks[idx].title);
        }

        Command::Rm { id } => {
            let tasks = state::load_tasks()?;
            let Some(idx) = resolve(&tasks, &id) else {
                println!("No task matching '{id}'.");
                return Ok(());
            };
            let title = tasks[idx].title.clone();
            let task_id = tasks[idx].id.clone();
            let tasks = delete_task(&tasks, &task_id);
            state::save_tasks(&tasks)?;
            println!("Deleted: {title}");
        }

        Command::Reorder { ids } => {
            let tasks = state::load_tasks()?;
            let mut resolved = Vec::with_capacity(ids.len());
            for id in &ids {
                let Some(idx) = resolve(&tasks, id) else {
                    println!("No task matching '{id}'.");
                    return Ok(());
                };
                resolved.push(tasks[idx].id.clone());
            }
            let reordered = reorder_tasks(&tasks, &resolved, Utc::now());
            if reordered == tasks {
                println!("Reorder must list every task exactly once ({} tasks).", tasks.len());
                return Ok(());
            }
            state::save_tasks(&reordered)?;
            println!("Reordered {} tasks.", reordered.len());
        }

        Command::Stats => {
            let tasks = state::load_tasks()?;
            let user = state::load_user()?;
            print_stats(&tasks, &user, tz);
        }

        Command::Status => {
            let user = state::load_user()?;
            print_status(&user);
        }

        Command::Reset { yes } => {
            if !yes {
                println!("This deletes all tasks and progression. Re-run with --yes to confirm.");
                return Ok(());
            }
            state::reset_all()?;
            println!("All data reset.");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("timezone = {}", cfg.timezone);
            }
        },
    }

    Ok(())
}

/// Match a task by full id or unique prefix.
fn resolve(tasks: &[Task], id: &str) -> Option<usize> {
    if let Some(i) = tasks.iter().position(|t| t.id == id) {
        return Some(i);
    }
    let mut hits = tasks.iter().enumerate().filter(|(_, t)| t.id.starts_with(id));
    match (hits.next(), hits.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn parse_priority(s: &str) -> Result<Priority> {
    match s {
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        _ => bail!("invalid priority '{s}' (expected high, medium, or low)"),
    }
}

fn parse_category(s: &str) -> Result<Category> {
    match s {
        "work" => Ok(Category::Work),
        "personal" => Ok(Category::Personal),
        "study" => Ok(Category::Study),
        _ => bail!("invalid category '{s}' (expected work, personal, or study)"),
    }
}

fn parse_status(s: &str) -> Result<CompletionFilter> {
    match s {
        "all" => Ok(CompletionFilter::All),
        "active" => Ok(CompletionFilter::Active),
        "completed" => Ok(CompletionFilter::Completed),
        _ => bail!("invalid status '{s}' (expected all, active, or completed)"),
    }
}

fn parse_sort(s: &str) -> Result<SortKey> {
    match s {
        "priority" => Ok(SortKey::Priority),
        "due" => Ok(SortKey::DueDate),
        "created" => Ok(SortKey::CreatedAt),
        "custom" => Ok(SortKey::Custom),
        _ => bail!("invalid sort '{s}' (expected priority, due, created, or custom)"),
    }
}

fn parse_emotion(s: &str) -> Result<Emotion> {
    if let Some(e) = Emotion::from_emoji(s) {
        return Ok(e);
    }
    match s {
        "happy" => Ok(Emotion::Happy),
        "cool" => Ok(Emotion::Cool),
        "pumped" => Ok(Emotion::Pumped),
        "tired" => Ok(Emotion::Tired),
        "frustrated" => Ok(Emotion::Frustrated),
        "thoughtful" => Ok(Emotion::Thoughtful),
        "celebrating" => Ok(Emotion::Celebrating),
        "relieved" => Ok(Emotion::Relieved),
        _ => bail!("unknown emotion '{s}'"),
    }
}

fn parse_due(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e} (expected YYYY-MM-DD)"))
}

fn priority_marker(p: Priority) -> &'static str {
    match p {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

fn print_task_line(t: &Task, now: chrono::DateTime<Utc>, tz: Tz) {
    let check = if t.completed { "x" } else { " " };
    let mut line = format!(
        "[{check}] {} {} {}",
        priority_marker(t.priority),
        short_id(&t.id),
        t.title
    );
    if let Some(due) = t.due_date {
        if is_overdue(t, now, tz) {
            line.push_str(&format!(" (due {due}, OVERDUE)"));
        } else {
            line.push_str(&format!(" (due {due})"));
        }
    }
    if let Some(m) = t.estimated_minutes {
        line.push_str(&format!(" ~{m}m"));
    }
    for tag in &t.tags {
        line.push_str(&format!(" #{tag}"));
    }
    if let Some(e) = t.emotion {
        line.push(' ');
        line.push_str(e.emoji());
    }
    println!("{line}");
}

fn print_reward(task: &Task, reward: &TaskReward) {
    println!("✔ Completed: {}", task.title);
    println!("+{} exp (base {})", reward.total_exp, reward.base_exp);
    for reason in &reward.bonus_reasons {
        println!("  • {reason}");
    }
    if let Some(level) = reward.new_level {
        println!("🎉 Level up! You are now level {level}.");
    }
    if let Some(streak) = reward.new_streak {
        println!("🔥 Streak: {streak} day(s).");
    }
}

fn print_status(user: &gamitask_core::User) {
    let info = calculate_level(user.exp);
    let pct = info.progress_percent();
    let filled = (pct as usize * 20) / 100;
    let bar: String = "#".repeat(filled) + &"-".repeat(20 - filled);

    println!("Level {}  [{bar}] {pct}%", info.level);
    println!(
        "Exp: {} total ({}/{} into this level)",
        user.exp, info.current_level_exp, info.exp_for_next
    );
    println!("Streak: {} day(s) (best: {})", user.streak, user.max_streak);
    println!("Completed: {} task(s) lifetime", user.total_completed);
}

fn print_stats(tasks: &[Task], user: &gamitask_core::User, tz: Tz) {
    let stats = task_stats(tasks);
    println!("Tasks: {} total, {} active, {} completed ({}%)",
        stats.total, stats.active, stats.completed, stats.completion_rate);
    println!(
        "Priority: {} high / {} medium / {} low",
        stats.high_priority, stats.medium_priority, stats.low_priority
    );
    println!(
        "Category: {} work / {} personal / {} study",
        stats.work, stats.personal, stats.study
    );

    println!("\nWeekly completions:");
    for bucket in weekly_completions(tasks, Utc::now(), tz) {
        let label = match bucket.weeks_ago {
            0 => "this week".to_string(),
            n => format!("{n}w ago"),
        };
        println!("  {label:>9}  {}", "▇".repeat(bucket.completed));
    }

    let emotions = gamitask_core::emotion_counts(tasks);
    if !emotions.is_empty() {
        println!("\nEmotions:");
        for (e, count) in emotions {
            println!("  {} x{count}", e.emoji());
        }
    }

    let badges = unlocked_badges(user);
    if badges.is_empty() {
        println!("\nNo badges yet — complete a task to earn your first.");
    } else {
        println!("\nBadges:");
        for b in badges {
            println!("  🏆 {} — {}", b.name, b.description);
        }
    }
}
