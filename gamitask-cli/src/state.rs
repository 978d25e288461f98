//! Persisted state: two JSON blobs under ~/.gamitask.
//!
//! Loads never fail the program: a missing or malformed blob is reported on
//! stderr and replaced by the default value. Saves propagate errors with
//! context.

use anyhow::{Context, Result};
use gamitask_core::{Task, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub fn gamitask_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".gamitask"))
}

pub fn ensure_gamitask_home() -> Result<PathBuf> {
    let dir = gamitask_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn tasks_path() -> Result<PathBuf> {
    Ok(ensure_gamitask_home()?.join("tasks.json"))
}

pub fn user_path() -> Result<PathBuf> {
    Ok(ensure_gamitask_home()?.join("user.json"))
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str(&s) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("warning: {} is malformed ({e}); starting fresh", path.display());
                T::default()
            }
        },
        Err(e) => {
            eprintln!("warning: could not read {} ({e}); starting fresh", path.display());
            T::default()
        }
    }
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn load_tasks() -> Result<Vec<Task>> {
    Ok(load_or_default(&tasks_path()?))
}

pub fn save_tasks(tasks: &[Task]) -> Result<()> {
    save_json(&tasks_path()?, &tasks)
}

pub fn load_user() -> Result<User> {
    Ok(load_or_default(&user_path()?))
}

pub fn save_user(user: &User) -> Result<()> {
    save_json(&user_path()?, user)
}

/// Full reset: both blobs go at once, state returns to the defaults.
pub fn reset_all() -> Result<()> {
    for path in [tasks_path()?, user_path()?] {
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
    }
    Ok(())
}
