use crate::planner::TripPlan;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

fn planner_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".trip-planner")
}

/// Default location of saved plans.
pub fn history_dir() -> PathBuf {
    planner_dir().join("history")
}

/// "New Delhi, India" → "new-delhi-india"
fn slug(s: &str) -> String {
    let mut out = String::new();
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "trip".into()
    } else {
        trimmed.to_string()
    }
}

pub fn save_plan(plan: &TripPlan) -> Result<PathBuf> {
    save_plan_in(&history_dir(), plan)
}

/// Never overwrites: a name already taken gets a `.N` after the timestamp,
/// which still sorts after the first file saved in that millisecond.
pub fn save_plan_in(dir: &Path, plan: &TripPlan) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create history dir {}", dir.display()))?;
    let stamp = plan.generated_at.format("%Y%m%dT%H%M%S%3f").to_string();
    let name = slug(&plan.request.destination);
    let json = serde_json::to_string_pretty(plan)?;

    for n in 0u32.. {
        let filename = if n == 0 {
            format!("{stamp}-{name}.json")
        } else {
            format!("{stamp}.{n}-{name}.json")
        };
        let path = dir.join(filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes())
                    .with_context(|| format!("write {}", path.display()))?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e).with_context(|| format!("create {}", path.display())),
        }
    }
    anyhow::bail!("no free history file name in {}", dir.display())
}

pub fn load_plan(path: &Path) -> Result<TripPlan> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse plan {}", path.display()))
}

/// Saved plan files, newest first. A missing directory is an empty history.
pub fn list_plans_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    // File names start with a sortable timestamp.
    paths.sort();
    paths.reverse();
    Ok(paths)
}

pub fn list_plans() -> Result<Vec<PathBuf>> {
    list_plans_in(&history_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("New Delhi, India"), "new-delhi-india");
        assert_eq!(slug("  Goa  "), "goa");
        assert_eq!(slug("!!!"), "trip");
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_plans_in(&tmp.path().join("history")).unwrap().is_empty());
    }
}
