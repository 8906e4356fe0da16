use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use serde::Serialize;

use crate::cli::{AddArgs, CliCommand, DeleteArgs, DoneArgs, ListArgs};
use crate::config::AppConfig;
use crate::core::prompt::TaskSubmission;
use crate::countdown::{evaluate, parse_deadline};
use crate::manager::TaskManager;
use crate::store::{SqliteStore, TaskStore};

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Add(args) => handle_add(config, &args, &mut writer),
        CliCommand::List(args) => handle_list(config, &args, &mut writer),
        CliCommand::Done(args) => handle_done(config, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(config, &args, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

fn handle_add<W: Write>(config: &AppConfig, args: &AddArgs, mut writer: W) -> Result<()> {
    let deadline = parse_deadline(&args.due)?;

    let store = SqliteStore::open(config)?;
    let mut manager = TaskManager::new(store);
    let now = Utc::now();
    manager.load(now)?;

    let submission = TaskSubmission::new(args.text.join(" "), deadline.to_rfc3339());
    let task = manager.add(submission, now)?;

    writeln!(
        writer,
        "Added '{}' (due {})",
        task.text,
        deadline.with_timezone(&Local).format("%a, %d %b %Y %H:%M")
    )?;
    writeln!(writer, "  id: {}", task.id)?;
    Ok(())
}

#[derive(Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    text: &'a str,
    completed: bool,
    deadline: &'a str,
    bucket: &'a str,
    remaining: String,
}

fn handle_list<W: Write>(config: &AppConfig, args: &ListArgs, mut writer: W) -> Result<()> {
    let store = SqliteStore::open(config)?;
    let tasks = store.list_all()?;
    let now = Utc::now();

    let mut entries: Vec<ListEntry<'_>> = Vec::new();
    for task in &tasks {
        let status = evaluate(task, now);
        if let Some(bucket) = args.bucket {
            if status.bucket() != bucket {
                continue;
            }
        }
        entries.push(ListEntry {
            id: &task.id,
            text: &task.text,
            completed: task.completed,
            deadline: &task.deadline,
            bucket: status.bucket().as_str(),
            remaining: status.to_string(),
        });
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&entries)?;
        writeln!(writer, "{rendered}")?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No tasks to show")?;
        return Ok(());
    }

    for entry in &entries {
        writeln!(
            writer,
            "{}  {:<16}  {}",
            entry.id, entry.remaining, entry.text
        )?;
    }
    Ok(())
}

fn handle_done<W: Write>(config: &AppConfig, args: &DoneArgs, mut writer: W) -> Result<()> {
    let store = SqliteStore::open(config)?;
    let mut manager = TaskManager::new(store);
    let now = Utc::now();
    manager.load(now)?;

    let mut completed = 0usize;
    let mut missing = Vec::new();
    for id in &args.ids {
        if manager.get(id).is_none() {
            missing.push(id.clone());
            continue;
        }
        manager.mark_complete(id, now)?;
        completed += 1;
    }

    writeln!(writer, "{}", SummaryLine::completed(completed))?;
    if !missing.is_empty() {
        writeln!(writer, "Not found: {}", missing.join(", "))?;
    }
    Ok(())
}

fn handle_delete<W: Write>(config: &AppConfig, args: &DeleteArgs, mut writer: W) -> Result<()> {
    let store = SqliteStore::open(config)?;
    let mut manager = TaskManager::new(store);
    let now = Utc::now();
    manager.load(now)?;

    let mut deleted = 0usize;
    let mut missing = Vec::new();
    for id in &args.ids {
        if manager.get(id).is_none() {
            missing.push(id.clone());
            continue;
        }
        manager.delete(id, now)?;
        deleted += 1;
    }

    writeln!(writer, "{}", SummaryLine::deleted(deleted))?;
    if !missing.is_empty() {
        writeln!(writer, "Not found: {}", missing.join(", "))?;
    }
    Ok(())
}

enum SummaryLine {
    Completed(usize),
    NoneCompleted,
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn completed(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Completed(count)
        } else {
            SummaryLine::NoneCompleted
        }
    }

    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Completed(count) => {
                write!(
                    f,
                    "Completed {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneCompleted => write!(f, "No tasks completed"),
            SummaryLine::Deleted(count) => {
                write!(
                    f,
                    "Deleted {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneDeleted => write!(f, "No tasks deleted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let data_dir = dir.path().to_path_buf();
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        let config = AppConfig::from_data_dir(data_dir).expect("config");
        (config, dir)
    }

    fn seed_task(config: &AppConfig, text: &str, deadline: &str) -> String {
        let store = SqliteStore::open(config).expect("open store");
        store.create(text, deadline).expect("create task").id
    }

    fn run(config: &AppConfig, command: CliCommand) -> String {
        let mut output = Vec::new();
        execute(config, command, &mut output).expect("execute command");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn add_command_persists_a_task() {
        let (config, _dir) = temp_config();

        let args = AddArgs {
            text: vec!["Ship".into(), "the".into(), "report".into()],
            due: "2031-03-01T17:00:00Z".into(),
        };
        let output = run(&config, CliCommand::Add(args));

        assert!(output.contains("Added 'Ship the report'"));
        assert!(output.contains("id: "));

        let store = SqliteStore::open(&config).expect("open store");
        let tasks = store.list_all().expect("list");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Ship the report");
        assert!(!tasks[0].completed);
        assert!(parse_deadline(&tasks[0].deadline).is_ok());
    }

    #[test]
    fn add_command_rejects_bad_deadlines() {
        let (config, _dir) = temp_config();

        let args = AddArgs {
            text: vec!["Ship".into()],
            due: "soonish".into(),
        };
        let mut output = Vec::new();
        let result = execute(&config, CliCommand::Add(args), &mut output);

        assert!(result.is_err());
        let store = SqliteStore::open(&config).expect("open store");
        assert!(store.list_all().expect("list").is_empty());
    }

    #[test]
    fn list_command_renders_countdowns_and_filters() {
        let (config, _dir) = temp_config();
        seed_task(&config, "Future task", "2031-03-01T17:00:00Z");
        seed_task(&config, "Past task", "2020-01-01T00:00:00Z");

        let all = run(
            &config,
            CliCommand::List(ListArgs {
                bucket: None,
                json: false,
            }),
        );
        assert!(all.contains("Future task"));
        assert!(all.contains("Past task"));
        assert!(all.contains("time's up!"));

        let expired = run(
            &config,
            CliCommand::List(ListArgs {
                bucket: Some(crate::model::StatusBucket::Expired),
                json: false,
            }),
        );
        assert!(expired.contains("Past task"));
        assert!(!expired.contains("Future task"));
    }

    #[test]
    fn list_command_emits_json() {
        let (config, _dir) = temp_config();
        seed_task(&config, "Past task", "2020-01-01T00:00:00Z");

        let output = run(
            &config,
            CliCommand::List(ListArgs {
                bucket: None,
                json: true,
            }),
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(parsed[0]["text"], "Past task");
        assert_eq!(parsed[0]["bucket"], "expired");
        assert_eq!(parsed[0]["remaining"], "time's up!");
        assert_eq!(parsed[0]["completed"], false);
    }

    #[test]
    fn list_command_handles_empty_stores() {
        let (config, _dir) = temp_config();
        let output = run(
            &config,
            CliCommand::List(ListArgs {
                bucket: None,
                json: false,
            }),
        );
        assert!(output.contains("No tasks to show"));
    }

    #[test]
    fn done_command_reports_completed_and_missing() {
        let (config, _dir) = temp_config();
        let task_id = seed_task(&config, "Finish me", "2031-03-01T17:00:00Z");

        let output = run(
            &config,
            CliCommand::Done(DoneArgs {
                ids: vec![task_id.clone(), "missing".into()],
            }),
        );

        assert!(output.contains("Completed 1 task"));
        assert!(output.contains("Not found: missing"));

        let store = SqliteStore::open(&config).expect("open store");
        assert!(store.list_all().expect("list")[0].completed);
    }

    #[test]
    fn delete_command_reports_deleted_and_missing() {
        let (config, _dir) = temp_config();
        let task_id = seed_task(&config, "Remove me", "2031-03-01T17:00:00Z");

        let output = run(
            &config,
            CliCommand::Delete(DeleteArgs {
                ids: vec![task_id.clone(), "missing".into()],
            }),
        );

        assert!(output.contains("Deleted 1 task"));
        assert!(output.contains("Not found: missing"));

        let store = SqliteStore::open(&config).expect("open store");
        assert!(store.list_all().expect("list").is_empty());
    }

    #[test]
    fn delete_command_handles_no_matches() {
        let (config, _dir) = temp_config();

        let output = run(
            &config,
            CliCommand::Delete(DeleteArgs {
                ids: vec!["missing".into()],
            }),
        );

        assert!(output.contains("No tasks deleted"));
    }
}
