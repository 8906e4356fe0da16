use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, Context, Result};
use chrono::{prelude::*, Duration, Months};

use crate::model::{StatusBucket, Task};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Time remaining until a task's deadline, floored to whole units.
///
/// `hours` absorbs everything above the minute, so a deadline three days
/// out reads as a 72-hour countdown rather than rolling into days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Counting {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Expired,
    Done,
    Invalid,
}

impl TimeLeft {
    pub fn bucket(&self) -> StatusBucket {
        match self {
            TimeLeft::Counting { .. } => StatusBucket::Pending,
            TimeLeft::Expired => StatusBucket::Expired,
            TimeLeft::Done => StatusBucket::Done,
            TimeLeft::Invalid => StatusBucket::Invalid,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Counting {
                hours,
                minutes,
                seconds,
            } => write!(f, "{}h {}m {}s", hours, minutes, seconds),
            TimeLeft::Expired => write!(f, "time's up!"),
            TimeLeft::Done => write!(f, "done"),
            TimeLeft::Invalid => write!(f, "invalid deadline"),
        }
    }
}

/// Compute the countdown for a deadline against `now`.
///
/// A deadline at or before `now` is expired; an exact tie never shows as a
/// zero countdown.
pub fn remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let delta = (deadline - now).num_milliseconds();
    if delta <= 0 {
        return TimeLeft::Expired;
    }
    TimeLeft::Counting {
        hours: delta / MS_PER_HOUR,
        minutes: (delta % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (delta % MS_PER_MINUTE) / MS_PER_SECOND,
    }
}

/// Evaluate a task's display status. Completion wins over any deadline
/// state, and a deadline that fails to parse reports as invalid instead of
/// counting down.
pub fn evaluate(task: &Task, now: DateTime<Utc>) -> TimeLeft {
    if task.completed {
        return TimeLeft::Done;
    }
    match parse_deadline(&task.deadline) {
        Ok(deadline) => remaining(deadline, now),
        Err(_) => TimeLeft::Invalid,
    }
}

/// Per-task countdown statuses, rebuilt wholesale from the live task
/// collection. Entries never outlive a rebuild, so a removed task's status
/// vanishes with it.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    entries: HashMap<String, TimeLeft>,
}

impl StatusBoard {
    pub fn rebuild(&mut self, tasks: &[Task], now: DateTime<Utc>) {
        self.entries.clear();
        for task in tasks {
            self.entries.insert(task.id.clone(), evaluate(task, now));
        }
    }

    pub fn status(&self, id: &str) -> Option<TimeLeft> {
        self.entries.get(id).copied()
    }
}

/// Parse a deadline spec into an absolute instant.
///
/// Accepts RFC 3339 timestamps, the `YYYY-MM-DDTHH:MM[:SS]` shape datetime
/// pickers emit, bare dates, bare times, and the shorthands `now`, `today`,
/// `tomorrow`, `+Nd/w/m`, and weekday names. Naive forms resolve in the
/// local timezone; bare dates fall due at 9:00.
pub fn parse_deadline(spec: &str) -> Result<DateTime<Utc>> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Deadline cannot be empty"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let now_local = Local::now();

    match lower.as_str() {
        "now" => return Ok(now_local.with_timezone(&Utc)),
        "today" => return local_morning(now_local.date_naive()),
        "tomorrow" => return local_morning(now_local.date_naive() + Duration::days(1)),
        _ => {}
    }

    if lower.starts_with('+') {
        return parse_relative_spec(&lower, now_local);
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let mut days_ahead = (weekday.num_days_from_monday() as i32
            - now_local.weekday().num_days_from_monday() as i32)
            .rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        let target = now_local + Duration::days(days_ahead.into());
        return local_morning(target.date_naive());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return resolve_local(dt, trimmed);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return local_morning(date);
    }

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return resolve_local(now_local.date_naive().and_time(time), trimmed);
    }

    Err(anyhow!(
        "Unrecognized deadline '{}'. Try 2031-03-01T14:00, YYYY-MM-DD, today, tomorrow, +3d, mon",
        spec
    ))
}

fn local_morning(date: NaiveDate) -> Result<DateTime<Utc>> {
    let dt = date
        .and_hms_opt(9, 0, 0)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).expect("midnight"));
    resolve_local(dt, &date.to_string())
}

fn resolve_local(dt: NaiveDateTime, spec: &str) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&dt)
        .single()
        .ok_or_else(|| anyhow!("Could not resolve local time for '{}'", spec))
        .map(|local| local.with_timezone(&Utc))
}

fn parse_relative_spec(spec: &str, now_local: DateTime<Local>) -> Result<DateTime<Utc>> {
    if spec.len() < 3 {
        return Err(anyhow!("Relative deadline '{}' is too short", spec));
    }
    let Some(unit) = spec.chars().last() else {
        return Err(anyhow!("Relative deadline '{}' is too short", spec));
    };
    let number_part = &spec[1..spec.len() - unit.len_utf8()];
    let value: i64 = number_part.parse().context("Invalid relative offset")?;
    match unit {
        'd' => Ok((now_local + Duration::days(value)).with_timezone(&Utc)),
        'w' => Ok((now_local + Duration::weeks(value)).with_timezone(&Utc)),
        'm' => {
            let months = Months::new(value.try_into()?);
            Ok((now_local + months).with_timezone(&Utc))
        }
        other => Err(anyhow!(
            "Unsupported relative unit '{}'. Use d, w, or m.",
            other
        )),
    }
}

fn parse_weekday(label: &str) -> Option<Weekday> {
    match label {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
