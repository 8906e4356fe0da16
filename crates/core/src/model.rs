use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::Serialize;

/// A single deadline-tracked task.
///
/// `deadline` is kept as the raw stored string and parsed on every
/// evaluation, so rows with timestamps this build cannot read still load.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub deadline: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    Pending,
    Expired,
    Done,
    Invalid,
}

impl StatusBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBucket::Pending => "pending",
            StatusBucket::Expired => "expired",
            StatusBucket::Done => "done",
            StatusBucket::Invalid => "invalid",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" | "counting" => Ok(StatusBucket::Pending),
            "expired" | "overdue" => Ok(StatusBucket::Expired),
            "done" | "completed" => Ok(StatusBucket::Done),
            "invalid" => Ok(StatusBucket::Invalid),
            other => Err(anyhow!(
                "Unknown bucket '{}': expected pending|expired|done|invalid",
                other
            )),
        }
    }
}

impl ValueEnum for StatusBucket {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [StatusBucket; 4] = [
            StatusBucket::Pending,
            StatusBucket::Expired,
            StatusBucket::Done,
            StatusBucket::Invalid,
        ];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_round_trips_through_strings() {
        for bucket in [
            StatusBucket::Pending,
            StatusBucket::Expired,
            StatusBucket::Done,
            StatusBucket::Invalid,
        ] {
            let parsed: StatusBucket = bucket.as_str().parse().expect("parse bucket");
            assert_eq!(parsed, bucket);
        }
    }

    #[test]
    fn bucket_accepts_aliases_and_rejects_unknown() {
        assert_eq!(
            "overdue".parse::<StatusBucket>().expect("alias"),
            StatusBucket::Expired
        );
        assert_eq!(
            "Completed".parse::<StatusBucket>().expect("alias"),
            StatusBucket::Done
        );
        assert!("someday".parse::<StatusBucket>().is_err());
    }
}
