use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Name and email pair used for authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One historical commit, in the `logs.json` interchange layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    #[serde(rename = "author")]
    pub author_name: String,
    #[serde(rename = "author-email")]
    pub author_email: String,
    #[serde(rename = "author-date")]
    pub author_timestamp: i64,
    #[serde(rename = "committer")]
    pub committer_name: String,
    #[serde(rename = "committer-email")]
    pub committer_email: String,
    #[serde(rename = "committer-date")]
    pub committer_timestamp: i64,
    pub message: String,
}

impl CommitRecord {
    pub fn author(&self) -> Identity {
        Identity::new(&self.author_name, &self.author_email)
    }

    pub fn committer(&self) -> Identity {
        Identity::new(&self.committer_name, &self.committer_email)
    }

    /// Latest of the author and committer timestamps.
    pub fn latest_timestamp(&self) -> i64 {
        self.author_timestamp.max(self.committer_timestamp)
    }
}

/// Commit history, oldest first. The position of a record is its sequence number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitLog {
    records: Vec<CommitRecord>,
}

impl CommitLog {
    pub fn new(records: Vec<CommitRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, num_commit: usize) -> Option<&CommitRecord> {
        self.records.get(num_commit)
    }

    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [CommitRecord] {
        &mut self.records
    }

    pub fn last_index(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }

    /// Distinct author emails, sorted.
    pub fn contributors(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.author_email.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Earliest and latest seconds-since-midnight observed across a commit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDayEnvelope {
    pub earliest: i64,
    pub latest: i64,
}

impl TimeOfDayEnvelope {
    pub fn contains(&self, seconds: i64) -> bool {
        seconds >= self.earliest && seconds <= self.latest
    }
}

/// Which original identities get replaced during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    All,
    Emails(BTreeSet<String>),
}

impl Substitution {
    pub fn none() -> Self {
        Substitution::Emails(BTreeSet::new())
    }

    pub fn single(email: &str) -> Self {
        Substitution::Emails(BTreeSet::from([email.to_string()]))
    }

    pub fn matches(&self, email: &str) -> bool {
        match self {
            Substitution::All => true,
            Substitution::Emails(emails) => emails.contains(email),
        }
    }

    /// Parse `all` or a comma separated email list.
    pub fn parse(input: &str) -> Self {
        if input.trim() == "all" {
            return Substitution::All;
        }
        Substitution::Emails(
            input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

impl std::fmt::Display for Substitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Substitution::All => write!(f, "all"),
            Substitution::Emails(emails) if emails.is_empty() => write!(f, "none"),
            Substitution::Emails(emails) => {
                let list: Vec<&str> = emails.iter().map(String::as_str).collect();
                write!(f, "{}", list.join(","))
            }
        }
    }
}
