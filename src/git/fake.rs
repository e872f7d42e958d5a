//! In-memory `VersionControl` for tests.

use super::port::{CommitRequest, VersionControl};
use crate::error::Result;
use crate::model::{CommitLog, Identity};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub author: Identity,
    pub author_time: i64,
    pub committer: Identity,
    pub committer_time: i64,
    pub message: String,
    pub allow_empty: bool,
}

#[derive(Debug, Default)]
pub struct FakeVcs {
    pub history: CommitLog,
    pub initialised: bool,
    pub applied: Vec<String>,
    pub staged: usize,
    pub commits: Vec<RecordedCommit>,
    /// Patch file names that refuse to apply.
    pub rejecting: HashSet<String>,
}

impl FakeVcs {
    pub fn with_history(history: CommitLog) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }
}

impl VersionControl for FakeVcs {
    fn init(&mut self) -> Result<()> {
        self.initialised = true;
        Ok(())
    }

    fn log(&self) -> Result<CommitLog> {
        Ok(self.history.clone())
    }

    fn snapshot(&self, hash: &str) -> Result<Vec<u8>> {
        Ok(format!("snapshot {hash}\n").into_bytes())
    }

    fn diff(&self, from: &str, to: &str) -> Result<Vec<u8>> {
        Ok(format!("diff {from}..{to}\n\0binary").into_bytes())
    }

    fn apply_patch(&mut self, patch: &Path) -> Result<bool> {
        let name = patch
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let ok = !self.rejecting.contains(&name);
        self.applied.push(name);
        Ok(ok)
    }

    fn stage(&mut self) -> Result<()> {
        self.staged += 1;
        Ok(())
    }

    fn commit(&mut self, request: &CommitRequest<'_>) -> Result<()> {
        self.commits.push(RecordedCommit {
            author: request.author.clone(),
            author_time: request.author_time,
            committer: request.committer.clone(),
            committer_time: request.committer_time,
            message: request.message.to_string(),
            allow_empty: request.allow_empty,
        });
        Ok(())
    }
}
