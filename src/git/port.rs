use crate::error::Result;
use crate::model::{CommitLog, Identity};
use std::path::Path;

/// Everything needed to record one commit. Identities and dates travel with
/// the request rather than through the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest<'a> {
    pub author: &'a Identity,
    pub author_time: i64,
    pub committer: &'a Identity,
    pub committer_time: i64,
    pub message: &'a str,
    pub allow_empty: bool,
}

/// Operations the history tools need from a version control system.
pub trait VersionControl {
    /// Create an empty repository.
    fn init(&mut self) -> Result<()>;

    /// First-parent history, oldest first.
    fn log(&self) -> Result<CommitLog>;

    /// Patch recreating the full tree of a root commit.
    fn snapshot(&self, hash: &str) -> Result<Vec<u8>>;

    /// Binary-safe patch from `from` to `to`.
    fn diff(&self, from: &str, to: &str) -> Result<Vec<u8>>;

    /// Apply a patch to the work tree. `Ok(false)` means the patch did not
    /// apply; the caller decides whether that matters.
    fn apply_patch(&mut self, patch: &Path) -> Result<bool>;

    /// Stage every change in the work tree.
    fn stage(&mut self) -> Result<()>;

    fn commit(&mut self, request: &CommitRequest<'_>) -> Result<()>;
}
