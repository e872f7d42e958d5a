use crate::error::{Result, StreakError};
use crate::model::{CommitLog, CommitRecord};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only view of an existing repository.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk first parents from HEAD and return the history oldest first.
    pub fn linear_history(&self, show_progress: bool) -> Result<CommitLog> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let pb = if show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading history...");

        let mut records = Vec::new();
        let mut next: Option<ObjectId> = Some(head_commit.id);

        while let Some(commit_id) = next {
            let commit = self.repo.find_commit(commit_id)?;
            let author = commit.author()?;
            let committer = commit.committer()?;

            let author_time = author
                .time()
                .map_err(|e| StreakError::InvalidDate(format!("{commit_id}: {e}")))?;
            let committer_time = commit.time()?;

            let message = commit.message_raw_sloppy().to_string();

            records.push(CommitRecord {
                hash: commit_id.to_string(),
                author_name: author.name.to_string(),
                author_email: author.email.to_string(),
                author_timestamp: author_time.seconds,
                committer_name: committer.name.to_string(),
                committer_email: committer.email.to_string(),
                committer_timestamp: committer_time.seconds,
                message: message.trim_end_matches('\n').to_string(),
            });

            next = commit.parent_ids().next().map(|id| id.detach());
            pb.inc(1);
        }

        pb.finish_and_clear();
        records.reverse();
        debug!(commits = records.len(), path = %self.path.display(), "history read");
        Ok(CommitLog::new(records))
    }
}
