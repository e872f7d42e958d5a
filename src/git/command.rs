use super::port::{CommitRequest, VersionControl};
use super::repo::GitRepo;
use crate::error::{Result, StreakError};
use crate::model::CommitLog;
use chrono::FixedOffset;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// `VersionControl` backed by the `git` executable.
pub struct GitCli {
    workdir: PathBuf,
    tz: FixedOffset,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>, tz: FixedOffset) -> Self {
        Self {
            workdir: workdir.into(),
            tz,
        }
    }

    pub fn is_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.workdir);
        cmd
    }

    fn run(&self, mut cmd: Command, what: &str) -> Result<Output> {
        let output = cmd.output()?;
        if !output.status.success() {
            return Err(StreakError::GitCommand {
                command: what.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Git's internal date format: `<seconds> <+hhmm>`.
    fn git_date(&self, timestamp: i64) -> String {
        let offset = self.tz.local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.abs() / 60;
        format!("{timestamp} {sign}{:02}{:02}", minutes / 60, minutes % 60)
    }
}

impl VersionControl for GitCli {
    fn init(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.workdir)?;
        let mut cmd = self.git();
        cmd.args(["init", "-q"]);
        self.run(cmd, "init")?;
        debug!(path = %self.workdir.display(), "repository initialised");
        Ok(())
    }

    fn log(&self) -> Result<CommitLog> {
        GitRepo::open(Some(&self.workdir))?.linear_history(false)
    }

    fn snapshot(&self, hash: &str) -> Result<Vec<u8>> {
        let mut cmd = self.git();
        cmd.args(["show", "--binary", "--no-color", "--no-ext-diff", "--format="])
            .arg(hash);
        Ok(self.run(cmd, "show")?.stdout)
    }

    fn diff(&self, from: &str, to: &str) -> Result<Vec<u8>> {
        let mut cmd = self.git();
        cmd.args(["diff", "--binary", "--no-color", "--no-ext-diff"])
            .args([from, to]);
        Ok(self.run(cmd, "diff")?.stdout)
    }

    fn apply_patch(&mut self, patch: &Path) -> Result<bool> {
        if std::fs::metadata(patch)?.len() == 0 {
            return Ok(true);
        }
        let patch = patch.canonicalize()?;
        let status = self
            .git()
            .arg("apply")
            .arg(&patch)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            warn!(patch = %patch.display(), "patch did not apply");
        }
        Ok(status.success())
    }

    fn stage(&mut self) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["add", "--all", "."]);
        self.run(cmd, "add")?;
        Ok(())
    }

    fn commit(&mut self, request: &CommitRequest<'_>) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["-c", "commit.gpgsign=false", "commit", "-q", "--no-verify"])
            .args(["--cleanup=verbatim", "--allow-empty-message"])
            .arg("-m")
            .arg(request.message)
            .env("GIT_AUTHOR_NAME", &request.author.name)
            .env("GIT_AUTHOR_EMAIL", &request.author.email)
            .env("GIT_AUTHOR_DATE", self.git_date(request.author_time))
            .env("GIT_COMMITTER_NAME", &request.committer.name)
            .env("GIT_COMMITTER_EMAIL", &request.committer.email)
            .env("GIT_COMMITTER_DATE", self.git_date(request.committer_time));
        if request.allow_empty {
            cmd.arg("--allow-empty");
        }
        self.run(cmd, "commit")?;
        Ok(())
    }
}
