use crate::cli::CommonArgs;
use crate::error::Result;
use crate::git::{GitCli, VersionControl};
use crate::model::CommitLog;
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const LOG_FILE: &str = "logs.json";
pub const DEFAULT_DIR: &str = ".gitstreak";

/// `<dir>/<index>.patch`
pub fn patch_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index}.patch"))
}

pub fn default_dir(repository: &Path) -> PathBuf {
    repository.join(DEFAULT_DIR)
}

/// Add `dir` to `.git/info/exclude` of `repository` when it lies inside its
/// work tree. Returns whether a pattern was added.
pub fn exclude_from_status(repository: &Path, dir: &Path) -> Result<bool> {
    let git_dir = repository.join(".git");
    let Ok(relative) = dir.strip_prefix(repository) else {
        return Ok(false);
    };
    if relative.as_os_str().is_empty() || !git_dir.is_dir() {
        return Ok(false);
    }

    let pattern = format!("/{}/", relative.to_string_lossy().replace('\\', "/"));
    let exclude = git_dir.join("info").join("exclude");
    let existing = match std::fs::read_to_string(&exclude) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.lines().any(|line| line.trim() == pattern) {
        return Ok(false);
    }

    std::fs::create_dir_all(git_dir.join("info"))?;
    let mut file = OpenOptions::new().create(true).append(true).open(&exclude)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{pattern}")?;
    info!(%pattern, "dump directory excluded from git status");
    Ok(true)
}

pub fn progress_bar(len: usize, message: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(message);
    pb
}

/// Write one patch per commit: the root snapshot as `0.patch`, then the diff
/// from each commit's predecessor.
pub fn write_patches<V: VersionControl + ?Sized>(
    vcs: &V,
    log: &CommitLog,
    dir: &Path,
    progress: &ProgressBar,
) -> Result<usize> {
    std::fs::create_dir_all(dir)?;
    let records = log.records();

    for (index, record) in records.iter().enumerate() {
        let patch = match index {
            0 => vcs.snapshot(&record.hash)?,
            _ => vcs.diff(&records[index - 1].hash, &record.hash)?,
        };
        std::fs::write(patch_path(dir, index), patch)?;
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(patches = records.len(), dir = %dir.display(), "patches written");
    Ok(records.len())
}

/// Read the history of `vcs` and store it with its patches under `dir`.
pub fn dump<V: VersionControl + ?Sized>(vcs: &V, dir: &Path, show_progress: bool) -> Result<CommitLog> {
    let log = vcs.log()?;
    std::fs::create_dir_all(dir)?;
    log.save(&dir.join(LOG_FILE))?;
    let pb = progress_bar(log.len(), "Writing patches", show_progress);
    write_patches(vcs, &log, dir, &pb)?;
    Ok(log)
}

pub fn exec(common: &CommonArgs, repository: PathBuf, out: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = out.unwrap_or_else(|| default_dir(&repository));
    let source = GitCli::new(&repository, common.timezone());
    exclude_from_status(&repository, &dir)?;

    let log = dump(&source, &dir, true)
        .with_context(|| format!("Failed to dump {}", repository.display()))?;

    println!(
        "{} {} commits and patches written to {}",
        style("✓").green(),
        style(log.len()).cyan(),
        style(dir.display()).bold()
    );
    Ok(())
}
