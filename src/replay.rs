//! Rebuild a repository from a commit log and its patches.

use crate::dump::patch_path;
use crate::error::Result;
use crate::git::{CommitRequest, VersionControl};
use crate::model::{CommitLog, Identity, Substitution};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// How identities and dates are rewritten during a replay.
#[derive(Debug, Clone)]
pub struct ReplayPlan<'a> {
    pub substitution: &'a Substitution,
    pub identity: &'a Identity,
    /// Seconds added to every timestamp.
    pub offset: i64,
    /// Nothing dated after this instant is committed.
    pub now: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub committed: usize,
    pub failed_patches: Vec<usize>,
    /// Index of the first record left out because it would be dated in the future.
    pub stopped_at: Option<usize>,
}

impl ReplayPlan<'_> {
    fn effective(&self, original: Identity) -> Identity {
        if self.substitution.matches(&original.email) {
            self.identity.clone()
        } else {
            original
        }
    }
}

/// Replay `log` into `vcs`, one commit per record, in order.
///
/// Patches that fail to apply are logged and the commit is still recorded,
/// leaving that point of the history incomplete.
pub fn replay<V: VersionControl + ?Sized>(
    vcs: &mut V,
    log: &CommitLog,
    patches_dir: &Path,
    plan: &ReplayPlan<'_>,
    progress: &ProgressBar,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (index, record) in log.records().iter().enumerate() {
        let author_time = record.author_timestamp + plan.offset;
        let committer_time = record.committer_timestamp + plan.offset;
        if author_time > plan.now || committer_time > plan.now {
            info!(index, author_time, committer_time, "stopping before a future-dated commit");
            report.stopped_at = Some(index);
            break;
        }

        let author = plan.effective(record.author());
        let committer = plan.effective(record.committer());

        if !vcs.apply_patch(&patch_path(patches_dir, index))? {
            warn!(index, hash = %record.hash, "replaying without its changes");
            report.failed_patches.push(index);
        }
        vcs.stage()?;
        vcs.commit(&CommitRequest {
            author: &author,
            author_time,
            committer: &committer,
            committer_time,
            message: &record.message,
            allow_empty: true,
        })?;
        debug!(index, hash = %record.hash, "replayed");

        report.committed += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}
