use crate::error::Result;
use crate::git::{CommitRequest, VersionControl};
use crate::model::Identity;
use indicatif::ProgressBar;
use tracing::debug;

/// Record `commits_per_day` empty commits at each of `dates`, authored and
/// committed by `identity`. Returns the number of commits made.
pub fn draw_pixels<V: VersionControl + ?Sized>(
    vcs: &mut V,
    identity: &Identity,
    dates: &[i64],
    commits_per_day: u32,
    message: &str,
    progress: &ProgressBar,
) -> Result<usize> {
    let mut made = 0;

    for &date in dates {
        for _ in 0..commits_per_day {
            vcs.commit(&CommitRequest {
                author: identity,
                author_time: date,
                committer: identity,
                committer_time: date,
                message,
                allow_empty: true,
            })?;
            made += 1;
        }
        debug!(date, commits_per_day, "pixel drawn");
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(made)
}
