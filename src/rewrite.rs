//! Rebuild a repository so that one identity shows a commit streak.

use crate::cli::{CommonArgs, StreakArgs};
use crate::config::Settings;
use crate::dump::{default_dir, exclude_from_status, progress_bar, write_patches, LOG_FILE};
use crate::error::{Result, StreakError};
use crate::git::{GitCli, VersionControl};
use crate::model::{CommitLog, Identity, Substitution};
use crate::redistribute::{redistribute, Redistribution};
use crate::replay::{replay, ReplayPlan};
use crate::sampler::Sampler;
use crate::streak::{locate, offset_for, Strategy};
use crate::util::{ensure_fresh_dir, format_timestamp, midnight_of};
use anyhow::Context;
use chrono::FixedOffset;
use console::style;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// The log as it will be replayed, next to the original `logs.json`.
pub const PLAN_FILE: &str = "rewritten.json";

pub struct RewriteArgs {
    pub repository: PathBuf,
    pub new_name: PathBuf,
    pub email: String,
    pub name: String,
    pub streak: StreakArgs,
    pub dump_dir: Option<PathBuf>,
    pub margin: Option<Duration>,
    pub redistribute: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewritePlan {
    /// The log to replay; timestamps already redistributed if needed.
    pub log: CommitLog,
    pub end_index: usize,
    pub strategy: Strategy,
    pub substitution: Substitution,
    pub offset: i64,
    pub redistribution: Option<Redistribution>,
}

/// Decide how `log` is replayed for `target_email`.
///
/// A natural streak is used when one exists; otherwise, when allowed, the
/// newest commits are compressed into a window that ends at midnight today.
#[allow(clippy::too_many_arguments)]
pub fn plan_rewrite<R: Rng + ?Sized>(
    mut log: CommitLog,
    target_email: &str,
    settings: &Settings,
    margin: i64,
    now: i64,
    allow_redistribute: bool,
    tz: &FixedOffset,
    rng: &mut R,
) -> Result<RewritePlan> {
    if log.len() < settings.min_commits {
        return Err(StreakError::InsufficientHistory {
            found: log.len(),
            required: settings.min_commits,
        });
    }

    if let Some(found) = locate(&log, target_email, settings.window_days, settings.min_commits) {
        let offset = offset_for(&log, found.end_index, now, margin).ok_or_else(|| {
            StreakError::InvalidArgument(format!("streak end {} outside the log", found.end_index))
        })?;
        return Ok(RewritePlan {
            log,
            end_index: found.end_index,
            strategy: found.strategy,
            substitution: found.substitution,
            offset,
            redistribution: None,
        });
    }

    if !allow_redistribute {
        return Err(StreakError::NoStreak {
            window_days: settings.window_days,
            min_commits: settings.min_commits,
        });
    }

    let end_index = log.last_index().ok_or(StreakError::InsufficientHistory {
        found: 0,
        required: settings.min_commits.max(1),
    })?;
    let sampler = Sampler::from_settings(&settings.sampler);
    let redistribution = redistribute(&mut log, end_index, &settings.redistribute, &sampler, tz, rng)?;
    let offset = midnight_of(now, tz) - redistribution.end_date();
    info!(
        start_index = redistribution.start_index,
        offset,
        "no natural streak, using redistributed tail"
    );

    Ok(RewritePlan {
        log,
        end_index,
        strategy: Strategy::Redistributed,
        substitution: Substitution::All,
        offset,
        redistribution: Some(redistribution),
    })
}

fn describe(strategy: &Strategy) -> String {
    match strategy {
        Strategy::OwnCommits => "your own commits".to_string(),
        Strategy::Contributor(email) => format!("commits of {email}"),
        Strategy::Aggregate => "all contributors together".to_string(),
        Strategy::Redistributed => "the newest commits, redistributed".to_string(),
    }
}

pub fn exec(common: &CommonArgs, args: RewriteArgs) -> anyhow::Result<()> {
    let mut settings = common.settings()?;
    args.streak.apply(&mut settings);
    let tz = common.timezone();
    let mut rng = common.rng();
    let now = chrono::Utc::now().timestamp();
    let margin = match args.margin {
        Some(margin) => i64::try_from(margin.as_secs()).context("Margin too large")?,
        None => settings.margin_secs,
    };

    ensure_fresh_dir(&args.new_name).context("Refusing to create the new repository")?;

    let source = GitCli::new(&args.repository, tz);
    let original = source
        .log()
        .with_context(|| format!("Failed to read history of {}", args.repository.display()))?;
    info!(commits = original.len(), "history loaded");

    let plan = plan_rewrite(
        original.clone(),
        &args.email,
        &settings,
        margin,
        now,
        args.redistribute,
        &tz,
        &mut rng,
    )?;

    let dump_dir = args.dump_dir.unwrap_or_else(|| default_dir(&args.repository));
    exclude_from_status(&args.repository, &dump_dir)?;
    std::fs::create_dir_all(&dump_dir)
        .with_context(|| format!("Failed to create {}", dump_dir.display()))?;
    original.save(&dump_dir.join(LOG_FILE))?;
    plan.log.save(&dump_dir.join(PLAN_FILE))?;
    let pb = progress_bar(original.len(), "Writing patches", true);
    write_patches(&source, &original, &dump_dir, &pb).context("Failed to write patches")?;

    let mut target = GitCli::new(&args.new_name, tz);
    target.init().context("Failed to create the new repository")?;

    let identity = Identity::new(args.name, args.email);
    let replay_plan = ReplayPlan {
        substitution: &plan.substitution,
        identity: &identity,
        offset: plan.offset,
        now,
    };
    let pb = progress_bar(plan.log.len(), "Replaying", true);
    let report = replay(&mut target, &plan.log, &dump_dir, &replay_plan, &pb).context("Replay failed")?;

    println!(
        "{} Streak from {} ending at commit n{}",
        style("✓").green(),
        style(describe(&plan.strategy)).cyan(),
        plan.end_index
    );
    if let Some(end) = plan.log.get(plan.end_index) {
        println!(
            "  {} {}",
            style("streak ends:").dim(),
            format_timestamp(end.latest_timestamp() + plan.offset, &tz)
        );
    }
    println!(
        "  {} {} commits replayed into {}",
        style("replay:").dim(),
        report.committed,
        style(args.new_name.display()).bold()
    );
    if let Some(stopped) = report.stopped_at {
        println!(
            "  {} {} newer commits left out, they would be dated in the future",
            style("note:").yellow(),
            plan.log.len() - stopped
        );
    }
    if !report.failed_patches.is_empty() {
        println!(
            "  {} {} patches did not apply: {:?}",
            style("warning:").yellow(),
            report.failed_patches.len(),
            report.failed_patches
        );
    }
    Ok(())
}
