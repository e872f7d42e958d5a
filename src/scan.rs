use crate::cli::{CommonArgs, StreakArgs};
use crate::git::{GitCli, VersionControl};
use crate::streak::{scan_contributors, ContributorStreak};
use anyhow::Context;
use console::style;
use serde_json::json;
use std::path::PathBuf;

pub fn exec(common: &CommonArgs, repository: PathBuf, streak: &StreakArgs, json: bool) -> anyhow::Result<()> {
    let mut settings = common.settings()?;
    streak.apply(&mut settings);

    let source = GitCli::new(&repository, common.timezone());
    let log = source
        .log()
        .with_context(|| format!("Failed to read history of {}", repository.display()))?;

    let enough = log.len() >= settings.min_commits;
    let results = if enough {
        scan_contributors(&log, settings.window_days, settings.min_commits)
    } else {
        Vec::new()
    };

    if json {
        let output = json!({
            "repository": repository.display().to_string(),
            "commits": log.len(),
            "window_days": settings.window_days,
            "min_commits": settings.min_commits,
            "contributors": results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !enough {
        println!("{}", style("Not enough commits in this repository.").yellow());
        return Ok(());
    }
    print_matches(&results);
    Ok(())
}

fn print_matches(results: &[ContributorStreak]) {
    let mut any = false;
    for result in results {
        if let (Some(end), Some(behind)) = (result.end_index, result.behind_head) {
            println!(
                "Match found for {}! (n{} => -{})",
                style(&result.email).cyan(),
                end,
                behind
            );
            any = true;
        }
    }
    if !any {
        println!("{}", style("No contributor has a streak.").dim());
    }
}
