//! Streak detection over a commit log.
//!
//! A streak is a window of at most `window_days` days holding at least
//! `min_commits` commits, optionally all authored by one email.

use crate::model::{CommitLog, Substitution, SECONDS_PER_DAY};
use serde::Serialize;
use tracing::{debug, info};

/// Index of the last commit of the most recent qualifying window.
///
/// The candidate end commit counts toward the window. With an `author`
/// filter, both the end commit and the counted predecessors must carry that
/// author email. Out-of-order timestamps are tolerated: a predecessor dated
/// after the end commit simply counts as inside the window.
pub fn find_streak(
    log: &CommitLog,
    author: Option<&str>,
    window_days: u32,
    min_commits: usize,
) -> Option<usize> {
    let records = log.records();
    if min_commits == 0 || records.len() < min_commits {
        return None;
    }

    let window = i64::from(window_days) * SECONDS_PER_DAY;
    let matches = |email: &str| author.map_or(true, |a| a == email);

    for i in (min_commits - 1..records.len()).rev() {
        let end = &records[i];
        if !matches(&end.author_email) {
            continue;
        }

        let mut count = 1;
        if count >= min_commits {
            return Some(i);
        }

        for prev in records[..i].iter().rev() {
            if !matches(&prev.author_email) {
                continue;
            }
            let period = end.author_timestamp - prev.author_timestamp;
            if period > window {
                break;
            }
            count += 1;
            if count >= min_commits {
                return Some(i);
            }
        }
    }

    None
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "email", rename_all = "snake_case")]
pub enum Strategy {
    /// The target identity already has a streak of its own.
    OwnCommits,
    /// Another single contributor has a streak that is taken over.
    Contributor(String),
    /// The whole history, all identities replaced.
    Aggregate,
    /// No window existed; the newest commits were compressed into one.
    Redistributed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakPlan {
    pub end_index: usize,
    pub strategy: Strategy,
    pub substitution: Substitution,
}

/// Try the target's own commits, then each other contributor, then the
/// whole log.
pub fn locate(
    log: &CommitLog,
    target_email: &str,
    window_days: u32,
    min_commits: usize,
) -> Option<StreakPlan> {
    if let Some(end_index) = find_streak(log, Some(target_email), window_days, min_commits) {
        info!(end_index, "streak found in own commits");
        return Some(StreakPlan {
            end_index,
            strategy: Strategy::OwnCommits,
            substitution: Substitution::none(),
        });
    }

    let best = log
        .contributors()
        .into_iter()
        .filter(|email| email != target_email)
        .filter_map(|email| {
            let end = find_streak(log, Some(&email), window_days, min_commits)?;
            debug!(%email, end, "contributor streak");
            Some((end, email))
        })
        // Latest window wins; on equal ends the smaller email, which came first.
        .fold(None::<(usize, String)>, |best, cand| match best {
            Some(b) if b.0 >= cand.0 => Some(b),
            _ => Some(cand),
        });

    if let Some((end_index, email)) = best {
        info!(end_index, %email, "streak taken over from contributor");
        return Some(StreakPlan {
            end_index,
            substitution: Substitution::single(&email),
            strategy: Strategy::Contributor(email),
        });
    }

    let end_index = find_streak(log, None, window_days, min_commits)?;
    info!(end_index, "streak found across all contributors");
    Some(StreakPlan {
        end_index,
        strategy: Strategy::Aggregate,
        substitution: Substitution::All,
    })
}

/// Shift that places the latest timestamp of `end_index` at `now - margin`.
pub fn offset_for(log: &CommitLog, end_index: usize, now: i64, margin: i64) -> Option<i64> {
    let end = log.get(end_index)?;
    Some(now - margin - end.latest_timestamp())
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributorStreak {
    pub email: String,
    pub end_index: Option<usize>,
    /// Distance from the newest commit, counting the streak end itself:
    /// `len - end_index`, so the last commit is 1 behind.
    pub behind_head: Option<usize>,
}

/// Streak status of every contributor.
pub fn scan_contributors(
    log: &CommitLog,
    window_days: u32,
    min_commits: usize,
) -> Vec<ContributorStreak> {
    log.contributors()
        .into_iter()
        .map(|email| {
            let end_index = find_streak(log, Some(&email), window_days, min_commits);
            ContributorStreak {
                behind_head: end_index.map(|i| log.len() - i),
                email,
                end_index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{record, steady_log};
    use crate::model::CommitRecord;
    use pretty_assertions::assert_eq;

    const DAY: i64 = SECONDS_PER_DAY;
    const T0: i64 = 1_600_000_000;

    fn sparse(hash: usize, email: &str, ts: i64) -> CommitRecord {
        record(&format!("{hash:040x}"), email, ts)
    }

    /// 200 commits: 0..100 by others spread over years, 100..150 by X within
    /// 28 days, 150..200 sparse commits by someone else afterwards.
    fn two_hundred() -> CommitLog {
        let mut records = Vec::new();
        for i in 0..100 {
            records.push(sparse(i, "other@x", T0 + i as i64 * 40 * DAY));
        }
        let x_start = T0 + 100 * 40 * DAY;
        for i in 100..150 {
            // 50 commits over about 26.5 days
            records.push(sparse(i, "x@x", x_start + (i as i64 - 100) * 13 * 3600));
        }
        for i in 150..200 {
            records.push(sparse(i, "late@x", x_start + 400 * DAY + i as i64 * 60 * DAY));
        }
        CommitLog::new(records)
    }

    #[test]
    fn short_log_is_not_found() {
        let log = steady_log(49, "x@x", T0, 60);
        assert_eq!(find_streak(&log, None, 29, 50), None);
        assert_eq!(find_streak(&CommitLog::default(), None, 29, 50), None);
    }

    #[test]
    fn author_block_inside_longer_history() {
        let log = two_hundred();
        assert_eq!(find_streak(&log, Some("x@x"), 29, 50), Some(149));
    }

    #[test]
    fn exactly_min_commits_in_window_qualifies() {
        let log = steady_log(50, "x@x", T0, DAY / 2);
        assert_eq!(find_streak(&log, None, 29, 50), Some(49));
        assert_eq!(find_streak(&log, None, 29, 51), None);
    }

    #[test]
    fn window_wider_than_limit_is_rejected() {
        // 50 commits, one per day: spans 49 days
        let log = steady_log(50, "x@x", T0, DAY);
        assert_eq!(find_streak(&log, None, 29, 50), None);
        assert_eq!(find_streak(&log, None, 49, 50), Some(49));
    }

    #[test]
    fn most_recent_of_two_windows_wins() {
        let mut records = Vec::new();
        for i in 0..50 {
            records.push(sparse(i, "x@x", T0 + i as i64 * 3600));
        }
        for i in 50..60 {
            records.push(sparse(i, "x@x", T0 + 200 * DAY + i as i64 * 90 * DAY));
        }
        let later = T0 + 10_000 * DAY;
        for i in 60..110 {
            records.push(sparse(i, "x@x", later + i as i64 * 3600));
        }
        let log = CommitLog::new(records);
        assert_eq!(find_streak(&log, Some("x@x"), 29, 50), Some(109));
    }

    #[test]
    fn other_authors_are_skipped_not_counted() {
        let mut records = Vec::new();
        for i in 0..100 {
            let email = if i % 2 == 0 { "x@x" } else { "y@x" };
            records.push(sparse(i, email, T0 + i as i64 * 3600));
        }
        let log = CommitLog::new(records);
        // Newest commit is y's; x's latest is index 98.
        assert_eq!(find_streak(&log, Some("x@x"), 29, 50), Some(98));
        assert_eq!(find_streak(&log, Some("y@x"), 29, 50), Some(99));
        assert_eq!(find_streak(&log, Some("x@x"), 29, 51), None);
        assert_eq!(find_streak(&log, None, 29, 100), Some(99));
    }

    #[test]
    fn out_of_order_timestamps_do_not_break_the_scan() {
        let mut log = steady_log(60, "x@x", T0, 3600);
        // a predecessor dated after the end commit
        log.records_mut()[30].author_timestamp = T0 + 1000 * DAY;
        assert_eq!(find_streak(&log, None, 29, 50), Some(59));
    }

    #[test]
    fn locate_prefers_own_commits() {
        let log = steady_log(60, "me@x", T0, 3600);
        let plan = locate(&log, "me@x", 29, 50).unwrap();
        assert_eq!(plan.strategy, Strategy::OwnCommits);
        assert_eq!(plan.end_index, 59);
        assert_eq!(plan.substitution, Substitution::none());
    }

    #[test]
    fn locate_takes_over_a_contributor() {
        let log = two_hundred();
        let plan = locate(&log, "me@x", 29, 50).unwrap();
        assert_eq!(plan.strategy, Strategy::Contributor("x@x".to_string()));
        assert_eq!(plan.end_index, 149);
        assert!(plan.substitution.matches("x@x"));
        assert!(!plan.substitution.matches("other@x"));
    }

    #[test]
    fn locate_falls_back_to_aggregate() {
        let mut records = Vec::new();
        for i in 0..60 {
            let email = format!("dev{}@x", i % 3);
            records.push(sparse(i, &email, T0 + i as i64 * 3600));
        }
        let log = CommitLog::new(records);
        let plan = locate(&log, "me@x", 29, 50).unwrap();
        assert_eq!(plan.strategy, Strategy::Aggregate);
        assert_eq!(plan.end_index, 59);
        assert_eq!(plan.substitution, Substitution::All);
    }

    #[test]
    fn locate_gives_up_on_sparse_history() {
        let log = steady_log(60, "x@x", T0, 5 * DAY);
        assert_eq!(locate(&log, "me@x", 29, 50), None);
    }

    #[test]
    fn offset_moves_window_end_to_now() {
        let mut log = steady_log(10, "x@x", T0, 3600);
        log.records_mut()[9].committer_timestamp = T0 + 9 * 3600 + 120;
        let now = T0 + 500 * DAY;
        let offset = offset_for(&log, 9, now, 3600).unwrap();
        assert_eq!(T0 + 9 * 3600 + 120 + offset, now - 3600);
        assert_eq!(offset_for(&log, 10, now, 0), None);
    }

    #[test]
    fn scan_reports_each_contributor() {
        let log = two_hundred();
        let report = scan_contributors(&log, 29, 50);
        let x = report.iter().find(|c| c.email == "x@x").unwrap();
        assert_eq!(x.end_index, Some(149));
        assert_eq!(x.behind_head, Some(51));
        let other = report.iter().find(|c| c.email == "other@x").unwrap();
        assert_eq!(other.end_index, None);
    }

    #[test]
    fn streak_at_head_is_one_behind() {
        let log = steady_log(50, "x@x", T0, 60);
        let report = scan_contributors(&log, 29, 50);
        assert_eq!(report[0].end_index, Some(49));
        assert_eq!(report[0].behind_head, Some(1));
    }
}
