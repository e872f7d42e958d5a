//! Compress the tail of a commit log into a synthetic window of days.

use crate::config::RedistributeSettings;
use crate::error::{Result, StreakError};
use crate::model::{CommitLog, CommitRecord, TimeOfDayEnvelope, SECONDS_PER_DAY};
use crate::sampler::Sampler;
use crate::util::{midnight_of, seconds_since_midnight};
use chrono::FixedOffset;
use rand::Rng;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Redistribution {
    pub start_index: usize,
    pub end_index: usize,
    /// Midnight opening the first synthetic day.
    pub start_date: i64,
    pub counts: Vec<i64>,
    pub envelope: TimeOfDayEnvelope,
}

impl Redistribution {
    pub fn num_days(&self) -> usize {
        self.counts.len()
    }

    /// First second after the synthetic window.
    pub fn end_date(&self) -> i64 {
        self.start_date + self.num_days() as i64 * SECONDS_PER_DAY
    }

    pub fn total(&self) -> usize {
        self.end_index + 1 - self.start_index
    }
}

/// Range of author times of day across `records`.
pub fn time_of_day_envelope(records: &[CommitRecord], tz: &FixedOffset) -> Option<TimeOfDayEnvelope> {
    let mut times = records
        .iter()
        .map(|r| seconds_since_midnight(r.author_timestamp, tz));
    let first = times.next()?;
    Some(times.fold(
        TimeOfDayEnvelope {
            earliest: first,
            latest: first,
        },
        |env, t| TimeOfDayEnvelope {
            earliest: env.earliest.min(t),
            latest: env.latest.max(t),
        },
    ))
}

/// Sample per-day counts and spread the commits ending at `end_index` over
/// `settings.days` days.
///
/// A negative draw means an empty day. Counts are clamped to zero before the
/// bounds are checked, and a sample whose clamped sum leaves
/// `[min_total, max_total]` is drawn again.
pub fn redistribute<R: Rng + ?Sized>(
    log: &mut CommitLog,
    end_index: usize,
    settings: &RedistributeSettings,
    sampler: &Sampler,
    tz: &FixedOffset,
    rng: &mut R,
) -> Result<Redistribution> {
    let num_days = settings.days as usize;
    let bounds = settings.min_total..=settings.max_total;

    for attempt in 1..=sampler.max_attempts() {
        let counts: Vec<i64> = sampler
            .sample_bounded(rng, settings.mean_per_day, num_days, settings.min_total, settings.max_total)?
            .into_iter()
            .map(|c| c.max(0))
            .collect();
        let total: i64 = counts.iter().sum();
        if bounds.contains(&total) {
            return apply_counts(log, end_index, counts, num_days, tz, rng);
        }
        debug!(attempt, "clamped sample out of bounds, drawing again");
    }

    Err(StreakError::SamplerExhausted {
        attempts: sampler.max_attempts(),
    })
}

/// Rewrite timestamps of the last `sum(counts)` commits up to `end_index`.
///
/// Day `d` receives `counts[d]` consecutive records, each stamped at a
/// uniformly random time inside the observed envelope. Counts must not be
/// negative. Records are not reordered and their new timestamps are not
/// forced to be monotonic.
pub fn apply_counts<R: Rng + ?Sized>(
    log: &mut CommitLog,
    end_index: usize,
    counts: Vec<i64>,
    num_days: usize,
    tz: &FixedOffset,
    rng: &mut R,
) -> Result<Redistribution> {
    if counts.len() != num_days {
        return Err(StreakError::MalformedSample {
            expected: num_days,
            got: counts.len(),
        });
    }
    if end_index >= log.len() {
        return Err(StreakError::InvalidArgument(format!(
            "end index {end_index} outside a log of {} commits",
            log.len()
        )));
    }

    let per_day = counts
        .iter()
        .enumerate()
        .map(|(day, &c)| {
            usize::try_from(c).map_err(|_| {
                StreakError::InvalidArgument(format!("negative commit count {c} for day {day}"))
            })
        })
        .collect::<Result<Vec<usize>>>()?;
    let total: usize = per_day.iter().sum();
    if total == 0 {
        return Err(StreakError::InvalidArgument(
            "redistribution of zero commits".to_string(),
        ));
    }
    if total > end_index + 1 {
        return Err(StreakError::InsufficientHistory {
            found: end_index + 1,
            required: total,
        });
    }
    let start_index = end_index + 1 - total;

    let records = log.records_mut();
    let range = &mut records[start_index..=end_index];
    let envelope = time_of_day_envelope(range, tz).ok_or_else(|| {
        StreakError::InvalidArgument("empty redistribution range".to_string())
    })?;
    let start_date = midnight_of(range[0].author_timestamp, tz);
    debug!(start_index, end_index, ?envelope, start_date, "redistributing");

    let mut slots = range.iter_mut();
    for (day, &n) in per_day.iter().enumerate() {
        let midnight = start_date + day as i64 * SECONDS_PER_DAY;
        for record in slots.by_ref().take(n) {
            let timestamp = midnight + rng.random_range(envelope.earliest..=envelope.latest);
            record.author_timestamp = timestamp;
            record.committer_timestamp = timestamp;
        }
    }

    info!(
        commits = total,
        days = num_days,
        start_index,
        end_index,
        "commits redistributed"
    );

    Ok(Redistribution {
        start_index,
        end_index,
        start_date,
        counts,
        envelope,
    })
}
