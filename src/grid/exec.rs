use super::dates::read_dates;
use super::draw::draw_pixels;
use super::encode::{compute_dates, encode_string, PixelClock};
use crate::cli::CommonArgs;
use crate::dump::progress_bar;
use crate::error::Result;
use crate::git::{GitCli, VersionControl};
use crate::model::Identity;
use crate::util::{ensure_fresh_dir, format_timestamp, graph_start, midnight_for_date, parse_ymd};
use anyhow::Context;
use chrono::FixedOffset;
use console::style;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct DrawArgs {
    pub repository: PathBuf,
    pub source: String,
    pub username: String,
    pub email: String,
    pub start: Option<String>,
    pub commits_per_day: Option<u32>,
}

/// Pixel timestamps for `source`: a dates file if one exists at that path,
/// otherwise the string to write.
pub fn plan_dates<R: Rng + ?Sized>(
    source: &str,
    start: Option<&str>,
    now: i64,
    tz: &FixedOffset,
    rng: &mut R,
) -> Result<Vec<i64>> {
    let mut clock = PixelClock::new(rng);

    let path = Path::new(source);
    if path.is_file() {
        info!(file = %path.display(), "reading dates file");
        let text = std::fs::read_to_string(path)?;
        return read_dates(&text, tz, &mut clock);
    }

    let cells = encode_string(source)?;
    let first_day = match start {
        Some(start) => parse_ymd(start)?,
        None => graph_start(now, tz)?,
    };
    info!(cells = cells.len(), %first_day, "encoded string");
    Ok(compute_dates(midnight_for_date(first_day, tz)?, &cells, &mut clock))
}

pub fn exec(common: &CommonArgs, args: DrawArgs) -> anyhow::Result<()> {
    let settings = common.settings()?;
    let tz = common.timezone();
    let mut rng = common.rng();
    let now = chrono::Utc::now().timestamp();
    let commits_per_day = args.commits_per_day.unwrap_or(settings.draw.commits_per_day);

    let dates = plan_dates(&args.source, args.start.as_deref(), now, &tz, &mut rng)
        .context("Failed to compute pixel dates")?;

    let future = dates.iter().filter(|&&d| d > now).count();
    if future > 0 {
        warn!(future, "some pixels are dated in the future and will not show yet");
    }

    ensure_fresh_dir(&args.repository).context("Refusing to draw into this directory")?;
    let mut vcs = GitCli::new(&args.repository, tz);
    vcs.init().context("Failed to create repository")?;

    let identity = Identity::new(args.username, args.email);
    let pb = progress_bar(dates.len(), "Drawing pixels", true);
    let made = draw_pixels(&mut vcs, &identity, &dates, commits_per_day, &settings.draw.message, &pb)
        .context("Failed to draw pixels")?;

    println!(
        "{} {} pixels ({} commits) drawn in {}",
        style("✓").green(),
        style(dates.len()).cyan(),
        made,
        style(args.repository.display()).bold()
    );
    if let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) {
        println!(
            "  {} {} → {}",
            style("span:").dim(),
            format_timestamp(*first, &tz),
            format_timestamp(*last, &tz)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreakError;
    use crate::grid::encode::{DAY_START, JITTER_MAX};
    use crate::model::SECONDS_PER_DAY;
    use crate::util::utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn string_is_laid_out_from_explicit_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dates = plan_dates("q", Some("2014-02-09"), 0, &utc(), &mut rng).unwrap();

        assert_eq!(dates.len(), 14);
        let first = dates[0] - 1_391_904_000 - SECONDS_PER_DAY;
        assert!((DAY_START..=DAY_START + JITTER_MAX).contains(&first));
    }

    #[test]
    fn existing_file_is_read_as_dates() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("dates.txt");
        std::fs::write(&file, "9:2:2014\n").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let dates = plan_dates(&file.to_string_lossy(), None, 0, &utc(), &mut rng).unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0] / SECONDS_PER_DAY, 1_391_904_000 / SECONDS_PER_DAY);
    }

    #[test]
    fn unsupported_character_fails_before_anything_else() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = plan_dates("no!", None, 1_709_644_800, &utc(), &mut rng).unwrap_err();
        assert!(matches!(err, StreakError::UnsupportedCharacter('!')));
    }
}
