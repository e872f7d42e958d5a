use crate::config::Settings;
use crate::util::{local_offset, utc};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gitstreak")]
#[command(about = "Rebuild git history around a commit streak, or draw on the contribution graph")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Seed for the random source, for reproducible runs")]
    pub seed: Option<u64>,

    #[arg(long, global = true, help = "Use UTC calendar days instead of the local timezone")]
    pub utc: bool,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More logging (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Args, Clone)]
pub struct StreakArgs {
    #[arg(long, help = "Length of the streak window in days")]
    pub window_days: Option<u32>,

    #[arg(long, help = "Commits required inside the window")]
    pub min_commits: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a repository so that the given identity shows a commit streak
    Rewrite {
        #[arg(help = "Source repository")]
        repository: PathBuf,

        #[arg(help = "Directory of the repository to create")]
        new_name: PathBuf,

        #[arg(help = "Email to commit under")]
        email: String,

        #[arg(help = "Name to commit under")]
        name: String,

        #[clap(flatten)]
        streak: StreakArgs,

        #[arg(long, help = "Where to write logs.json and patches (default: <repository>/.gitstreak, added to .git/info/exclude)")]
        dump_dir: Option<PathBuf>,

        #[arg(long, value_parser = humantime::parse_duration, help = "Gap kept between the newest replayed commit and now, e.g. 1h")]
        margin: Option<Duration>,

        #[arg(long, help = "Fail instead of compressing recent commits when no streak exists")]
        no_redistribute: bool,
    },
    /// Draw a string or a list of dates on the contribution graph
    Draw {
        #[arg(help = "Directory of the repository to create")]
        repository: PathBuf,

        #[arg(help = "Dates file (day:month:year per line) or a string to write")]
        source: String,

        #[arg(help = "Name to commit under")]
        username: String,

        #[arg(help = "Email to commit under")]
        email: String,

        #[arg(long, help = "First day of the drawing, YYYY-MM-DD (default: start of the current graph)")]
        start: Option<String>,

        #[arg(long, help = "Empty commits per drawn day")]
        commits_per_day: Option<u32>,
    },
    /// Report which contributors of a repository have a streak
    Scan {
        #[arg(help = "Repository to inspect")]
        repository: PathBuf,

        #[clap(flatten)]
        streak: StreakArgs,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Write the commit log and per-commit patches of a repository
    Dump {
        #[arg(help = "Repository to dump")]
        repository: PathBuf,

        #[arg(long, help = "Output directory (default: <repository>/.gitstreak, added to .git/info/exclude)")]
        out: Option<PathBuf>,
    },
}

impl CommonArgs {
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.config.as_deref()).context("Failed to load settings")
    }

    pub fn timezone(&self) -> FixedOffset {
        if self.utc {
            utc()
        } else {
            local_offset()
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl StreakArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(days) = self.window_days {
            settings.window_days = days;
        }
        if let Some(min) = self.min_commits {
            settings.min_commits = min;
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Rewrite {
                repository,
                new_name,
                email,
                name,
                streak,
                dump_dir,
                margin,
                no_redistribute,
            } => crate::rewrite::exec(
                &self.common,
                crate::rewrite::RewriteArgs {
                    repository,
                    new_name,
                    email,
                    name,
                    streak,
                    dump_dir,
                    margin,
                    redistribute: !no_redistribute,
                },
            ),
            Commands::Draw {
                repository,
                source,
                username,
                email,
                start,
                commits_per_day,
            } => crate::grid::exec(
                &self.common,
                crate::grid::DrawArgs {
                    repository,
                    source,
                    username,
                    email,
                    start,
                    commits_per_day,
                },
            ),
            Commands::Scan {
                repository,
                streak,
                json,
            } => crate::scan::exec(&self.common, repository, &streak, json),
            Commands::Dump { repository, out } => crate::dump::exec(&self.common, repository, out),
        }
    }
}
