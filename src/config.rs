use crate::error::Result;
use crate::sampler::SampleFilter;
use serde::Deserialize;
use std::path::Path;

/// Tunables for streak detection, redistribution and drawing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_days: u32,
    pub min_commits: usize,
    pub redistribute: RedistributeSettings,
    pub sampler: SamplerSettings,
    pub draw: DrawSettings,
    /// Seconds kept between the newest replayed commit and now.
    pub margin_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RedistributeSettings {
    pub days: u32,
    pub mean_per_day: f64,
    pub min_total: i64,
    pub max_total: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub max_attempts: u32,
    pub filter: SampleFilter,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub commits_per_day: u32,
    pub message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_days: 29,
            min_commits: 50,
            redistribute: RedistributeSettings::default(),
            sampler: SamplerSettings::default(),
            draw: DrawSettings::default(),
            margin_secs: 3600,
        }
    }
}

impl Default for RedistributeSettings {
    fn default() -> Self {
        Self {
            days: 29,
            mean_per_day: 5.0 / 3.0,
            min_total: 50,
            max_total: 60,
        }
    }
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 10_000,
            filter: SampleFilter::Permissive,
        }
    }
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            commits_per_day: 40,
            message: "Update README".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a TOML file; missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_streak_threshold() {
        let s = Settings::default();
        assert_eq!(s.window_days, 29);
        assert_eq!(s.min_commits, 50);
        assert_eq!(s.redistribute.min_total, 50);
        assert_eq!(s.redistribute.max_total, 60);
        assert_eq!(s.draw.commits_per_day, 40);
        assert_eq!(s.sampler.filter, SampleFilter::Permissive);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = Settings::from_toml(
            r#"
            min_commits = 30

            [draw]
            commits_per_day = 10

            [sampler]
            filter = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(s.min_commits, 30);
        assert_eq!(s.window_days, 29);
        assert_eq!(s.draw.commits_per_day, 10);
        assert_eq!(s.draw.message, "Update README");
        assert_eq!(s.sampler.filter, SampleFilter::Strict);
        assert_eq!(s.sampler.max_attempts, 10_000);
    }

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = Settings::from_toml("min_commits = \"many\"").unwrap_err();
        assert!(matches!(err, crate::error::StreakError::Config(_)));
    }
}
