//! Bounded sampling of small per-day commit counts.
//!
//! Values are drawn from a normal distribution of variance 1 around a mean,
//! truncated toward zero, filtered, and the whole set is redrawn until its sum
//! falls in the requested range.

use crate::config::SamplerSettings;
use crate::error::{Result, StreakError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use tracing::debug;

/// Which truncated draws are kept in a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFilter {
    /// `v >= 0 || v < 4`. The bounds are joined with a logical or, so every
    /// value passes and negative or large counts can appear.
    #[default]
    Permissive,
    /// Only `0 <= v < 4`. Dropped values shorten the sample.
    Strict,
}

impl SampleFilter {
    #[allow(clippy::overly_complex_bool_expr)]
    pub fn retains(self, value: i64) -> bool {
        match self {
            SampleFilter::Permissive => value >= 0 || value < 4,
            SampleFilter::Strict => (0..4).contains(&value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sampler {
    max_attempts: u32,
    filter: SampleFilter,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::from_settings(&SamplerSettings::default())
    }
}

impl Sampler {
    pub fn new(max_attempts: u32, filter: SampleFilter) -> Self {
        Self {
            max_attempts,
            filter,
        }
    }

    pub fn from_settings(settings: &SamplerSettings) -> Self {
        Self::new(settings.max_attempts, settings.filter)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// One filtered draw of `count` values around `mean`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, mean: f64, count: usize) -> Result<Vec<i64>> {
        let normal = Normal::new(mean, 1.0)
            .map_err(|e| StreakError::InvalidArgument(format!("mean {mean}: {e}")))?;
        Ok((0..count)
            .map(|_| normal.sample(rng) as i64)
            .filter(|&v| self.filter.retains(v))
            .collect())
    }

    /// Redraw until the retained values sum to within `[min_sum, max_sum]`.
    ///
    /// The returned sequence may be shorter than `count` when the filter drops
    /// values; callers needing an exact length must check it.
    pub fn sample_bounded<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mean: f64,
        count: usize,
        min_sum: i64,
        max_sum: i64,
    ) -> Result<Vec<i64>> {
        if min_sum > max_sum {
            return Err(StreakError::InvalidArgument(format!(
                "empty sum range [{min_sum}, {max_sum}]"
            )));
        }

        for attempt in 1..=self.max_attempts {
            let numbers = self.draw(rng, mean, count)?;
            let total: i64 = numbers.iter().sum();
            if (min_sum..=max_sum).contains(&total) {
                debug!(attempt, total, len = numbers.len(), "bounded sample accepted");
                return Ok(numbers);
            }
        }

        Err(StreakError::SamplerExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sums_always_land_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let sampler = Sampler::default();
        for _ in 0..50 {
            let numbers = sampler
                .sample_bounded(&mut rng, 5.0 / 3.0, 29, 50, 60)
                .unwrap();
            let total: i64 = numbers.iter().sum();
            assert!((50..=60).contains(&total), "sum {total}");
            assert_eq!(numbers.len(), 29);
        }
    }

    #[test]
    fn draws_truncate_toward_zero_around_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let sampler = Sampler::default();
        let mut sum = 0i64;
        let mut n = 0usize;
        for _ in 0..2000 {
            let values = sampler.draw(&mut rng, 5.0 / 3.0, 29).unwrap();
            n += values.len();
            sum += values.iter().sum::<i64>();
        }
        let per_value = sum as f64 / n as f64;
        // Truncating N(5/3, 1) toward zero averages about 1.22.
        assert!((1.1..1.35).contains(&per_value), "{per_value}");
    }

    #[test]
    fn permissive_filter_keeps_everything() {
        for v in [-3, -1, 0, 3, 4, 9] {
            assert!(SampleFilter::Permissive.retains(v));
        }
    }

    #[test]
    fn strict_filter_keeps_zero_to_three() {
        assert!(!SampleFilter::Strict.retains(-1));
        assert!(SampleFilter::Strict.retains(0));
        assert!(SampleFilter::Strict.retains(3));
        assert!(!SampleFilter::Strict.retains(4));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let values = Sampler::new(100, SampleFilter::Strict)
            .draw(&mut rng, 5.0 / 3.0, 500)
            .unwrap();
        assert!(values.iter().all(|v| (0..4).contains(v)));
        assert!(values.len() <= 500);
    }

    #[test]
    fn unreachable_range_is_reported_not_looped() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = Sampler::new(50, SampleFilter::Permissive)
            .sample_bounded(&mut rng, 0.0, 5, 1000, 2000)
            .unwrap_err();
        assert!(matches!(err, StreakError::SamplerExhausted { attempts: 50 }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = Sampler::default()
            .sample_bounded(&mut rng, 1.0, 5, 10, 1)
            .unwrap_err();
        assert!(matches!(err, StreakError::InvalidArgument(_)));
    }
}
