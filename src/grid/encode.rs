use super::glyphs::{glyph, ROWS};
use crate::error::{Result, StreakError};
use crate::model::SECONDS_PER_DAY;
use rand::Rng;

/// Pixels are drawn from 05:00 plus up to a minute of jitter.
pub const DAY_START: i64 = 5 * 3600;
pub const JITTER_MAX: i64 = 60;
/// Each successive pixel is stamped this much later in its day.
pub const PIXEL_STEP: i64 = 60;

/// Time of day handed out to successive pixels.
#[derive(Debug, Clone)]
pub struct PixelClock {
    time_in_day: i64,
}

impl PixelClock {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::starting_at(DAY_START + rng.random_range(0..=JITTER_MAX))
    }

    pub fn starting_at(time_in_day: i64) -> Self {
        Self { time_in_day }
    }

    pub fn tick(&mut self) -> i64 {
        let current = self.time_in_day;
        self.time_in_day += PIXEL_STEP;
        current
    }
}

/// Grid cells for `text`, characters laid out left to right.
pub fn encode_string(text: &str) -> Result<Vec<u32>> {
    let mut cells = Vec::new();
    let mut offset = 0;
    for c in text.chars() {
        let glyph = glyph(c).ok_or(StreakError::UnsupportedCharacter(c))?;
        cells.extend(glyph.pixels.iter().map(|&p| offset + p));
        offset += glyph.width * ROWS;
    }
    Ok(cells)
}

/// Timestamp for each cell, counting days from `start` (a midnight).
pub fn compute_dates(start: i64, cells: &[u32], clock: &mut PixelClock) -> Vec<i64> {
    cells
        .iter()
        .map(|&cell| start + i64::from(cell) * SECONDS_PER_DAY + clock.tick())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn q_is_its_fourteen_pixels() {
        assert_eq!(
            encode_string("q").unwrap(),
            vec![1, 2, 3, 7, 11, 14, 18, 21, 24, 25, 29, 30, 31, 32]
        );
    }

    #[test]
    fn second_character_is_shifted_by_first_width() {
        let h = encode_string("h").unwrap();
        let i = encode_string("i").unwrap();
        let hi = encode_string("hi").unwrap();

        let mut expected = h.clone();
        expected.extend(i.iter().map(|p| p + 5 * 7));
        assert_eq!(hi, expected);
    }

    #[test]
    fn space_only_advances() {
        let spaced = encode_string("a a").unwrap();
        let a = encode_string("a").unwrap();
        assert_eq!(spaced.len(), 2 * a.len());
        assert_eq!(spaced[a.len()], a[0] + (5 + 3) * 7);
    }

    #[test]
    fn unknown_character_fails_whole_encoding() {
        let err = encode_string("hi!").unwrap_err();
        assert!(matches!(err, StreakError::UnsupportedCharacter('!')));
        assert!(matches!(
            encode_string("!"),
            Err(StreakError::UnsupportedCharacter('!'))
        ));
    }

    #[test]
    fn pixels_on_the_same_day_get_distinct_times() {
        let start = 1_391_904_000;
        let mut clock = PixelClock::starting_at(DAY_START);
        let dates = compute_dates(start, &[3, 3], &mut clock);

        assert!(dates[0] < dates[1]);
        for d in &dates {
            assert_eq!((d - start) / SECONDS_PER_DAY, 3);
        }
        assert_eq!(dates[0], start + 3 * SECONDS_PER_DAY + DAY_START);
    }

    #[test]
    fn clock_starts_within_jitter() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            let first = PixelClock::new(&mut rng).tick();
            assert!((DAY_START..=DAY_START + JITTER_MAX).contains(&first));
        }
    }
}
