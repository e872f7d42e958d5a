//! Pixel font for the contribution graph.
//!
//! Cells are numbered down each week column, then across:
//!
//! ```text
//! 0 7  14 21 28
//! 1 8  15 22 29
//! 2 9  16 23 30
//! 3 10 17 24 31
//! 4 11 18 25 32
//! 5 12 19 26 33
//! 6 13 20 27 34
//! ```
//!
//! Glyphs only use the top five rows, so a drawing that starts a day or two
//! late does not push pixels over into the next column.

/// Pixels of one character and its advance in columns, the trailing blank
/// column included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub pixels: &'static [u32],
    pub width: u32,
}

pub const ROWS: u32 = 7;
pub const USED_ROWS: u32 = 5;

const fn g(pixels: &'static [u32], width: u32) -> Glyph {
    Glyph { pixels, width }
}

pub fn glyph(c: char) -> Option<Glyph> {
    let glyph = match c {
        'a' => g(&[1, 2, 3, 4, 7, 9, 14, 16, 22, 23, 24, 25], 5),
        'b' => g(&[0, 1, 2, 3, 4, 7, 9, 11, 14, 16, 18, 22, 24], 6),
        'c' => g(&[1, 2, 3, 7, 11, 14, 18], 4),
        'd' => g(&[0, 1, 2, 3, 4, 7, 11, 14, 18, 22, 23, 24], 5),
        'e' => g(&[0, 1, 2, 3, 4, 7, 9, 11, 14, 18], 4),
        'f' => g(&[0, 1, 2, 3, 4, 7, 9, 14], 4),
        'g' => g(&[1, 2, 3, 7, 11, 14, 16, 18, 21, 23, 24, 25], 5),
        'h' => g(&[0, 1, 2, 3, 4, 9, 16, 21, 22, 23, 24, 25], 5),
        'i' => g(&[0, 4, 7, 8, 9, 10, 11, 14, 18], 4),
        'j' => g(&[3, 7, 11, 14, 15, 16, 17, 18, 21], 5),
        'k' => g(&[0, 1, 2, 3, 4, 9, 15, 17, 21, 25], 5),
        'l' => g(&[0, 1, 2, 3, 4, 11, 18], 4),
        'm' => g(&[0, 1, 2, 3, 4, 8, 16, 22, 28, 29, 30, 31, 32], 6),
        'n' => g(&[0, 1, 2, 3, 4, 8, 16, 24, 28, 29, 30, 31, 32], 6),
        'o' => g(&[1, 2, 3, 7, 11, 14, 18, 21, 25, 29, 30, 31], 6),
        'p' => g(&[0, 1, 2, 3, 4, 7, 9, 14, 16, 22], 5),
        'q' => g(&[1, 2, 3, 7, 11, 14, 18, 21, 24, 25, 29, 30, 31, 32], 6),
        'r' => g(&[0, 1, 2, 3, 4, 7, 9, 14, 16, 17, 22, 25], 5),
        's' => g(&[1, 7, 9, 11, 14, 16, 18, 21, 23, 25, 31], 6),
        't' => g(&[0, 7, 8, 9, 10, 11, 14], 4),
        'u' => g(&[0, 1, 2, 3, 11, 18, 25, 28, 29, 30, 31], 6),
        'v' => g(&[0, 1, 9, 10, 18, 23, 24, 28, 29], 6),
        'w' => g(&[0, 1, 2, 3, 4, 10, 16, 24, 28, 29, 30, 31, 32], 6),
        'x' => g(&[0, 4, 8, 10, 16, 22, 24, 28, 32], 6),
        'y' => g(&[0, 4, 8, 10, 16, 22, 28], 6),
        'z' => g(&[0, 4, 7, 10, 11, 14, 16, 22, 18, 21, 25, 28, 32], 6),
        ' ' => g(&[], 3),
        _ => return None,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_is_defined() {
        for c in 'a'..='z' {
            assert!(glyph(c).is_some(), "{c}");
        }
        assert!(glyph('!').is_none());
        assert!(glyph('A').is_none());
    }

    #[test]
    fn pixels_stay_in_top_rows_and_inside_advance() {
        for c in ('a'..='z').chain([' ']) {
            let Some(glyph) = glyph(c) else { continue };
            for &p in glyph.pixels {
                assert!(p % ROWS < USED_ROWS, "{c}: pixel {p} below row {USED_ROWS}");
                assert!(p / ROWS < glyph.width, "{c}: pixel {p} past its width");
            }
        }
    }
}
