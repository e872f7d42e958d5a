pub mod dates;
pub mod draw;
pub mod encode;
pub mod exec;
pub mod glyphs;

pub use dates::read_dates;
pub use draw::draw_pixels;
pub use encode::{compute_dates, encode_string, PixelClock};
pub use exec::{exec, DrawArgs};
pub use glyphs::{glyph, Glyph};
