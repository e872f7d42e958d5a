pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod git;
pub mod grid;
pub mod model;
pub mod redistribute;
pub mod replay;
pub mod rewrite;
pub mod sampler;
pub mod scan;
pub mod streak;
pub mod util;

pub use error::{Result, StreakError};
