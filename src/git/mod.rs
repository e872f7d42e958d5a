pub mod command;
pub mod port;
pub mod repo;

pub use command::GitCli;
pub use port::{CommitRequest, VersionControl};
pub use repo::GitRepo;

#[cfg(test)]
pub(crate) mod fake;
