use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreakError>;

#[derive(Error, Debug)]
pub enum StreakError {
    #[error("Not enough commits in this repository: found {found}, need at least {required}")]
    InsufficientHistory { found: usize, required: usize },
    #[error("No {min_commits} commits within {window_days} days in any identity's history")]
    NoStreak { window_days: u32, min_commits: usize },
    #[error("The encoding for the character {0:?} is not defined")]
    UnsupportedCharacter(char),
    #[error("No bounded distribution found after {attempts} attempts")]
    SamplerExhausted { attempts: u32 },
    #[error("Malformed sample: expected {expected} values, got {got}")]
    MalformedSample { expected: usize, got: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("`git {command}` failed: {stderr}")]
    GitCommand { command: String, stderr: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

impl StreakError {
    /// Process exit code reported by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            StreakError::InvalidArgument(_) => 2,
            StreakError::UnsupportedCharacter(_) => 3,
            _ => 1,
        }
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for StreakError {
    fn from(err: gix::discover::Error) -> Self {
        StreakError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for StreakError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        StreakError::RefFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for StreakError {
    fn from(err: gix::object::commit::Error) -> Self {
        StreakError::Commit(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for StreakError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        StreakError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for StreakError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        StreakError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for StreakError {
    fn from(err: gix::objs::decode::Error) -> Self {
        StreakError::ObjectDecode(Box::new(err))
    }
}

impl From<toml::de::Error> for StreakError {
    fn from(err: toml::de::Error) -> Self {
        StreakError::Config(err.to_string())
    }
}
