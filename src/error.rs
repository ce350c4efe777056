use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HopError {
    // Startup
    #[error("No credentials file found at: {}", path.display())]
    CredentialsNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    // Inventory
    #[error("Failed to list instances in {region}: {reason}")]
    Fetch { region: String, reason: String },

    // Cache
    #[error("Cache file {} is unreadable ({reason}); rerun with --refresh", path.display())]
    CacheRead { path: PathBuf, reason: String },

    #[error("Failed to write cache file {}: {reason}", path.display())]
    CacheWrite { path: PathBuf, reason: String },

    // Selection
    #[error("Probably not entered a number: '{input}'")]
    NotANumber { input: String },

    #[error("No selection entered")]
    NoInput,

    #[error("Failed to read selection: {reason}")]
    Prompt { reason: String },

    #[error("No such entry: {ordinal} (choose 1-{count})")]
    NoSuchEntry { ordinal: usize, count: usize },

    #[error("No instances to connect to")]
    NoMatches,

    // Launch
    #[error("Failed to start {program}: {reason}")]
    Launch { program: String, reason: String },
}

impl HopError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            HopError::CredentialsNotFound { .. } | HopError::Config(_) | HopError::NoMatches => 1,
            HopError::NotANumber { .. }
            | HopError::NoInput
            | HopError::Prompt { .. }
            | HopError::NoSuchEntry { .. } => 2,
            HopError::Fetch { .. } => 3,
            HopError::CacheRead { .. } | HopError::CacheWrite { .. } => 4,
            HopError::Launch { .. } => 5,
        }
    }

    /// End of input and interrupts mean the operator chose nothing; any other
    /// terminal failure keeps its cause.
    pub fn from_input_error(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted => HopError::NoInput,
            _ => HopError::Prompt {
                reason: e.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, HopError>;
