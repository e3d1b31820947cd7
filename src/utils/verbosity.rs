use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level, passed on to `env_logger` through `RUST_LOG`.
///
/// ```rust
/// use biophylo::Verbosity;
/// assert_eq!(Verbosity::default().to_string(), "info");
/// assert_eq!(Verbosity::Debug.to_string(), "debug");
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
