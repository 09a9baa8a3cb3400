use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Everything that can go wrong while converting recordings.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying file or stream I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The input could not be read as a JFR recording.
    #[error("could not load recording: {0}")]
    Recording(String),

    /// A stack frame's method could not be resolved.
    #[error("unresolvable stack frame: {0}")]
    Frame(String),

    /// The access-log end date did not match `dd/MMM/yyyy:HH:mm:ss Z`.
    #[error("malformed access log timestamp {input:?}")]
    Timestamp {
        /// The rejected date string.
        input: String,
        /// Parser detail.
        #[source]
        source: chrono::ParseError,
    },

    /// The access-log duration was not a millisecond count.
    #[error("malformed duration {input:?}")]
    Duration {
        /// The rejected duration string.
        input: String,
        /// Parser detail.
        #[source]
        source: ParseIntError,
    },
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
