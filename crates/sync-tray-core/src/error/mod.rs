use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Tray core errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An inbound frame could not be parsed.
    #[error("Protocol decode error: {reason} {location}")]
    ProtocolDecode {
        /// Description of what was wrong with the frame.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Downloading an image from the host failed.
    #[error("Image fetch failed: {reason} {location}")]
    ImageFetch {
        /// Description of the fetch failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error while caching images on disk.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for CoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
