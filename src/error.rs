//! Error taxonomy for user-facing failures.
//!
//! Every error here is caught at the boundary of the action that triggered
//! it and shown in the status line; none of them are fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JukeboxError {
    /// A track could not be loaded into an engine (missing/corrupt local
    /// file, or a remote fetch failed). Session state is left unchanged.
    #[error("failed to load {location}: {reason}")]
    LoadFailure { location: String, reason: String },

    /// The search service call failed; the results list stays empty.
    #[error("search failed: {0}")]
    SearchFailure(String),

    /// A download failed; nothing is added to the playlist.
    #[error("download failed: {0}")]
    DownloadFailure(String),

    /// A library key has no entry. Displayed as "not found", not as a crash.
    #[error("track {0} not found in library")]
    MetadataNotFound(String),

    /// Rating input outside 1..=5 or non-numeric; the store is untouched.
    #[error("rating must be a number between 1 and 5")]
    RatingValidation,

    /// The metadata store could not be read or written.
    #[error("library store error: {0}")]
    Store(String),
}

impl JukeboxError {
    pub fn load(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::LoadFailure {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
