//! Error types for sample resolution, catalog loading and file acquisition.

use thiserror::Error;

/// Shown when a sample could not be resolved for a reason other than every
/// candidate location failing.
pub const GENERIC_SAMPLE_FAILURE: &str = "Error loading sample image. Please try another one.";

/// Errors produced while resolving a sample entry into a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Every candidate location was tried and none produced bytes.
    #[error("no candidate location produced sample '{name}' (tried {attempts})")]
    Exhausted {
        /// Display name of the sample
        name: String,
        /// Number of locations attempted
        attempts: usize,
    },

    /// The selected id is not part of the loaded catalog.
    #[error("unknown sample id '{id}'")]
    UnknownSample {
        /// The id that was requested
        id: String,
    },
}

impl ResolveError {
    /// The message handed to the user-facing notifier.
    pub fn user_message(&self) -> String {
        match self {
            Self::Exhausted { name, .. } => format!(
                "Sorry, couldn't load sample image: {name}. Please try uploading your own image."
            ),
            Self::UnknownSample { .. } => GENERIC_SAMPLE_FAILURE.to_owned(),
        }
    }
}

/// Errors that can occur while loading the sample manifest.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error reading the manifest
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest is not valid JSON for a list of samples
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two entries share the same id
    #[error("duplicate sample id '{id}'")]
    DuplicateId {
        /// The repeated id
        id: String,
    },

    /// An entry has an empty path
    #[error("sample '{id}' has an empty path")]
    EmptyPath {
        /// Id of the offending entry
        id: String,
    },
}

/// Reasons a dropped or picked item does not become an acquired file.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// Not one of the accepted image kinds
    #[error("'{name}' is not an accepted image type")]
    Unsupported {
        /// File name as reported by the platform
        name: String,
    },

    /// The platform gave neither bytes nor a readable path
    #[error("'{name}' carries no content")]
    Empty {
        /// File name as reported by the platform
        name: String,
    },

    /// Reading the file from disk failed
    #[error("failed to read '{name}': {source}")]
    Unreadable {
        /// File name as reported by the platform
        name: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_the_sample() {
        let err = ResolveError::Exhausted {
            name: "Mountain Lake".to_owned(),
            attempts: 3,
        };
        assert_eq!(
            err.user_message(),
            "Sorry, couldn't load sample image: Mountain Lake. Please try uploading your own image."
        );
    }

    #[test]
    fn unknown_sample_uses_generic_message() {
        let err = ResolveError::UnknownSample { id: "nope".to_owned() };
        assert_eq!(err.user_message(), GENERIC_SAMPLE_FAILURE);
    }
}
