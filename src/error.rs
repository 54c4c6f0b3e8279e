use std::path::PathBuf;

use thiserror::Error;

/// Library-level errors using thiserror for structured error handling.
///
/// Only hard failures surface here: a sound file that does not exist when it
/// is registered, or a player binary that cannot be found or started. All
/// process-state misuse (pausing an idle sound, waiting on an infinite loop,
/// stopping an already-dead process) degrades to a logged no-op instead, so
/// bulk teardown paths never need per-call error branching.

#[derive(Error, Debug)]
pub enum Error {
    #[error("Sound file not found: {path}")]
    SoundFileNotFound { path: PathBuf },

    #[error("Player binary not found: {path}")]
    PlayerNotFound { path: PathBuf },

    #[error("Failed to spawn player process for {path}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::SoundFileNotFound {
            path: PathBuf::from("missing.mp3"),
        };
        assert_eq!(err.to_string(), "Sound file not found: missing.mp3");

        let err = Error::PlayerNotFound {
            path: PathBuf::from("/opt/ffplay"),
        };
        assert_eq!(err.to_string(), "Player binary not found: /opt/ffplay");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::SpawnFailed {
            path: PathBuf::from("track.mp3"),
            source: io_err,
        };

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Failed to spawn player process for track.mp3");
    }
}
