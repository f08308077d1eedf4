//! Error types for Wanderer
//!
//! Every command failure renders as a single human-readable line prefixed by
//! the name of the failing command, matching conventional shell diagnostics.
//! The shell catches these at the top level and prints them as error output;
//! no command failure ends the session.

use thiserror::Error;

use crate::fs::FsError;

/// Result type alias using Wanderer's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Wanderer error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Path syntax or lookup failure raised by the filesystem layer.
    #[error("{cmd}: {source}")]
    Fs {
        cmd: String,
        #[source]
        source: FsError,
    },

    /// A required file or folder does not exist.
    #[error("{cmd}: {path}: No such file or directory")]
    NoSuchFile { cmd: String, path: String },

    /// `cd` target does not exist.
    #[error("{cmd}: The directory {path} does not exist")]
    NoSuchDirectory { cmd: String, path: String },

    /// A folder was expected.
    #[error("{cmd}: '{path}' is not a directory")]
    NotADirectory { cmd: String, path: String },

    /// A file was expected.
    #[error("{cmd}: {path}: Is a directory")]
    IsADirectory { cmd: String, path: String },

    /// The target is a folder and `-r` was not given.
    #[error("{cmd}: cannot operate on directory '{path}' without -r")]
    DirectoryNeedsRecursive { cmd: String, path: String },

    /// Destination collision without `-f`.
    #[error("{cmd}: '{path}' already exists (use -f to overwrite)")]
    AlreadyExists { cmd: String, path: String },

    /// Source and destination name the same node.
    #[error("{cmd}: '{path}' and '{path}' are the same file")]
    SameFile { cmd: String, path: String },

    /// A folder cannot be copied into its own subtree.
    #[error("{cmd}: cannot copy a directory, '{from}', into itself, '{to}'")]
    IntoItself { cmd: String, from: String, to: String },

    /// A required argument is absent.
    #[error("{cmd}: missing operand")]
    MissingOperand { cmd: String },

    /// Unrecognized flag character.
    #[error("{cmd}: invalid option -- '{option}'")]
    InvalidOption { cmd: String, option: char },

    /// Invalid environment variable name.
    #[error("{cmd}: `{name}': not a valid identifier")]
    InvalidIdentifier { cmd: String, name: String },

    /// No active process has the given id.
    #[error("{cmd}: ({pid}) - No such process")]
    NoSuchProcess { cmd: String, pid: String },

    /// The command refuses to act on its target.
    #[error("{cmd}: {reason}")]
    Refused { cmd: String, reason: String },

    /// Shell dispatch found no matching executable.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// Either phase of a move failed.
    #[error("mv: cannot move '{from}' to '{to}': {cause}")]
    MoveFailed {
        from: String,
        to: String,
        cause: Box<Error>,
    },

    /// Persisted host state could not be encoded or decoded.
    #[error("storage error: {0}")]
    Storage(#[from] serde_json::Error),

    /// I/O error from a file-backed host store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach a command name to a filesystem error.
    pub fn fs(cmd: impl Into<String>, source: FsError) -> Self {
        Self::Fs {
            cmd: cmd.into(),
            source,
        }
    }

    pub fn no_such_file(cmd: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NoSuchFile {
            cmd: cmd.into(),
            path: path.into(),
        }
    }

    pub fn missing_operand(cmd: impl Into<String>) -> Self {
        Self::MissingOperand { cmd: cmd.into() }
    }
}
