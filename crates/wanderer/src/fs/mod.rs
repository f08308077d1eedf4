//! Virtual filesystem for Wanderer
//!
//! - `node`: the file/folder tree model
//! - `path`: turning typed paths into root-relative segment lists
//! - `tree`: the owned [`FileSystem`] with lookups and mutations

mod node;
mod path;
mod tree;

use thiserror::Error;

pub use node::{File, Folder, Node, NodeKind, NodeRef, FILE_ICON, FOLDER_ICON};
pub use path::{is_within, path_to_string, resolve_absolute, split_parent};
pub use tree::{unique_name, FileSystem, ROOT_OWNER, UNTITLED, USER_OWNER};

/// Errors raised by path resolution and tree mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// The typed path contains characters outside the allowed set.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A folder on the way to the target does not exist.
    #[error("No such file or directory: {0}")]
    NoSuchPath(String),
}
