//! In-memory filesystem tree
//!
//! The tree is owned by a [`FileSystem`] value that is passed explicitly to
//! every command. Nodes are addressed by their path from the root; renaming
//! or moving a node changes its identity. Every mutation is applied in place
//! and is visible to the next lookup.

use std::sync::LazyLock;

use regex::Regex;

use super::node::{File, Folder, Node, NodeKind, NodeRef};
use super::path::{path_to_string, split_parent};
use super::FsError;

/// Owner recorded on system nodes.
pub const ROOT_OWNER: &str = "root";

/// Owner recorded on nodes created by the unprivileged user.
pub const USER_OWNER: &str = "user";

/// Trailing ` (N)` added by [`unique_name`].
static UNIQUE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\(\d+\)$").unwrap()
});

/// Base used when a proposal is blank.
pub const UNTITLED: &str = "untitled";

/// Pick a name that does not collide with any sibling.
///
/// A trailing `(N)` suffix is stripped from the proposal first, then `base`,
/// `base (1)`, `base (2)`, … are probed in order. Names ending in a
/// parenthesised non-number are kept as they are. The result is never
/// empty: a proposal that is only a suffix is kept whole, a blank one
/// becomes [`UNTITLED`].
pub fn unique_name(siblings: &[Node], proposed: &str) -> String {
    let proposed = proposed.trim();
    let stripped = UNIQUE_SUFFIX.replace(proposed, "");
    let base = match stripped.trim() {
        "" if proposed.is_empty() => UNTITLED,
        "" => proposed,
        base => base,
    };

    let taken = |name: &str| siblings.iter().any(|node| node.name() == name);

    let mut candidate = base.to_string();
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{} ({})", base, counter);
        counter += 1;
    }
    candidate
}

/// The virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    root: Folder,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// Create a filesystem holding only the root folder.
    pub fn new() -> Self {
        Self {
            root: Folder::new("/", ROOT_OWNER),
        }
    }

    /// Create a filesystem from an existing root folder.
    pub fn from_root(root: Folder) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Find a folder by descending from the root.
    ///
    /// Returns `None` as soon as a segment does not name a child folder.
    pub fn find_folder(&self, segments: &[String]) -> Option<&Folder> {
        find_folder(&self.root, segments)
    }

    pub fn find_folder_mut(&mut self, segments: &[String]) -> Option<&mut Folder> {
        find_folder_mut(&mut self.root, segments)
    }

    /// Find a file or folder. The empty path is the root itself.
    pub fn find_node(&self, segments: &[String]) -> Option<NodeRef<'_>> {
        match split_parent(segments) {
            None => Some(NodeRef::Folder(&self.root)),
            Some((parent, name)) => self
                .find_folder(parent)?
                .child(name)
                .map(Node::as_node_ref),
        }
    }

    pub fn exists(&self, segments: &[String]) -> bool {
        self.find_node(segments).is_some()
    }

    /// Create a node under `parent`, renaming it if the name is taken.
    ///
    /// Returns the name the node was stored under.
    pub fn create_node(
        &mut self,
        parent: &[String],
        name: &str,
        kind: NodeKind,
        owner: &str,
    ) -> Result<String, FsError> {
        self.insert_node(parent, Node::from_kind(name.to_string(), kind, owner))
    }

    /// Append an already built node under `parent`, renaming it if the name
    /// is taken.
    pub fn insert_node(&mut self, parent: &[String], mut node: Node) -> Result<String, FsError> {
        let folder = self
            .find_folder_mut(parent)
            .ok_or_else(|| FsError::NoSuchPath(path_to_string(parent)))?;

        let final_name = unique_name(&folder.files, node.name());
        node.set_name(final_name.clone());
        folder.files.push(node);

        #[cfg(feature = "logging")]
        tracing::debug!(parent = %path_to_string(parent), name = %final_name, "node created");

        Ok(final_name)
    }

    /// Append `node` under `parent` keeping its name as-is.
    ///
    /// Fails if the parent is missing. The caller ensures the name is free.
    pub fn attach_node(&mut self, parent: &[String], node: Node) -> Result<(), FsError> {
        let folder = self
            .find_folder_mut(parent)
            .ok_or_else(|| FsError::NoSuchPath(path_to_string(parent)))?;

        #[cfg(feature = "logging")]
        tracing::debug!(parent = %path_to_string(parent), name = %node.name(), "node attached");

        folder.files.push(node);
        Ok(())
    }

    /// Remove the node at `segments` from its parent.
    ///
    /// Returns the removed node, or `None` when nothing matched. The root
    /// cannot be removed.
    pub fn delete_node(&mut self, segments: &[String]) -> Option<Node> {
        let (parent, name) = split_parent(segments)?;
        let folder = self.find_folder_mut(parent)?;
        let index = folder.files.iter().position(|node| node.name() == name)?;

        #[cfg(feature = "logging")]
        tracing::debug!(path = %path_to_string(segments), "node deleted");

        Some(folder.files.remove(index))
    }

    /// Mutable access to a file's content.
    pub fn file_mut(&mut self, segments: &[String]) -> Option<&mut File> {
        let (parent, name) = split_parent(segments)?;
        self.find_folder_mut(parent)?
            .files
            .iter_mut()
            .find_map(|node| match node {
                Node::File(file) if file.name == name => Some(file),
                _ => None,
            })
    }
}

fn find_folder<'a>(current: &'a Folder, segments: &[String]) -> Option<&'a Folder> {
    match segments.split_first() {
        None => Some(current),
        Some((next, rest)) => find_folder(current.child_folder(next)?, rest),
    }
}

fn find_folder_mut<'a>(current: &'a mut Folder, segments: &[String]) -> Option<&'a mut Folder> {
    match segments.split_first() {
        None => Some(current),
        Some((next, rest)) => find_folder_mut(current.child_folder_mut(next)?, rest),
    }
}
