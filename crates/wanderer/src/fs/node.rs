//! Filesystem node types

use serde::{Deserialize, Serialize};

/// Icon hint attached to newly created folders.
pub const FOLDER_ICON: &str = "folder";

/// Icon hint attached to newly created files.
pub const FILE_ICON: &str = "file";

/// A file or folder in the virtual tree.
///
/// Serialized with a `type` discriminator (`"file"` / `"folder"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(File),
    Folder(Folder),
}

/// A leaf node holding plain text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub content: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Name of the binary this file runs. A file is executable iff this is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// A node with an ordered list of children.
///
/// Insertion order is display and iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub files: Vec<Node>,
}

/// Borrowed view of a node, used by lookups that may return the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    File(&'a File),
    Folder(&'a Folder),
}

/// Payload for a node about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        content: String,
        command: Option<String>,
    },
    Folder {
        files: Vec<Node>,
    },
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            owner: owner.into(),
            icon: Some(FILE_ICON.to_string()),
            command: None,
        }
    }

    /// An executable file bound to the named binary.
    pub fn executable(name: impl Into<String>, command: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Self::new(name, "", owner)
        }
    }

    pub fn is_executable(&self) -> bool {
        self.command.is_some()
    }

    /// Size as reported by `ls -l`.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

impl Folder {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            icon: Some(FOLDER_ICON.to_string()),
            files: Vec::new(),
        }
    }

    /// Look up a direct child by exact name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.files.iter().find(|node| node.name() == name)
    }

    /// Look up a direct child folder by exact name.
    pub fn child_folder(&self, name: &str) -> Option<&Folder> {
        self.files.iter().find_map(|node| match node {
            Node::Folder(folder) if folder.name == name => Some(folder),
            _ => None,
        })
    }

    pub fn child_folder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        self.files.iter_mut().find_map(|node| match node {
            Node::Folder(folder) if folder.name == name => Some(folder),
            _ => None,
        })
    }

    /// Sum of the content lengths of the direct file children.
    pub fn size(&self) -> usize {
        self.files
            .iter()
            .filter_map(|node| match node {
                Node::File(file) => Some(file.size()),
                Node::Folder(_) => None,
            })
            .sum()
    }
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Folder(folder) => &folder.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Node::File(file) => file.name = name,
            Node::Folder(folder) => folder.name = name,
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            Node::File(file) => &file.owner,
            Node::Folder(folder) => &folder.owner,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::File(file) => NodeRef::File(file),
            Node::Folder(folder) => NodeRef::Folder(folder),
        }
    }

    /// Build a node from a name, payload and owner.
    pub fn from_kind(name: String, kind: NodeKind, owner: &str) -> Self {
        match kind {
            NodeKind::File { content, command } => Node::File(File {
                command,
                ..File::new(name, content, owner)
            }),
            NodeKind::Folder { files } => Node::Folder(Folder {
                files,
                ..Folder::new(name, owner)
            }),
        }
    }
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            NodeRef::File(file) => &file.name,
            NodeRef::Folder(folder) => &folder.name,
        }
    }

    pub fn owner(&self) -> &'a str {
        match *self {
            NodeRef::File(file) => &file.owner,
            NodeRef::Folder(folder) => &folder.owner,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeRef::Folder(_))
    }

    /// `file` or `folder`, as shown by `ls -l`.
    pub fn type_name(&self) -> &'static str {
        match *self {
            NodeRef::File(_) => "file",
            NodeRef::Folder(_) => "folder",
        }
    }

    pub fn size(&self) -> usize {
        match *self {
            NodeRef::File(file) => file.size(),
            NodeRef::Folder(folder) => folder.size(),
        }
    }

    /// Deep copy into an owned node.
    pub fn to_owned_node(&self) -> Node {
        match *self {
            NodeRef::File(file) => Node::File(file.clone()),
            NodeRef::Folder(folder) => Node::Folder(folder.clone()),
        }
    }
}
