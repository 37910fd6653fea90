// Ordered directory tree recovered from an image

use serde::Serialize;
use std::io::{self, Write};

/// Name given to a directory created without one; marks the tree root.
pub const ROOT_NAME: &str = "ROOT";

/// True when `name` can be joined onto a host path as exactly one component:
/// not blank, not `.` or `..`, and free of separators, drive colons and NUL.
pub fn is_plain_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(&['/', '\\', ':', '\0'][..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// Leaf node owning the full contents of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    name: String,
    contents: Vec<u8>,
}

impl FileNode {
    /// Build a file node. `size` must equal `contents.len()`; a mismatch is a
    /// caller bug and panics.
    pub fn new(name: impl Into<String>, size: usize, contents: Vec<u8>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "file node requires a name");
        assert_eq!(size, contents.len(), "size of '{}' does not match its contents", name);
        Self { name, contents }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// Directory node. Children are kept sorted byte-wise by name at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    name: String,
    children: Vec<Node>,
}

impl DirectoryNode {
    /// Build an empty directory, named `ROOT` when no name is given.
    pub fn new(name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| ROOT_NAME.to_string());
        assert!(!name.is_empty(), "directory node requires a name");
        Self { name, children: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert `child` before the first existing child whose name sorts after it.
    /// Children with equal names keep their insertion order.
    pub fn insert_child(&mut self, child: impl Into<Node>) {
        let child = child.into();
        let key = child.name().as_bytes();
        let position = self
            .children
            .partition_point(|existing| existing.name().as_bytes() <= key);
        self.children.insert(position, child);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}

impl From<FileNode> for Node {
    fn from(node: FileNode) -> Self {
        Node::File(node)
    }
}

impl From<DirectoryNode> for Node {
    fn from(node: DirectoryNode) -> Self {
        Node::Directory(node)
    }
}

/// Counts of what a teardown released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownStats {
    pub files: usize,
    pub directories: usize,
    pub content_bytes: usize,
}

/// Serializable outline of a tree: names, kinds and sizes, no contents.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeSummary {
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSummary>,
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => file.name(),
            Node::Directory(dir) => dir.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    /// Pre-order rendering, one name per line, `indent_width` spaces per level.
    pub fn write_tree<W: Write>(&self, out: &mut W, indent_width: usize) -> io::Result<()> {
        self.write_subtree(out, indent_width, 0)
    }

    fn write_subtree<W: Write>(&self, out: &mut W, indent_width: usize, depth: usize) -> io::Result<()> {
        writeln!(out, "{:indent$}{}", "", self.name(), indent = indent_width * depth)?;
        if let Node::Directory(dir) = self {
            for child in &dir.children {
                child.write_subtree(out, indent_width, depth + 1)?;
            }
        }
        Ok(())
    }

    pub fn render(&self, indent_width: usize) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_tree(&mut buffer, indent_width);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Print the tree to stdout.
    pub fn print_tree(&self, indent_width: usize) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_tree(&mut lock, indent_width)?;
        lock.flush()
    }

    pub fn summary(&self) -> NodeSummary {
        match self {
            Node::File(file) => NodeSummary {
                name: file.name.clone(),
                kind: self.kind(),
                size: Some(file.size()),
                children: Vec::new(),
            },
            Node::Directory(dir) => NodeSummary {
                name: dir.name.clone(),
                kind: self.kind(),
                size: None,
                children: dir.children.iter().map(Node::summary).collect(),
            },
        }
    }

    /// Release the whole subtree, children before their parent.
    pub fn destroy(self) -> TeardownStats {
        let mut stats = TeardownStats::default();
        self.destroy_into(&mut stats);
        stats
    }

    fn destroy_into(self, stats: &mut TeardownStats) {
        match self {
            Node::File(file) => {
                stats.files += 1;
                stats.content_bytes += file.contents.len();
                drop(file);
            }
            Node::Directory(mut dir) => {
                for child in dir.children.drain(..) {
                    child.destroy_into(stats);
                }
                stats.directories += 1;
                drop(dir);
            }
        }
    }
}
