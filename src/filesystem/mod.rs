/// Catalogue tree and directory readers

/// Catalogue entry and directory tail parsing
pub mod entry;
/// Catalogue listing
pub mod listing;
/// Map-based catalogue reader (E and F formats)
pub mod new;
/// Flat catalogue reader (S, M, L and D formats)
pub mod old;

pub use entry::{CatalogueEntry, DirectoryTail, TailLayout};
pub use listing::Listing;
pub use new::NewCatalogue;
pub use old::OldCatalogue;

use crate::log::VerificationLog;
use crate::map::Extent;
use crate::timestamp::{decode_timestamp, risc_os_time};
use chrono::{DateTime, Local};

/// Load address bits that mark a file as having a filetype and time stamp
pub const FILETYPE_MASK: u32 = 0xFFF0_0000;

/// Result of reading a disc's catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    /// Volume title recovered from the root directory, if any
    pub disc_name: Option<String>,
    /// Root directory
    pub root: DirectoryNode,
}

/// Most directories read in one catalogue walk
///
/// More than any floppy format can hold, so only a corrupt catalogue that
/// names the same directories over and over reaches it.
pub const MAX_DIRECTORIES: usize = 1024;

/// Directory heads on the current path, and how many have been read
#[derive(Debug, Default)]
pub(crate) struct DirectoryWalk {
    path: Vec<usize>,
    read: usize,
    exhausted: bool,
}

impl DirectoryWalk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check whether the directory `name` at `head` may be read
    ///
    /// Logs a Warning for a loop back to a directory on the current path,
    /// and once when [`MAX_DIRECTORIES`] have been read.
    pub(crate) fn may_enter(&mut self, head: usize, name: &str, log: &mut VerificationLog) -> bool {
        if self.path.contains(&head) {
            log.warning(format!("Directory loop at {:x}: {}", head, name));
            return false;
        }
        if self.read >= MAX_DIRECTORIES {
            if !self.exhausted {
                log.warning(format!(
                    "Directory limit of {} reached at {:x}: {}",
                    MAX_DIRECTORIES, head, name
                ));
                self.exhausted = true;
            }
            return false;
        }
        true
    }

    pub(crate) fn push(&mut self, head: usize) {
        self.path.push(head);
        self.read += 1;
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    /// Number of directories read so far
    pub(crate) fn read_count(&self) -> usize {
        self.read
    }
}

/// Concatenate the bytes of `extents`, stopping after `length` bytes
///
/// Extents reaching past the end of the image are clipped, so the result
/// may be shorter than `length`.
pub(crate) fn gather_extents(data: &[u8], extents: &[Extent], length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(length.min(data.len()));
    let mut remaining = length;

    for extent in extents {
        if remaining == 0 {
            break;
        }
        let amount = remaining.min(extent.len());
        let start = extent.start.min(data.len());
        let end = extent.start.saturating_add(amount).min(data.len());
        if let Some(bytes) = data.get(start..end) {
            out.extend_from_slice(bytes);
        }
        remaining -= amount;
    }

    out
}

/// A file or directory in the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A file
    File(FileNode),
    /// A directory
    Directory(DirectoryNode),
}

impl Node {
    /// Name of the object
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Directory(dir) => &dir.name,
        }
    }

    /// Check if this is a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Get the file, if this is one
    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    /// Get the directory, if this is one
    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }
}

/// A file and its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Load address, or filetype and time stamp high byte
    pub load_address: u32,
    /// Execution address, or time stamp low bytes
    pub execution_address: u32,
    /// Length declared in the catalogue
    pub length: u32,
    /// File contents, at most `length` bytes
    pub data: Vec<u8>,
    /// System Internal Number the file was located by (map-based discs)
    pub sin: Option<u32>,
}

impl FileNode {
    /// Check if the load address carries a filetype
    pub fn has_filetype(&self) -> bool {
        self.load_address & FILETYPE_MASK == FILETYPE_MASK
    }

    /// Raw 12-bit filetype field, whether or not it is valid
    pub fn filetype_code(&self) -> u16 {
        ((self.load_address >> 8) & 0xFFF) as u16
    }

    /// Filetype as three lowercase hex digits, if the file has one
    pub fn filetype(&self) -> Option<String> {
        self.has_filetype()
            .then(|| format!("{:03x}", self.filetype_code()))
    }

    /// Time stamp in local time, if the file has a filetype and the
    /// stamp is representable
    pub fn time_stamp(&self) -> Option<DateTime<Local>> {
        if !self.has_filetype() {
            return None;
        }
        let centiseconds = risc_os_time(self.load_address, self.execution_address);
        decode_timestamp(centiseconds as i64)
    }

    /// Check if fewer bytes were recovered than the catalogue declares
    pub fn is_truncated(&self) -> bool {
        self.data.len() < self.length as usize
    }
}

/// A directory and its contents, in catalogue order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Files and subdirectories
    pub children: Vec<Node>,
}

impl DirectoryNode {
    /// Create a directory
    pub fn new<S: Into<String>>(name: S, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the directory has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a direct child by name (case-insensitive, as ADFS is)
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|node| node.name().eq_ignore_ascii_case(name))
    }

    /// Find an object by a `.` separated path, with or without a leading `$`
    pub fn find(&self, path: &str) -> Option<&Node> {
        let path = path
            .strip_prefix("$.")
            .or_else(|| path.strip_prefix('$'))
            .unwrap_or(path);

        let mut parts = path.split('.').filter(|p| !p.is_empty());
        let mut node = self.get(parts.next()?)?;
        for part in parts {
            node = node.as_directory()?.get(part)?;
        }
        Some(node)
    }

    /// Every object below this directory, depth first, paired with its
    /// `.` separated path rooted at this directory's name
    pub fn walk(&self) -> Vec<(String, &Node)> {
        let mut out = Vec::new();
        self.walk_into(&self.name, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, path: &str, out: &mut Vec<(String, &'a Node)>) {
        for node in &self.children {
            let node_path = format!("{}.{}", path, node.name());
            if let Node::Directory(dir) = node {
                out.push((node_path.clone(), node));
                dir.walk_into(&node_path, out);
            } else {
                out.push((node_path, node));
            }
        }
    }

    /// Total number of files below this directory
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|node| match node {
                Node::File(_) => 1,
                Node::Directory(dir) => dir.file_count(),
            })
            .sum()
    }
}
