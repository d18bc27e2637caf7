/// Flat catalogue reader for S, M, L and D format discs
///
/// Catalogue entries hold the disc address of an object divided by 256.
/// Objects are stored contiguously, so an entry's address and length are
/// enough to find its contents.

use crate::filesystem::entry::{read_entries, read_tail, CatalogueEntry};
use crate::filesystem::{gather_extents, Catalogue, DirectoryNode, DirectoryWalk, FileNode, Node};
use crate::format::{DiscFormat, OLD_ADDRESS_UNIT, ROOT_NAME};
use crate::log::VerificationLog;
use crate::map::Extent;

/// Length of an S, M or L format directory, used to spot directory entries
pub const OLD_DIR_LENGTH: u32 = 256 * 5;

/// Catalogue reader for discs without an allocation map
pub struct OldCatalogue<'a> {
    data: &'a [u8],
    format: DiscFormat,
}

impl<'a> OldCatalogue<'a> {
    /// Create a reader over an image in the given format
    pub fn new(data: &'a [u8], format: DiscFormat) -> Self {
        Self { data, format }
    }

    /// Read the whole catalogue from the root directory down
    pub fn read(&self, log: &mut VerificationLog) -> Catalogue {
        let mut disc_name = None;
        let mut walk = DirectoryWalk::new();
        let head = self.format.root_dir_address();

        let (name, children) = self.read_directory(head, &mut walk, &mut disc_name, log);
        tracing::debug!(directories = walk.read_count(), "read flat catalogue");
        let name = if name.is_empty() { ROOT_NAME.to_string() } else { name };

        Catalogue {
            disc_name,
            root: DirectoryNode::new(name, children),
        }
    }

    /// Decide whether an entry refers to a directory
    ///
    /// D format discs set attribute bit 3. The older formats have no
    /// reliable flag, so directories are recognised by their attribute
    /// characters and the fixed directory length.
    pub fn is_directory(&self, entry: &CatalogueEntry) -> bool {
        match self.format {
            DiscFormat::AdfsD => entry.has_directory_attribute(),
            _ => {
                (entry.load_address == 0 && entry.execution_address == 0 && entry.top_set > 2)
                    || (entry.top_set > 0 && entry.length == OLD_DIR_LENGTH)
            }
        }
    }

    fn read_directory(
        &self,
        head: usize,
        walk: &mut DirectoryWalk,
        disc_name: &mut Option<String>,
        log: &mut VerificationLog,
    ) -> (String, Vec<Node>) {
        let Some((sequence, entries)) = read_entries(self.data, head, self.format, log) else {
            return (String::new(), Vec::new());
        };

        walk.push(head);
        let mut children = Vec::with_capacity(entries.len());

        for entry in entries {
            let start = entry.address as usize * OLD_ADDRESS_UNIT;

            if self.is_directory(&entry) {
                let lower = if walk.may_enter(start, &entry.name, log) {
                    self.read_directory(start, walk, disc_name, log).1
                } else {
                    Vec::new()
                };
                children.push(Node::Directory(DirectoryNode::new(entry.name, lower)));
            } else {
                children.push(Node::File(self.read_file(entry, start, log)));
            }
        }

        walk.pop();

        let Some(tail) = read_tail(self.data, head, sequence, self.format, log) else {
            return (String::new(), children);
        };

        if tail.parent as usize * OLD_ADDRESS_UNIT == head {
            *disc_name = Some(tail.title.clone());
        }

        (tail.name, children)
    }

    fn read_file(&self, entry: CatalogueEntry, start: usize, log: &mut VerificationLog) -> FileNode {
        let length = entry.length as usize;
        let extent = Extent::new(start, start.saturating_add(length));
        let data = gather_extents(self.data, &[extent], length);

        if data.len() < length {
            log.warning(format!(
                "Truncated file: {} ({} of {} bytes)",
                entry.name,
                data.len(),
                length
            ));
        }

        FileNode {
            name: entry.name,
            load_address: entry.load_address,
            execution_address: entry.execution_address,
            length: entry.length,
            data,
            sin: None,
        }
    }
}
