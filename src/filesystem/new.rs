/// Map-based catalogue reader for E and F format discs
///
/// Catalogue entries hold a System Internal Number instead of a disc
/// address. The allocation map turns it into the extents holding the
/// object, which need not be contiguous.

use crate::filesystem::entry::{read_entries, read_tail, CatalogueEntry};
use crate::filesystem::{gather_extents, Catalogue, DirectoryNode, DirectoryWalk, FileNode, Node};
use crate::format::{DiscFormat, ROOT_NAME};
use crate::log::VerificationLog;
use crate::map::AllocationMap;

/// Catalogue reader for discs with an allocation map
pub struct NewCatalogue<'a> {
    data: &'a [u8],
    format: DiscFormat,
    map: &'a AllocationMap,
    sector_size: usize,
}

impl<'a> NewCatalogue<'a> {
    /// Create a reader resolving objects through `map`
    pub fn new(data: &'a [u8], format: DiscFormat, map: &'a AllocationMap, sector_size: usize) -> Self {
        Self {
            data,
            format,
            map,
            sector_size,
        }
    }

    /// Read the whole catalogue from the root directory down
    pub fn read(&self, log: &mut VerificationLog) -> Catalogue {
        let mut walk = DirectoryWalk::new();
        let head = self.format.root_dir_address();
        let (name, children) = self.read_directory(head, &mut walk, log);
        tracing::debug!(directories = walk.read_count(), "read map-based catalogue");
        let name = if name.is_empty() { ROOT_NAME.to_string() } else { name };

        Catalogue {
            disc_name: None,
            root: DirectoryNode::new(name, children),
        }
    }

    fn read_directory(
        &self,
        head: usize,
        walk: &mut DirectoryWalk,
        log: &mut VerificationLog,
    ) -> (String, Vec<Node>) {
        let Some((sequence, entries)) = read_entries(self.data, head, self.format, log) else {
            return (String::new(), Vec::new());
        };

        walk.push(head);
        let mut children = Vec::with_capacity(entries.len());

        for entry in entries {
            if let Some(node) = self.read_entry(entry, walk, log) {
                children.push(node);
            }
        }

        walk.pop();

        let Some(tail) = read_tail(self.data, head, sequence, self.format, log) else {
            return (String::new(), children);
        };

        let name = if head == self.format.root_dir_address() {
            ROOT_NAME.to_string()
        } else {
            tail.name
        };
        (name, children)
    }

    fn read_entry(
        &self,
        entry: CatalogueEntry,
        walk: &mut DirectoryWalk,
        log: &mut VerificationLog,
    ) -> Option<Node> {
        let is_directory = entry.has_directory_attribute();

        let Some(extents) = self.map.resolve(entry.address, self.sector_size) else {
            if is_directory || entry.length != 0 {
                log.warning(format!(
                    "Couldn't find {}: {} (SIN {:x} at {:x}, attributes {:x})",
                    if is_directory { "directory" } else { "file" },
                    entry.name,
                    entry.address,
                    entry.offset + 22,
                    entry.attributes
                ));
                return None;
            }
            return Some(Node::File(FileNode {
                name: entry.name,
                load_address: entry.load_address,
                execution_address: entry.execution_address,
                length: 0,
                data: Vec::new(),
                sin: Some(entry.address),
            }));
        };

        if is_directory {
            // Every extent of a directory holds the same head, so the first
            // is enough
            let start = extents[0].start;
            let lower = if walk.may_enter(start, &entry.name, log) {
                self.read_directory(start, walk, log).1
            } else {
                Vec::new()
            };
            return Some(Node::Directory(DirectoryNode::new(entry.name, lower)));
        }

        let length = entry.length as usize;
        let data = gather_extents(self.data, &extents, length);
        if data.len() < length {
            log.warning(format!(
                "Truncated file: {} ({} of {} bytes)",
                entry.name,
                data.len(),
                length
            ));
        }

        Some(Node::File(FileNode {
            name: entry.name,
            load_address: entry.load_address,
            execution_address: entry.execution_address,
            length: entry.length,
            data,
            sin: Some(entry.address),
        }))
    }
}
