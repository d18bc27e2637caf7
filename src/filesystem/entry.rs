/// Catalogue entries and directory tails
///
/// Every directory starts with a sequence byte and a four byte marker,
/// followed by 26 byte entries terminated by a zero byte:
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 10   | Name (top bits of characters hold attributes) |
/// | 10     | 4    | Load address |
/// | 14     | 4    | Execution address |
/// | 18     | 4    | Length |
/// | 22     | 3    | Indirect disc address or SIN |
/// | 25     | 1    | Attributes / sequence number |
///
/// The directory ends with a tail holding its name, parent, title and a
/// repeat of the sequence byte and marker.

use crate::bytes::{last_top_bit, read_u24, read_u32, read_u8, safe_name};
use crate::format::{DiscFormat, ATTR_DIRECTORY, DIR_ENTRIES_OFFSET, DIR_ENTRY_SIZE};
use crate::log::VerificationLog;

/// A parsed 26 byte catalogue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Offset of the entry within the image
    pub offset: usize,
    /// Name with attribute bits removed
    pub name: String,
    /// 1-based position of the last name character with its top bit set
    pub top_set: usize,
    /// Load address
    pub load_address: u32,
    /// Execution address
    pub execution_address: u32,
    /// Declared length
    pub length: u32,
    /// Indirect disc address (legacy) or System Internal Number
    pub address: u32,
    /// Attribute byte
    pub attributes: u8,
}

impl CatalogueEntry {
    /// Parse an entry, or `None` if it runs past the image
    pub fn parse(data: &[u8], offset: usize) -> Option<Self> {
        let raw_name = data.get(offset..offset.checked_add(10)?)?;

        Some(Self {
            offset,
            name: safe_name(raw_name, false),
            top_set: last_top_bit(raw_name),
            load_address: read_u32(data, offset + 10)?,
            execution_address: read_u32(data, offset + 14)?,
            length: read_u32(data, offset + 18)?,
            address: read_u24(data, offset + 22)?,
            attributes: read_u8(data, offset + 25)?,
        })
    }

    /// Check the directory bit of the attribute byte
    pub fn has_directory_attribute(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }
}

/// Distance from a directory's head to its tail sector
pub const TAIL_OFFSET: usize = 0x400;

/// Where the fields of a directory tail sit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailLayout {
    /// 1280 byte directories of S, M and L format discs
    Old,
    /// 2048 byte directories of D, E and F format discs
    New,
}

impl TailLayout {
    /// Layout used by a disc format
    pub fn for_format(format: DiscFormat) -> Self {
        match format {
            DiscFormat::AdfsS | DiscFormat::AdfsM | DiscFormat::AdfsL => TailLayout::Old,
            _ => TailLayout::New,
        }
    }

    /// Size of the tail sector
    pub fn tail_size(&self) -> usize {
        match self {
            TailLayout::Old => 0x100,
            TailLayout::New => 0x400,
        }
    }
}

/// Fields read from the end of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTail {
    /// Directory name
    pub name: String,
    /// Raw parent address field
    pub parent: u32,
    /// Directory title
    pub title: String,
    /// Sequence byte, which must match the head's
    pub sequence: u8,
}

impl DirectoryTail {
    /// Parse a tail that ends at `end`, checking its marker
    ///
    /// Returns `None` if the marker is missing or the tail runs past the
    /// image.
    pub fn parse(data: &[u8], end: usize, layout: TailLayout, format: DiscFormat) -> Option<Self> {
        let field = |from: usize, to: usize| data.get(end.checked_sub(from)?..end.checked_sub(to)?);

        if !format.is_dir_marker(field(5, 1)?) {
            return None;
        }

        let (name, parent, title) = match layout {
            TailLayout::Old => ((52, 42), 42, (39, 20)),
            TailLayout::New => ((16, 6), 38, (35, 16)),
        };

        Some(Self {
            name: safe_name(field(name.0, name.1)?, false),
            parent: read_u24(data, end.checked_sub(parent)?)?,
            title: safe_name(field(title.0, title.1)?, true),
            sequence: read_u8(data, end.checked_sub(6)?)?,
        })
    }
}

/// Read and validate the tail of the directory whose head is at `head`
///
/// A missing marker logs a Warning and yields `None`. A sequence byte that
/// differs from the head's logs a Warning but still yields the tail.
pub fn read_tail(
    data: &[u8],
    head: usize,
    sequence: u8,
    format: DiscFormat,
    log: &mut VerificationLog,
) -> Option<DirectoryTail> {
    let layout = TailLayout::for_format(format);
    let tail = head.saturating_add(TAIL_OFFSET);
    let end = tail.saturating_add(layout.tail_size());

    let Some(parsed) = DirectoryTail::parse(data, end, layout, format) else {
        log.warning(format!(
            "Discrepancy in directory structure: [{:x}, {:x}]",
            head, tail
        ));
        return None;
    };

    if parsed.sequence != sequence {
        log.warning(format!(
            "Broken directory: {} at [{:x}, {:x}]",
            parsed.title, head, tail
        ));
    }
    Some(parsed)
}

/// Read the entries of the directory whose head is at `head`
///
/// Returns the head sequence byte and the entries, or `None` (with a
/// Warning logged) if there is no directory marker at `head`.
pub fn read_entries(
    data: &[u8],
    head: usize,
    format: DiscFormat,
    log: &mut VerificationLog,
) -> Option<(u8, Vec<CatalogueEntry>)> {
    let marker = head
        .checked_add(1)
        .and_then(|at| data.get(at..at.checked_add(4)?));
    let sequence = read_u8(data, head);

    let (Some(sequence), Some(marker)) = (sequence, marker) else {
        log.warning(format!("Not a directory: {:x}", head));
        return None;
    };
    if !format.is_dir_marker(marker) {
        log.warning(format!("Not a directory: {:x}", head));
        return None;
    }

    let mut entries = Vec::new();
    let mut offset = head + DIR_ENTRIES_OFFSET;

    while entries.len() < format.max_dir_entries() {
        match read_u8(data, offset) {
            Some(0) => break,
            Some(_) => {}
            None => {
                log.warning(format!("Directory at {:x} runs past the end of the disc", head));
                break;
            }
        }
        let Some(entry) = CatalogueEntry::parse(data, offset) else {
            log.warning(format!("Directory at {:x} runs past the end of the disc", head));
            break;
        };
        entries.push(entry);
        offset += DIR_ENTRY_SIZE;
    }

    Some((sequence, entries))
}
