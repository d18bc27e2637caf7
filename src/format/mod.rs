/// ADFS format identification

/// Format constants
pub mod constants;
/// Physical disc geometry
pub mod geometry;
/// Disc record parsing
pub mod record;

pub use constants::*;
pub use geometry::DiscGeometry;
pub use record::{Density, DiscRecord};

use crate::error::{AdfsError, Result};
use crate::log::VerificationLog;

/// ADFS on-disc layout variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscFormat {
    /// S format: 160K, old map, old directories
    AdfsS,
    /// M format: 320K, old map, old directories
    AdfsM,
    /// L format: 640K, old map, old directories
    AdfsL,
    /// D format: 800K, old map, new directories
    AdfsD,
    /// E format: 800K, new map, new directories
    AdfsE,
    /// F format: 1600K, new map split into zones, new directories
    AdfsF,
}

impl DiscFormat {
    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            DiscFormat::AdfsS => "ADFS S format",
            DiscFormat::AdfsM => "ADFS M format",
            DiscFormat::AdfsL => "ADFS L format",
            DiscFormat::AdfsD => "ADFS D format",
            DiscFormat::AdfsE => "ADFS E format",
            DiscFormat::AdfsF => "ADFS F format",
        }
    }

    /// Directory markers accepted for this format
    pub fn dir_markers(&self) -> &'static [&'static [u8; 4]] {
        match self {
            DiscFormat::AdfsS | DiscFormat::AdfsM | DiscFormat::AdfsL => &[HUGO],
            DiscFormat::AdfsD | DiscFormat::AdfsE => &[HUGO, NICK],
            DiscFormat::AdfsF => &[NICK],
        }
    }

    /// Whether objects are located through the zoned allocation map
    pub fn is_map_based(&self) -> bool {
        matches!(self, DiscFormat::AdfsE | DiscFormat::AdfsF)
    }

    /// Offset of the root directory's head sector
    pub fn root_dir_address(&self) -> usize {
        match self {
            DiscFormat::AdfsS | DiscFormat::AdfsM | DiscFormat::AdfsL => 0x200,
            DiscFormat::AdfsD => 0x400,
            DiscFormat::AdfsE => 0x800,
            DiscFormat::AdfsF => 0xC8800,
        }
    }

    /// Maximum number of entries in one directory
    pub fn max_dir_entries(&self) -> usize {
        match self {
            DiscFormat::AdfsS | DiscFormat::AdfsM | DiscFormat::AdfsL => OLD_DIR_MAX_ENTRIES,
            _ => NEW_DIR_MAX_ENTRIES,
        }
    }

    /// Check whether four bytes are one of this format's directory markers
    pub fn is_dir_marker(&self, bytes: &[u8]) -> bool {
        self.dir_markers().iter().any(|m| m.as_slice() == bytes)
    }
}

impl std::fmt::Display for DiscFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identify the geometry and layout of an image from its length and content
///
/// `Ok(None)` means an 800K image that could not be told apart as D or E
/// format; an Error entry has already been logged.
pub fn detect_format(
    data: &[u8],
    log: &mut VerificationLog,
) -> Result<(DiscGeometry, Option<DiscFormat>)> {
    let length = data.len();
    let geometry =
        DiscGeometry::from_image_len(length).ok_or_else(|| AdfsError::unrecognized(length))?;

    let format = match length {
        ADFS_S_SIZE => Some(DiscFormat::AdfsS),
        ADFS_M_SIZE => Some(DiscFormat::AdfsM),
        ADFS_L_SIZE => Some(DiscFormat::AdfsL),
        ADFS_F_SIZE => Some(DiscFormat::AdfsF),
        _ => identify_800k(data, log),
    };

    tracing::debug!(length, ?format, "detected disc geometry");
    Ok((geometry, format))
}

/// Tell D and E format 800K images apart
///
/// An E format disc carries a disc record at offset 4; if every check
/// against it passes the disc is E format. Otherwise the usual root
/// directory locations are probed.
pub fn identify_800k(data: &[u8], log: &mut VerificationLog) -> Option<DiscFormat> {
    let checklist = e_format_checklist(data);

    log.inform("Checklist for E format discs:");
    for (description, passed) in &checklist {
        log.inform(format!(
            "{}: {}",
            description,
            if *passed { "yes" } else { "no" }
        ));
    }

    if checklist.iter().all(|(_, passed)| *passed) {
        log.inform("E format disc");
        return Some(DiscFormat::AdfsE);
    }

    let probe = |offset: usize| data.get(offset..offset + 4);
    let d_root = probe(D_ROOT_PROBE);
    let e_root = probe(E_ROOT_PROBE);

    if d_root == Some(HUGO.as_slice()) {
        log.inform("Found directory in typical place for the root directory of a D format disc.");
        Some(DiscFormat::AdfsD)
    } else if d_root == Some(NICK.as_slice()) {
        log.inform(
            "Found E-style directory in typical place for the root directory of a D format disc.",
        );
        Some(DiscFormat::AdfsD)
    } else if e_root == Some(NICK.as_slice()) {
        log.inform("Found directory in typical place for the root directory of an E format disc.");
        Some(DiscFormat::AdfsE)
    } else {
        log.error("Failed to find any information which would help determine the disc format.");
        None
    }
}

/// Evaluate the four E format checks against the disc record at offset 4
fn e_format_checklist(data: &[u8]) -> [(&'static str, bool); 4] {
    let record = DiscRecord::parse(data, E_DISC_RECORD_OFFSET);

    let length_matches = record
        .as_ref()
        .is_some_and(|r| r.disc_size as usize == data.len());
    let sector_size = record
        .as_ref()
        .is_some_and(|r| r.sector_size() == E_SECTOR_SIZE);
    let density = record
        .as_ref()
        .is_some_and(|r| r.density == Density::Double);
    let root_found = record
        .as_ref()
        .and_then(|r| r.root_dir_offset())
        .and_then(|root| root.checked_add(1))
        .and_then(|at| data.get(at..at.checked_add(4)?))
        .is_some_and(|word| word == HUGO.as_slice() || word == NICK.as_slice());

    [
        ("Length field matches image length", length_matches),
        ("Expected sector size (1024 bytes)", sector_size),
        ("Expected density (double)", density),
        ("Root directory at location given", root_found),
    ]
}
