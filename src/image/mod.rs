/// Decoded ADFS disc images

use crate::error::{AdfsError, Result};
use crate::filesystem::{Catalogue, DirectoryNode, Listing, NewCatalogue, Node, OldCatalogue};
use crate::format::*;
use crate::log::VerificationLog;
use crate::map::{AddressTranslation, AllocationMap, MapRegion};
use std::path::Path;

/// Smallest sector size a disc record may give
const MIN_SECTOR_SIZE: u32 = 256;

/// Options controlling how an image is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail if an 800K image can't be identified as D or E format.
    /// Otherwise it is decoded as D format after logging an Error.
    pub strict_identification: bool,
    /// Rearrange interleaved tracks before decoding
    pub deinterleave: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_identification: true,
            deinterleave: true,
        }
    }
}

impl DecodeOptions {
    /// Create the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether unidentified 800K images are an error
    pub fn with_strict_identification(mut self, strict: bool) -> Self {
        self.strict_identification = strict;
        self
    }

    /// Set whether interleaved tracks are rearranged
    pub fn with_deinterleave(mut self, deinterleave: bool) -> Self {
        self.deinterleave = deinterleave;
        self
    }
}

/// A decoded ADFS floppy disc image
///
/// Construction identifies the format, reads the allocation map where the
/// format has one, and walks the whole catalogue. Anything unexpected on
/// the way is recorded in the [`VerificationLog`] rather than failing.
#[derive(Debug, Clone)]
pub struct Disc {
    geometry: DiscGeometry,
    format: DiscFormat,
    data: Vec<u8>,
    disc_name: String,
    record: Option<DiscRecord>,
    map: Option<AllocationMap>,
    root: DirectoryNode,
    log: VerificationLog,
}

impl Disc {
    /// Open and decode an ADF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    /// Open and decode an ADF file with the given options
    pub fn open_with<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        Self::from_bytes_with(crate::io::read_adf(path)?, options)
    }

    /// Decode an image held in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(data, DecodeOptions::default())
    }

    /// Decode an image held in memory with the given options
    pub fn from_bytes_with(data: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        let mut log = VerificationLog::new();
        let (geometry, format) = detect_format(&data, &mut log)?;

        let format = match format {
            Some(format) => format,
            None if options.strict_identification => {
                return Err(AdfsError::unidentified(data.len()));
            }
            None => {
                tracing::debug!("decoding unidentified 800K image as D format");
                DiscFormat::AdfsD
            }
        };

        let data = if options.deinterleave {
            crate::io::sequence_tracks(data, &geometry)?
        } else {
            data
        };

        let (record, map, catalogue) = if format.is_map_based() {
            let (record, map, sector_size) = read_map(&data, format, &geometry, &mut log);
            let catalogue = NewCatalogue::new(&data, format, &map, sector_size).read(&mut log);
            (record, Some(map), catalogue)
        } else {
            let catalogue = OldCatalogue::new(&data, format).read(&mut log);
            (None, None, catalogue)
        };

        let Catalogue { disc_name, root } = catalogue;
        let disc_name = record
            .as_ref()
            .map(|r| r.disc_name.clone())
            .or(disc_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        tracing::debug!(
            format = format.name(),
            disc_name = %disc_name,
            files = root.file_count(),
            warnings = log.count(crate::log::Severity::Warning),
            "decoded disc"
        );

        Ok(Self {
            geometry,
            format,
            data,
            disc_name,
            record,
            map,
            root,
            log,
        })
    }

    /// Get the physical geometry
    pub fn geometry(&self) -> DiscGeometry {
        self.geometry
    }

    /// Get the layout variant
    pub fn format(&self) -> DiscFormat {
        self.format
    }

    /// Get a human-readable name for the layout, e.g. "ADFS E format"
    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    /// Get the disc name ("Untitled" if the disc doesn't record one)
    pub fn disc_name(&self) -> &str {
        &self.disc_name
    }

    /// Get the root directory
    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    /// Get the verification log
    pub fn log(&self) -> &VerificationLog {
        &self.log
    }

    /// Get the image bytes in logical track order
    pub fn sectors(&self) -> &[u8] {
        &self.data
    }

    /// Get the disc record (E and F formats)
    pub fn record(&self) -> Option<&DiscRecord> {
        self.record.as_ref()
    }

    /// Get the allocation map (E and F formats)
    pub fn map(&self) -> Option<&AllocationMap> {
        self.map.as_ref()
    }

    /// Find an object by path, e.g. `$.Games.Elite`
    pub fn find(&self, path: &str) -> Option<&Node> {
        self.root.find(path)
    }

    /// List the catalogue with load and execution addresses
    pub fn listing(&self) -> Listing<'_> {
        Listing::new(&self.root)
    }
}

/// Read the disc record and allocation map of an E or F format disc
///
/// Returns the record, the map and the sector size objects are addressed in.
fn read_map(
    data: &[u8],
    format: DiscFormat,
    geometry: &DiscGeometry,
    log: &mut VerificationLog,
) -> (Option<DiscRecord>, AllocationMap, usize) {
    let (header, start, end, record_offset) = match format {
        DiscFormat::AdfsF => (F_MAP_HEADER, F_MAP_START, F_MAP_END, F_DISC_RECORD_OFFSET),
        _ => (E_MAP_HEADER, E_MAP_START, E_MAP_END, E_DISC_RECORD_OFFSET),
    };

    let record = DiscRecord::parse(data, record_offset);
    let sector_size = match record.as_ref().map(DiscRecord::sector_size) {
        Some(size) if size >= MIN_SECTOR_SIZE => size as usize,
        _ => {
            log.warning(format!(
                "No usable sector size in disc record at {:x}; assuming {} bytes",
                record_offset, geometry.sector_size
            ));
            usize::from(geometry.sector_size)
        }
    };

    let translation = match format {
        DiscFormat::AdfsF => AddressTranslation::BigZoned,
        _ => AddressTranslation::Zoned { sector_size },
    };
    let map = AllocationMap::read(data, MapRegion::new(header, start, end, sector_size), translation);

    if let Some(defects) = map.defect_count() {
        log.inform(format!(
            "{} mapped {} found.",
            defects,
            if defects == 1 { "defect" } else { "defects" }
        ));
    }

    (record, map, sector_size)
}
