/// Zoned allocation map ("new map") decoding for E and F format discs
///
/// The map is a bit string in which each object's fragments are recorded
/// as an object id followed by zero bits up to a terminating set bit. On
/// these discs the id fields fall on byte boundaries, so the map is read as
/// a byte stream:
///
/// - every zone starts with a 4 byte header
/// - free space runs (see [`free_space`]) are skipped
/// - a 2 byte little-endian value gives the object id in its low 15 bits;
///   a set top bit ends the fragment immediately
/// - otherwise 0x00 bytes continue the fragment and 0x80 ends it
///
/// Anything else means the scan is out of step with the map, so it
/// restarts one byte after the start of the abandoned fragment.

/// Map offset to disc address translation
pub mod address;
/// Free space lists
pub mod free_space;

pub use address::AddressTranslation;
pub use free_space::{read_free_space, FreeSpaceEntry};

use crate::bytes::{bit_run, read_u16, read_u8};
use crate::format::ZONE_HEADER_SIZE;
use std::collections::BTreeMap;

/// Object id reserved for defective areas of the disc
pub const DEFECT_OBJECT_ID: u16 = 1;

/// A contiguous byte range of the disc image belonging to one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Offset of the first byte
    pub start: usize,
    /// Offset of the byte after the extent
    pub end: usize,
}

impl Extent {
    /// Create an extent
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes (0 if the extent is inverted)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the extent covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where the map lives in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRegion {
    /// Offset of the first zone header
    pub header: usize,
    /// Offset where allocation entries begin
    pub start: usize,
    /// Offset of the end of the map
    pub end: usize,
    /// Size of each zone in bytes
    pub zone_size: usize,
}

impl MapRegion {
    /// Create a map region; a zero zone size is treated as 1
    pub fn new(header: usize, start: usize, end: usize, zone_size: usize) -> Self {
        Self {
            header,
            start,
            end,
            zone_size: zone_size.max(1),
        }
    }
}

/// Scanner state between bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for the next object id
    Seeking,
    /// Inside a fragment that began at `start`
    InFragment { object_id: u16, start: usize },
}

/// Decoded allocation map
#[derive(Debug, Clone)]
pub struct AllocationMap {
    region: MapRegion,
    translation: AddressTranslation,
    free_space: Vec<FreeSpaceEntry>,
    objects: BTreeMap<u16, Vec<Extent>>,
}

impl AllocationMap {
    /// Read the free space lists and allocation entries from the map
    pub fn read(data: &[u8], region: MapRegion, translation: AddressTranslation) -> Self {
        let free_space = read_free_space(data, &region);
        let mut map = Self {
            region,
            translation,
            free_space,
            objects: BTreeMap::new(),
        };
        map.scan(data);
        tracing::debug!(
            objects = map.objects.len(),
            free = map.free_space.len(),
            "read allocation map"
        );
        map
    }

    /// Single forward pass over the map, backtracking on unexpected bytes
    fn scan(&mut self, data: &[u8]) {
        let region = self.region;
        let mut free = self.free_space.clone().into_iter().peekable();
        let mut next_zone = region.header.saturating_add(region.zone_size);
        let mut state = ScanState::Seeking;
        let mut a = region.start;

        while a < region.end {
            let mut next = a + 1;
            let zone_pos = a.saturating_sub(region.header) % region.zone_size;

            if zone_pos < ZONE_HEADER_SIZE {
                next = a + ZONE_HEADER_SIZE - zone_pos;
                next_zone = next_zone.saturating_add(region.zone_size);
                state = ScanState::Seeking;
            } else if let Some(entry) = free.next_if(|e| a >= e.start) {
                next = entry.end.max(a + 1);
                state = ScanState::Seeking;
            } else {
                match state {
                    ScanState::Seeking if next_zone.saturating_sub(a) >= 2 => {
                        let Some(value) = read_u16(data, a) else {
                            break;
                        };
                        let object_id = bit_run(u32::from(value), 0, 15) as u16;

                        // Zero is not a valid id; keep looking a byte at a time
                        if object_id != 0 {
                            next = a + 2;
                            self.objects.entry(object_id).or_default();

                            if value & 0x8000 == 0 {
                                state = ScanState::InFragment { object_id, start: a };
                            } else {
                                self.add_extent(object_id, a, next);
                            }
                        }
                    }
                    ScanState::Seeking => {}
                    ScanState::InFragment { object_id, start } => {
                        let Some(value) = read_u8(data, a) else {
                            break;
                        };
                        match value {
                            0x00 => {}
                            0x80 => {
                                self.add_extent(object_id, start, a + 1);
                                state = ScanState::Seeking;
                            }
                            _ => {
                                tracing::trace!(
                                    "map backtrack from {:#x} to {:#x}",
                                    a,
                                    start + 1
                                );
                                next = start + 1;
                                state = ScanState::Seeking;
                            }
                        }
                    }
                }
            }

            a = next;
        }
    }

    /// Translate a fragment's map range and append it to the object
    fn add_extent(&mut self, object_id: u16, from: usize, to: usize) {
        let start = self.translation.translate(from, self.region.start, object_id);
        let end = self.translation.translate(to, self.region.start, object_id);
        let (Some(start), Some(end)) = (start, end) else {
            tracing::trace!(object_id, "fragment at {:#x} is outside the disc", from);
            return;
        };

        let extent = Extent::new(start, end);
        let extents = self.objects.entry(object_id).or_default();
        if extents.last() != Some(&extent) {
            extents.push(extent);
        }
    }

    /// Extents of an object in on-disc fragment order
    pub fn extents(&self, object_id: u16) -> &[Extent] {
        self.objects
            .get(&object_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether an object id appears in the map
    pub fn contains(&self, object_id: u16) -> bool {
        self.objects.contains_key(&object_id)
    }

    /// Object ids found in the map, in ascending order
    pub fn object_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.objects.keys().copied()
    }

    /// Number of defect fragments, if the map records any defects
    pub fn defect_count(&self) -> Option<usize> {
        self.objects.get(&DEFECT_OBJECT_ID).map(Vec::len)
    }

    /// Free space runs within the map
    pub fn free_space(&self) -> &[FreeSpaceEntry] {
        &self.free_space
    }

    /// The region this map was read from
    pub fn region(&self) -> MapRegion {
        self.region
    }

    /// Resolve a System Internal Number to the extents of its object
    ///
    /// The low byte of a SIN is a sector offset plus one into the object
    /// (0 for none), the remaining bits are the object id. Returns `None`
    /// when the object has no extents.
    pub fn resolve(&self, sin: u32, sector_size: usize) -> Option<Vec<Extent>> {
        let sector_offset = bit_run(sin, 0, 8) as usize;
        let object_id = bit_run(sin, 8, 16) as u16;

        let mut pieces = self.extents(object_id).to_vec();
        let first = pieces.first_mut()?;
        if sector_offset != 0 {
            first.start = first
                .start
                .saturating_add((sector_offset - 1).saturating_mul(sector_size));
        }
        Some(pieces)
    }
}
