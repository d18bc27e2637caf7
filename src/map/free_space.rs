/// Free space lists stored in each map zone

use crate::bytes::read_u16;
use crate::map::MapRegion;

/// A run of map bytes describing free space rather than an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpaceEntry {
    /// Map offset of the first byte
    pub start: usize,
    /// Map offset of the byte after the run
    pub end: usize,
}

/// Convert a free-space link (a bit offset, top bit ignored) to bytes
#[inline]
fn link_bytes(link: u16) -> usize {
    usize::from((link & 0x7FFF) >> 3)
}

/// Walk the free space list of every zone in the map
///
/// Each zone header holds a link at byte 1 to the first free run in the
/// zone. Every run begins with a link to the next run, relative to itself,
/// and ends at the first following byte with its top bit set. A zero link
/// ends the list for that zone.
pub fn read_free_space(data: &[u8], region: &MapRegion) -> Vec<FreeSpaceEntry> {
    let mut free_space = Vec::new();
    let mut zone = region.header;

    while zone < region.end {
        let next_zone = zone.saturating_add(region.zone_size);
        let link_at = zone + 1;

        let first = match read_u16(data, link_at) {
            Some(link) => link_bytes(link),
            None => break,
        };
        if first == 0 {
            zone = next_zone;
            continue;
        }

        let mut a = link_at + first;
        while a < next_zone {
            let next = match read_u16(data, a) {
                Some(link) => link_bytes(link),
                None => break,
            };

            let limit = next_zone.min(data.len());
            let end = (a + 1..limit)
                .find(|&b| data[b] & 0x80 != 0)
                .map(|b| b + 1)
                .unwrap_or(next_zone);

            free_space.push(FreeSpaceEntry { start: a, end });

            if next == 0 {
                break;
            }
            a += next;
        }

        zone = next_zone;
    }

    tracing::debug!(entries = free_space.len(), "read free space map");
    free_space
}
