/// Map offset to disc address translation

/// Zone group span used by the F format translation.
///
/// Calibrated against real F format images; there is no documented
/// derivation.
pub const BIG_MAP_GROUP_SPAN: usize = 0xC8;

/// Bytes of disc per map byte on F format discs
pub const BIG_MAP_UNIT: usize = 0x200;

/// How map offsets become byte offsets on the disc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTranslation {
    /// Single-zone map: each map byte covers one sector
    Zoned {
        /// Sector size in bytes
        sector_size: usize,
    },
    /// Four-zone F format map: the object id selects a zone group whose
    /// span is removed before scaling
    BigZoned,
}

impl AddressTranslation {
    /// Translate a map offset to a disc byte offset
    ///
    /// Returns `None` when the result would fall before the start of the
    /// disc or overflow.
    pub fn translate(&self, map_offset: usize, map_start: usize, object_id: u16) -> Option<usize> {
        let relative = map_offset.checked_sub(map_start)?;
        match self {
            AddressTranslation::Zoned { sector_size } => relative.checked_mul(*sector_size),
            AddressTranslation::BigZoned => {
                let group = Self::zone_group(object_id);
                relative
                    .checked_sub(group * BIG_MAP_GROUP_SPAN)?
                    .checked_mul(BIG_MAP_UNIT)
            }
        }
    }

    /// Zone group (0 to 3) an F format object id belongs to
    pub fn zone_group(object_id: u16) -> usize {
        let mut upper = usize::from((object_id & 0x7F00) >> 8);
        if upper > 1 {
            upper -= 1;
        }
        upper.min(3)
    }
}
