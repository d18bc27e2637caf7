/// Disc record parsing for D, E and F format discs
///
/// Layout (offsets from the start of the record):
/// - 0: log2 of the sector size
/// - 1: sectors per track
/// - 2: heads
/// - 3: density (1 single, 2 double, 3 quad)
/// - 4: length of ID fields in the map
/// - 5: log2 of bytes per map bit
/// - 6: track skew
/// - 7: boot option
/// - 8: lowest sector number
/// - 9: number of zones
/// - 10-11: zone spare bits
/// - 13-15: root directory sector
/// - 16-19: disc size in bytes
/// - 20-21: disc ID
/// - 22-31: disc name

use crate::bytes::{read_u16, read_u24, read_u32, read_u8, safe_name};
use std::fmt;

/// Size of a disc record in bytes
pub const DISC_RECORD_SIZE: usize = 32;

/// Recording density
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    /// Single density
    Single,
    /// Double density
    Double,
    /// Quad density
    Quad,
    /// Any other density code
    Unknown(u8),
}

impl Density {
    /// Parse a density code
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Density::Single,
            2 => Density::Double,
            3 => Density::Quad,
            other => Density::Unknown(other),
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Single => write!(f, "single"),
            Density::Double => write!(f, "double"),
            Density::Quad => write!(f, "quad"),
            Density::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// Disc record describing the logical layout of a zoned disc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscRecord {
    /// log2 of the sector size
    pub log2_sector_size: u8,
    /// Sectors per track
    pub sectors_per_track: u8,
    /// Heads
    pub heads: u8,
    /// Recording density
    pub density: Density,
    /// Length of ID fields in the map, in bits
    pub id_length: u8,
    /// log2 of bytes per map bit
    pub log2_bytes_per_bit: u8,
    /// Track skew
    pub skew: u8,
    /// Boot option
    pub boot_option: u8,
    /// Lowest sector number
    pub low_sector: u8,
    /// Number of map zones
    pub zones: u8,
    /// Spare bits per zone
    pub zone_spare: u16,
    /// Root directory sector
    pub root_dir: u32,
    /// Disc size in bytes
    pub disc_size: u32,
    /// Disc ID
    pub disc_id: u16,
    /// Disc name, trimmed
    pub disc_name: String,
}

impl DiscRecord {
    /// Parse the record at `offset`, or `None` if it runs past the image
    pub fn parse(data: &[u8], offset: usize) -> Option<Self> {
        let raw_name = data.get(offset + 22..offset + DISC_RECORD_SIZE)?;

        Some(Self {
            log2_sector_size: read_u8(data, offset)?,
            sectors_per_track: read_u8(data, offset + 1)?,
            heads: read_u8(data, offset + 2)?,
            density: Density::from_code(read_u8(data, offset + 3)?),
            id_length: read_u8(data, offset + 4)?,
            log2_bytes_per_bit: read_u8(data, offset + 5)?,
            skew: read_u8(data, offset + 6)?,
            boot_option: read_u8(data, offset + 7)?,
            low_sector: read_u8(data, offset + 8)?,
            zones: read_u8(data, offset + 9)?,
            zone_spare: read_u16(data, offset + 10)?,
            root_dir: read_u24(data, offset + 13)?,
            disc_size: read_u32(data, offset + 16)?,
            disc_id: read_u16(data, offset + 20)?,
            disc_name: safe_name(raw_name, true).trim().to_string(),
        })
    }

    /// Sector size in bytes, or 0 if the exponent is out of range
    pub fn sector_size(&self) -> u32 {
        1u32.checked_shl(u32::from(self.log2_sector_size)).unwrap_or(0)
    }

    /// Bytes per map bit, or 0 if the exponent is out of range
    pub fn bytes_per_bit(&self) -> u32 {
        1u32.checked_shl(u32::from(self.log2_bytes_per_bit))
            .unwrap_or(0)
    }

    /// Byte offset of the root directory, if it fits in the address space
    pub fn root_dir_offset(&self) -> Option<usize> {
        (self.root_dir as usize).checked_mul(self.sector_size() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e_format_record() -> Vec<u8> {
        let mut data = vec![0u8; DISC_RECORD_SIZE];
        data[0] = 10; // 1024 byte sectors
        data[1] = 5;
        data[2] = 2;
        data[3] = 2; // double density
        data[4] = 15;
        data[5] = 7; // 128 bytes per bit
        data[9] = 1;
        data[12..16].copy_from_slice(&[0x03, 0x02, 0x00, 0x00]);
        data[16..20].copy_from_slice(&819_200u32.to_le_bytes());
        data[20..22].copy_from_slice(&0x1234u16.to_le_bytes());
        data[22..32].copy_from_slice(b"Games  \0\0\0");
        data
    }

    #[test]
    fn test_parse_record() {
        let record = DiscRecord::parse(&e_format_record(), 0).unwrap();
        assert_eq!(record.sector_size(), 1024);
        assert_eq!(record.sectors_per_track, 5);
        assert_eq!(record.heads, 2);
        assert_eq!(record.density, Density::Double);
        assert_eq!(record.id_length, 15);
        assert_eq!(record.bytes_per_bit(), 128);
        assert_eq!(record.zones, 1);
        assert_eq!(record.root_dir, 2);
        assert_eq!(record.root_dir_offset(), Some(0x800));
        assert_eq!(record.disc_size, 819_200);
        assert_eq!(record.disc_id, 0x1234);
        assert_eq!(record.disc_name, "Games");
    }

    #[test]
    fn test_parse_at_offset() {
        let mut data = vec![0xAAu8; 4];
        data.extend(e_format_record());
        let record = DiscRecord::parse(&data, 4).unwrap();
        assert_eq!(record.disc_size, 819_200);
    }

    #[test]
    fn test_truncated_record() {
        let data = e_format_record();
        assert!(DiscRecord::parse(&data[..20], 0).is_none());
        assert!(DiscRecord::parse(&data, 1).is_none());
    }

    #[test]
    fn test_density_codes() {
        assert_eq!(Density::from_code(1), Density::Single);
        assert_eq!(Density::from_code(3), Density::Quad);
        assert_eq!(Density::from_code(9), Density::Unknown(9));
        assert_eq!(Density::Unknown(0).to_string(), "unknown");
        assert_eq!(Density::Double.to_string(), "double");
    }

    #[test]
    fn test_oversized_exponent() {
        let mut data = e_format_record();
        data[0] = 40;
        let record = DiscRecord::parse(&data, 0).unwrap();
        assert_eq!(record.sector_size(), 0);
    }
}
