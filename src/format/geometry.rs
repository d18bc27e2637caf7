/// Physical disc geometry

use crate::format::constants::*;

/// Track and sector layout of a disc image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscGeometry {
    /// Number of tracks (both sides counted)
    pub num_tracks: u16,
    /// Sectors per track
    pub sectors_per_track: u8,
    /// Sector size in bytes
    pub sector_size: u16,
    /// Tracks stored alternately from each side (0, 80, 1, 81, ...)
    pub interleaved: bool,
}

impl DiscGeometry {
    /// Create a new geometry
    pub fn new(num_tracks: u16, sectors_per_track: u8, sector_size: u16) -> Self {
        Self {
            num_tracks,
            sectors_per_track,
            sector_size,
            interleaved: false,
        }
    }

    /// ADFS S format (160K, single sided)
    pub fn adfs_s() -> Self {
        Self::new(40, 16, 256)
    }

    /// ADFS M format (320K)
    pub fn adfs_m() -> Self {
        Self::new(80, 16, 256)
    }

    /// ADFS L format (640K, usually stored interleaved)
    pub fn adfs_l() -> Self {
        Self::new(160, 16, 256).with_interleave(true)
    }

    /// ADFS D and E formats (800K)
    pub fn adfs_800k() -> Self {
        Self::new(80, 10, 1024)
    }

    /// ADFS F format (1600K)
    pub fn adfs_f() -> Self {
        Self::new(80, 20, 1024)
    }

    /// Pick the geometry matching an image length
    pub fn from_image_len(length: usize) -> Option<Self> {
        match length {
            ADFS_S_SIZE => Some(Self::adfs_s()),
            ADFS_M_SIZE => Some(Self::adfs_m()),
            ADFS_L_SIZE => Some(Self::adfs_l()),
            ADFS_800K_SIZE => Some(Self::adfs_800k()),
            ADFS_F_SIZE => Some(Self::adfs_f()),
            _ => None,
        }
    }

    /// Bytes in one track
    pub fn track_size(&self) -> usize {
        self.sectors_per_track as usize * self.sector_size as usize
    }

    /// Total image capacity in bytes
    pub fn total_capacity(&self) -> usize {
        self.num_tracks as usize * self.track_size()
    }

    /// Set the interleave flag
    pub fn with_interleave(mut self, interleaved: bool) -> Self {
        self.interleaved = interleaved;
        self
    }
}
