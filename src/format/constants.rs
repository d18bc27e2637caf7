/// ADFS image sizes, offsets and markers

/// S format image length (40 tracks, 16 sectors, 256 bytes)
pub const ADFS_S_SIZE: usize = 163_840;

/// M format image length (80 tracks, 16 sectors, 256 bytes)
pub const ADFS_M_SIZE: usize = 327_680;

/// L format image length (160 tracks, 16 sectors, 256 bytes)
pub const ADFS_L_SIZE: usize = 655_360;

/// D and E format image length (80 tracks, 10 sectors, 1024 bytes)
pub const ADFS_800K_SIZE: usize = 819_200;

/// F format image length (80 tracks, 20 sectors, 1024 bytes)
pub const ADFS_F_SIZE: usize = 1_638_400;

/// Old-style directory marker
pub const HUGO: &[u8; 4] = b"Hugo";

/// New-style directory marker
pub const NICK: &[u8; 4] = b"Nick";

/// Size of a catalogue entry in bytes
pub const DIR_ENTRY_SIZE: usize = 26;

/// Offset of the first catalogue entry (after sequence byte and marker)
pub const DIR_ENTRIES_OFFSET: usize = 5;

/// Maximum entries in an S, M or L format directory
pub const OLD_DIR_MAX_ENTRIES: usize = 47;

/// Maximum entries in a D, E or F format directory
pub const NEW_DIR_MAX_ENTRIES: usize = 77;

/// Catalogue attribute bit marking a directory
pub const ATTR_DIRECTORY: u8 = 0x08;

/// Unit for legacy indirect disc addresses
pub const OLD_ADDRESS_UNIT: usize = 256;

/// Offset of the disc record within an E format map
pub const E_DISC_RECORD_OFFSET: usize = 0x04;

/// E format map zone header offset
pub const E_MAP_HEADER: usize = 0x000;

/// E format allocation map start
pub const E_MAP_START: usize = 0x040;

/// E format allocation map end
pub const E_MAP_END: usize = 0x400;

/// F format map zone header offset
pub const F_MAP_HEADER: usize = 0xC6800;

/// F format allocation map start
pub const F_MAP_START: usize = 0xC6840;

/// F format allocation map end
pub const F_MAP_END: usize = 0xC7800;

/// Offset of the disc record within an F format map
pub const F_DISC_RECORD_OFFSET: usize = 0xC6804;

/// Where a D format root directory marker normally sits
pub const D_ROOT_PROBE: usize = 0x401;

/// Where an E format root directory marker normally sits
pub const E_ROOT_PROBE: usize = 0x801;

/// Zone header bytes skipped at the start of each map zone
pub const ZONE_HEADER_SIZE: usize = 4;

/// Fixed sector size expected of an 800K E format disc record
pub const E_SECTOR_SIZE: u32 = 1024;

/// Fallback disc name
pub const UNTITLED: &str = "Untitled";

/// Name of the root directory
pub const ROOT_NAME: &str = "$";
