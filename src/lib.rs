/*!
# adfs

A Rust library for reading Acorn ADFS floppy disc images.

## Features

- Identifies S, M, L, D, E and F format images from their length and content
- Decodes E and F format allocation maps, including fragmented objects
- Reads the whole catalogue into a tree of files and directories
- Decodes RISC OS filetypes and time stamps
- Records every inconsistency found in a verification log instead of failing

## Quick Start

```rust,no_run
use adfs::{Disc, Listing, Node};

// Open and decode an image
let disc = Disc::open("games.adf")?;
println!("{}: {}", disc.format_name(), disc.disc_name());

// Print the catalogue
print!("{}", Listing::new(disc.root()).with_filetypes(true));

// Find a file
if let Some(Node::File(file)) = disc.find("$.Games.Elite") {
    println!("{} bytes, filetype {:?}", file.data.len(), file.filetype());
}

// Report problems
print!("{}", disc.log());
# Ok::<(), adfs::AdfsError>(())
```

## ADFS Formats

| Format | Size  | Map          | Directories |
|--------|-------|--------------|-------------|
| S      | 160K  | old          | old         |
| M      | 320K  | old          | old         |
| L      | 640K  | old          | old         |
| D      | 800K  | old          | new         |
| E      | 800K  | new          | new         |
| F      | 1600K | new, 4 zones | new         |

## Modules

- `format`: format identification, geometry and disc records
- `map`: allocation map decoding and address translation
- `filesystem`: catalogue readers and the file tree
- `image`: the decoded `Disc`
- `log`: verification log
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Little-endian field readers and name sanitising
pub mod bytes;
/// Error types and Result alias
pub mod error;
/// Catalogue tree and directory readers
pub mod filesystem;
/// Format identification, geometry and disc records
pub mod format;
/// Decoded disc images
pub mod image;
/// I/O operations for loading ADF images
pub mod io;
/// Verification log
pub mod log;
/// Allocation map decoding
pub mod map;
/// RISC OS time stamps
pub mod timestamp;

// Re-export common types
pub use error::{AdfsError, Result};
pub use filesystem::{Catalogue, DirectoryNode, FileNode, Listing, Node};
pub use format::{detect_format, Density, DiscFormat, DiscGeometry, DiscRecord};
pub use image::{DecodeOptions, Disc};
pub use log::{LogEntry, Severity, VerificationLog};
pub use map::{AddressTranslation, AllocationMap, Extent, MapRegion};
