/// ADF image reader
///
/// ADF files are raw sector dumps. Most are stored track by track, but
/// L format (640K) images interleave the two sides:
/// - Stored order: T0, T80, T1, T81, ... T79, T159
/// - Logical order: T0, T1, T2, ... T159

use crate::error::{AdfsError, Result};
use crate::format::DiscGeometry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// File extensions used for ADFS images
pub const ADFS_EXTENSIONS: &[&str] = &["adf", "adl", "adm", "ads", "add", "ade"];

/// Check if a file is likely an ADFS image based on extension
pub fn is_adfs_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ADFS_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Read an ADF file from disk into memory
pub fn read_adf<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut file = File::open(&path)?;
    let mut data = Vec::with_capacity(file.metadata().map(|m| m.len() as usize).unwrap_or(0));
    file.read_to_end(&mut data)?;

    tracing::debug!(
        path = %path.as_ref().display(),
        length = data.len(),
        "read ADF image"
    );
    Ok(data)
}

/// Rearrange interleaved tracks into logical order
///
/// Images whose geometry is not interleaved are returned unchanged. Fails
/// with [`AdfsError::Truncated`] if the image is shorter than the geometry.
pub fn sequence_tracks(data: Vec<u8>, geometry: &DiscGeometry) -> Result<Vec<u8>> {
    if !geometry.interleaved {
        return Ok(data);
    }

    let expected = geometry.total_capacity();
    if data.len() < expected {
        return Err(AdfsError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let track_size = geometry.track_size();
    let tracks = usize::from(geometry.num_tracks);
    let half = tracks / 2;
    let mut sequenced = Vec::with_capacity(expected);

    for track in 0..tracks {
        let stored = if track < half {
            track * 2
        } else {
            (track - half) * 2 + 1
        };
        let start = stored * track_size;
        sequenced.extend_from_slice(&data[start..start + track_size]);
    }

    Ok(sequenced)
}
