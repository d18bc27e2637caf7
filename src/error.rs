use thiserror::Error;

/// Result type alias for ADFS operations
pub type Result<T> = std::result::Result<T, AdfsError>;

/// Errors that abort decoding of a disc image
///
/// Anything short of these is reported through the
/// [`VerificationLog`](crate::log::VerificationLog) instead.
#[derive(Debug, Error)]
pub enum AdfsError {
    /// I/O error occurred while reading an image file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image length matches none of the known disc geometries
    #[error("Unrecognized format: no ADFS geometry is {length} bytes long")]
    UnrecognizedFormat {
        /// Length of the image in bytes
        length: usize,
    },

    /// An 800K image could not be identified as either D or E format
    #[error("Unidentified format: {length} byte image is neither D nor E format")]
    UnidentifiedFormat {
        /// Length of the image in bytes
        length: usize,
    },

    /// Image is shorter than its geometry requires
    #[error("Truncated image: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the geometry
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}

impl AdfsError {
    /// Create an unrecognized format error
    pub fn unrecognized(length: usize) -> Self {
        AdfsError::UnrecognizedFormat { length }
    }

    /// Create an unidentified 800K format error
    pub fn unidentified(length: usize) -> Self {
        AdfsError::UnidentifiedFormat { length }
    }
}
