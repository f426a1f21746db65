//! Error taxonomy for the generation pipeline.
//!
//! Every failure is local to a single invocation, deterministic for a given
//! input, and never retried: the caller distinguishes the three classes to
//! produce appropriate feedback.

use thiserror::Error;

/// The payload cannot be represented at any supported version for the
/// requested error correction level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Encoded payload length exceeds the capacity of version 40.
    #[error("payload needs {needed} bits but at most {available} fit at the requested level")]
    DataOverCapacity { needed: usize, available: usize },
}

/// An invalid rendering parameter. Surfaced before any pixels are
/// produced; no partial image is ever returned.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A color name outside the supported table.
    #[error("unknown color name `{0}`")]
    UnknownColor(String),

    /// A `#...` color that is not 3 or 6 hex digits.
    #[error("invalid hex color `{0}`")]
    InvalidHexColor(String),

    /// Modules must be at least one pixel on a side.
    #[error("module size must be a positive number of pixels")]
    ZeroModuleSize,

    /// The requested module size and border would produce an image larger
    /// than the supported maximum.
    #[error("rendered image would exceed {limit} pixels on a side")]
    ImageTooLarge { limit: u32 },

    /// PNG serialization failed.
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Pipeline error surface. Each variant maps to a distinct caller-visible
/// condition.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The supplied logo bytes are not a decodable image.
    #[error("logo is not a decodable image: {0}")]
    LogoDecode(#[source] image::ImageError),
}
