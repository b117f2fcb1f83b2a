//! Flat error taxonomy shared by every decoder in this crate.

/// Errors produced while decoding prop trees, IFS archives, LZ streams,
/// texture lists, or while rendering XML.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("short read")]
    ShortRead,
    #[error("malformed: {0}")]
    Malformed(String),
    #[error("unsupported prop type")]
    UnsupportedType,
    #[error("unsupported compression method")]
    UnsupportedCompression,
    #[error("destination buffer too small")]
    NoSpace,
    #[error("allocation failure")]
    AllocationFailure,
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
