// Error taxonomy shared by every pipeline stage

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CursorError {
    /// Signature or form mismatch, missing header, or a chunk overflowing the buffer.
    #[error("Malformed cursor container: {0}")]
    MalformedContainer(String),

    /// Frame too short for an icon header, or its bitmap could not be decoded.
    #[error("Invalid frame blob: {0}")]
    InvalidFrameBlob(String),

    #[error("No positive frame rate to use as the timing unit")]
    NoPositiveRate,

    #[error("Image codec failure: {0}")]
    CodecFailure(#[from] image::ImageError),

    #[error("Unsupported input kind: {0}")]
    UnsupportedInputKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CursorError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }

    pub(crate) fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrameBlob(msg.into())
    }
}

pub type CursorResult<T> = std::result::Result<T, CursorError>;
