use crate::format::ImageFormat;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("unsupported image format, expected PNG or JPEG")]
    UnsupportedFormat,

    #[error("unsupported mime type: {0}")]
    UnsupportedMimeType(String),

    #[error("invalid PNG: header is {0} bytes, need at least 24")]
    InvalidPng(usize),

    #[error("cannot parse JPEG dimensions: no frame header found")]
    CannotParseDimensions,

    #[error("image is {len} bytes, limit is {max}")]
    TooManyBytes { len: usize, max: usize },

    #[error("image is {width}x{height}, minimum is {min}x{min}")]
    TooSmall { width: u32, height: u32, min: u32 },

    #[error("image is {width}x{height}, maximum is {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("image must be square: {width}x{height} differs by more than {tolerance}px")]
    NotSquare { width: u32, height: u32, tolerance: u32 },

    #[error("declared mime {declared} does not match detected {detected}")]
    MimeMismatch {
        declared: String,
        detected: ImageFormat,
    },

    #[error("malformed data URL, expected data:image/(png|jpeg);base64,<payload>")]
    InvalidDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
