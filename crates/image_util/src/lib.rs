//! Logo validation without an imaging library.
//!
//! Bytes are sniffed for a PNG or JPEG signature, pixel dimensions are read
//! straight out of the header bytes, and the result is checked against an
//! immutable [`ImageLimits`] record before being re-encoded as a data URL.

pub mod cursor;
pub mod dimensions;
pub mod error;
pub mod format;
pub mod normalize;
pub mod shape;

pub use dimensions::{decode_dimensions, Dimensions};
pub use error::ImageError;
pub use format::{sniff_format, ImageFormat};
pub use normalize::{normalize, ImageAsset, ImageInput};
pub use shape::{validate_shape, ImageLimits};
