use std::fmt;

use crate::{cursor::ByteCursor, error::ImageError};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Maps a MIME type to a format. `image/jpg` is accepted as an alias.
    pub fn from_mime(mime: &str) -> Result<Self, ImageError> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Ok(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
            _ => Err(ImageError::UnsupportedMimeType(mime.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    let cursor = ByteCursor::new(bytes);
    if cursor.starts_with(&PNG_SIGNATURE) {
        Ok(ImageFormat::Png)
    } else if cursor.starts_with(&JPEG_SOI) {
        Ok(ImageFormat::Jpeg)
    } else {
        Err(ImageError::UnsupportedFormat)
    }
}
