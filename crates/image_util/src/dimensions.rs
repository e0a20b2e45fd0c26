use tracing::debug;

use crate::{cursor::ByteCursor, error::ImageError, format::ImageFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

const PNG_MIN_LEN: usize = 24;
const PNG_WIDTH_OFFSET: usize = 16;
const PNG_HEIGHT_OFFSET: usize = 20;

// Start-of-frame markers that do not carry frame dimensions.
const JPEG_DHT: u8 = 0xC4;
const JPEG_JPG: u8 = 0xC8;
const JPEG_DAC: u8 = 0xCC;

impl ImageFormat {
    pub fn decode_dimensions(&self, bytes: &[u8]) -> Result<Dimensions, ImageError> {
        match self {
            ImageFormat::Png => png_dimensions(bytes),
            ImageFormat::Jpeg => jpeg_dimensions(bytes),
        }
    }
}

/// Decodes dimensions for a MIME type, as declared by a caller.
pub fn decode_dimensions(mime: &str, bytes: &[u8]) -> Result<Dimensions, ImageError> {
    ImageFormat::from_mime(mime)?.decode_dimensions(bytes)
}

/// Reads IHDR width/height. IHDR must be the first chunk; chunks are not walked.
fn png_dimensions(bytes: &[u8]) -> Result<Dimensions, ImageError> {
    if bytes.len() < PNG_MIN_LEN {
        return Err(ImageError::InvalidPng(bytes.len()));
    }
    let cursor = ByteCursor::new(bytes);
    let invalid = |_| ImageError::InvalidPng(bytes.len());
    Ok(Dimensions {
        width: cursor.u32_be_at(PNG_WIDTH_OFFSET).map_err(invalid)?,
        height: cursor.u32_be_at(PNG_HEIGHT_OFFSET).map_err(invalid)?,
    })
}

fn is_frame_start(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, JPEG_DHT | JPEG_JPG | JPEG_DAC)
}

fn jpeg_dimensions(bytes: &[u8]) -> Result<Dimensions, ImageError> {
    let mut cursor = ByteCursor::new(bytes);
    cursor.seek(2);

    while cursor.has_remaining() {
        let at = cursor.position();
        if cursor.u8_at(at).map_err(|_| ImageError::CannotParseDimensions)? != 0xFF {
            cursor.skip(1);
            continue;
        }
        let marker = match cursor.u8_at(at + 1) {
            Ok(0) => {
                cursor.skip(1);
                continue;
            }
            Ok(marker) => marker,
            Err(_) => break,
        };
        let Ok(segment_len) = cursor.u16_be_at(at + 2) else {
            break;
        };

        debug!("jpeg marker {:#04x} at {}, segment length {}", marker, at, segment_len);
        if is_frame_start(marker) {
            let height = cursor
                .u16_be_at(at + 5)
                .map_err(|_| ImageError::CannotParseDimensions)?;
            let width = cursor
                .u16_be_at(at + 7)
                .map_err(|_| ImageError::CannotParseDimensions)?;
            return Ok(Dimensions {
                width: u32::from(width),
                height: u32::from(height),
            });
        }

        cursor.seek(at + 2 + usize::from(segment_len));
    }

    Err(ImageError::CannotParseDimensions)
}
