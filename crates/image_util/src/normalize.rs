use std::path::PathBuf;

use base64::{prelude::BASE64_STANDARD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    dimensions::Dimensions,
    error::ImageError,
    format::{sniff_format, ImageFormat},
    shape::{validate_shape, ImageLimits},
};

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(image/(?:png|jpeg|jpg));base64,([A-Za-z0-9+/]+={0,2})$")
        .expect("data url pattern compiles")
});

/// Caller-supplied logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    DataUrl(String),
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl ImageInput {
    /// Treats anything starting with `data:` as a data URL, everything else as a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("data:") {
            ImageInput::DataUrl(arg.to_string())
        } else {
            ImageInput::Path(PathBuf::from(arg))
        }
    }
}

/// A logo that passed every check. Only lives until it is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub format: ImageFormat,
    pub dimensions: Dimensions,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    /// Canonical data URL, always labelled with the sniffed MIME type.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

pub fn normalize(input: ImageInput, limits: &ImageLimits) -> Result<ImageAsset, ImageError> {
    let (bytes, declared) = match input {
        ImageInput::DataUrl(url) => {
            let (declared, bytes) = parse_data_url(&url)?;
            (bytes, Some(declared))
        }
        ImageInput::Bytes(bytes) => (bytes, None),
        ImageInput::Path(path) => {
            let bytes = std::fs::read(&path).map_err(|source| ImageError::Io {
                path: path.display().to_string(),
                source,
            })?;
            debug!("read {} bytes from {}", bytes.len(), path.display());
            (bytes, None)
        }
    };

    limits.check_byte_len(bytes.len())?;
    let format = sniff_format(&bytes)?;

    if let Some(declared) = declared {
        if ImageFormat::from_mime(&declared)? != format {
            return Err(ImageError::MimeMismatch {
                declared,
                detected: format,
            });
        }
    }

    let dimensions = format.decode_dimensions(&bytes)?;
    validate_shape(dimensions, limits)?;
    debug!(
        "image accepted: {} {}x{}, {} bytes",
        format,
        dimensions.width,
        dimensions.height,
        bytes.len()
    );

    Ok(ImageAsset {
        format,
        dimensions,
        bytes,
    })
}

fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), ImageError> {
    let caps = DATA_URL.captures(url).ok_or(ImageError::InvalidDataUrl)?;
    let declared = caps[1].to_string();
    let bytes = BASE64_STANDARD.decode(&caps[2])?;
    Ok((declared, bytes))
}
