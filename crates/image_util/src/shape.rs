use crate::{dimensions::Dimensions, error::ImageError};

/// Limits applied to uploaded logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_bytes: usize,
    pub min_dimension: u32,
    pub max_dimension: u32,
    /// Largest allowed |width - height| in pixels.
    pub square_tolerance: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: 500 * 1024,
            min_dimension: 512,
            max_dimension: 2048,
            square_tolerance: 2,
        }
    }
}

impl ImageLimits {
    pub fn check_byte_len(&self, len: usize) -> Result<(), ImageError> {
        if len > self.max_bytes {
            return Err(ImageError::TooManyBytes {
                len,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Checks are ordered small, large, square; the first failure wins.
pub fn validate_shape(dims: Dimensions, limits: &ImageLimits) -> Result<(), ImageError> {
    let Dimensions { width, height } = dims;
    if width < limits.min_dimension || height < limits.min_dimension {
        return Err(ImageError::TooSmall {
            width,
            height,
            min: limits.min_dimension,
        });
    }
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(ImageError::TooLarge {
            width,
            height,
            max: limits.max_dimension,
        });
    }
    if width.abs_diff(height) > limits.square_tolerance {
        return Err(ImageError::NotSquare {
            width,
            height,
            tolerance: limits.square_tolerance,
        });
    }
    Ok(())
}
