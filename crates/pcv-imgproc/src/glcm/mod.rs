//! Gray-level co-occurrence matrices (GLCM) and the texture statistics derived from them.
//!
//! The pipeline is:
//!
//! 1. [`zoom_gray`] rescales an 8-bit image to fewer gray levels when its maximum
//!    intensity does not fit the requested [`GrayLevel`].
//! 2. [`glcm_counts`] accumulates directional pair counts and
//!    [`CooccurrenceCounts::normalize`] turns them into a [`CooccurrenceMatrix`]
//!    of probabilities.
//! 3. [`texture_descriptors`] derives the seven Haralick-style statistics.
//!
//! # Examples
//!
//! ```
//! use pcv_image::{Image, ImageSize};
//! use pcv_imgproc::glcm::{glcm_descriptors, GlcmDirection, GrayLevel};
//!
//! let image = Image::<u8, 1>::new(
//!     ImageSize { width: 4, height: 2 },
//!     vec![0, 1, 0, 1, 1, 0, 1, 0],
//! ).unwrap();
//!
//! let desc = glcm_descriptors(&image, GlcmDirection::Deg0, GrayLevel::Gl4).unwrap();
//! assert_eq!(desc.contrast, 1.0);
//! ```

use pcv_image::ImageError;

mod descriptors;
pub use descriptors::*;

mod matrix;
pub use matrix::*;

mod quantize;
pub use quantize::*;

/// Errors produced by the co-occurrence texture engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GlcmError {
    /// The input image has zero width or height.
    #[error("Input image is empty")]
    EmptyImage,

    /// The requested number of gray levels is outside `[1, 256]`.
    #[error("Invalid gray level count {0}, expected a value in [1, 256]")]
    InvalidGrayLevel(usize),

    /// The matrix data does not hold `levels * levels` values.
    #[error("Invalid co-occurrence matrix shape: {0} values for {1} gray levels")]
    InvalidMatrixShape(usize, usize),

    /// The matrix sums to zero, e.g. the image has no pixel pair along the direction.
    #[error("Co-occurrence matrix is degenerate: no valid pixel pairs")]
    DegenerateMatrix,

    /// The matrix values do not sum to one.
    #[error("Co-occurrence matrix is not normalized: values sum to {0}")]
    NotNormalized(f32),

    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),
}
