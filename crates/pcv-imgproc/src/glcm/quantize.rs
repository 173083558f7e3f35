use pcv_image::{Image, ImageError};

use super::GlcmError;

/// Number of gray levels a co-occurrence matrix is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrayLevel {
    /// 4 gray levels.
    Gl4,
    /// 8 gray levels.
    Gl8,
    /// 16 gray levels.
    Gl16,
    /// 32 gray levels.
    Gl32,
    /// 64 gray levels.
    #[default]
    Gl64,
    /// 128 gray levels.
    Gl128,
    /// 256 gray levels.
    Gl256,
}

impl GrayLevel {
    /// All supported level counts, ascending.
    pub const ALL: [GrayLevel; 7] = [
        GrayLevel::Gl4,
        GrayLevel::Gl8,
        GrayLevel::Gl16,
        GrayLevel::Gl32,
        GrayLevel::Gl64,
        GrayLevel::Gl128,
        GrayLevel::Gl256,
    ];

    /// The number of gray levels, i.e. the side of the co-occurrence matrix.
    pub fn levels(&self) -> usize {
        match self {
            GrayLevel::Gl4 => 4,
            GrayLevel::Gl8 => 8,
            GrayLevel::Gl16 => 16,
            GrayLevel::Gl32 => 32,
            GrayLevel::Gl64 => 64,
            GrayLevel::Gl128 => 128,
            GrayLevel::Gl256 => 256,
        }
    }
}

impl TryFrom<usize> for GrayLevel {
    type Error = GlcmError;

    fn try_from(levels: usize) -> Result<Self, Self::Error> {
        GrayLevel::ALL
            .into_iter()
            .find(|gl| gl.levels() == levels)
            .ok_or(GlcmError::InvalidGrayLevel(levels))
    }
}

impl std::fmt::Display for GrayLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.levels())
    }
}

/// Output interval of [`zoom_gray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrayRange {
    /// Map `[0, 255]` onto `[1, L]`.
    #[default]
    Closed,
    /// Map `[0, 255]` onto `[0, L - 1]`.
    Open,
}

/// Build the 256 entry lookup table used by [`zoom_gray`].
fn zoom_gray_lut(max_gray_level: usize, range: GrayRange) -> [u8; 256] {
    let scale = (max_gray_level as f32 - 1.0) / 255.0;
    let bias = match range {
        GrayRange::Closed => 1.0,
        GrayRange::Open => 0.0,
    };

    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        // saturating conversion, ties go to the even value
        *v = (scale * i as f32 + bias)
            .round_ties_even()
            .clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Rescale the intensities of a gray image to `max_gray_level` levels.
///
/// Every pixel goes through the affine map `y = (L - 1) / 255 * x`, shifted by one
/// for [`GrayRange::Closed`], then rounded and saturated to `u8`.
///
/// # Arguments
///
/// * `src` - The input gray image.
/// * `dst` - The output image, same size as `src`.
/// * `max_gray_level` - The number of levels `L`, in `[1, 256]`.
/// * `range` - Whether the output starts at 0 or at 1.
///
/// # Errors
///
/// Returns an error if the image is empty, the sizes differ or the level count is invalid.
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::glcm::{zoom_gray, GrayRange};
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 128, 255]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// zoom_gray(&src, &mut dst, 16, GrayRange::Open).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 8, 15]);
/// ```
pub fn zoom_gray(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_gray_level: usize,
    range: GrayRange,
) -> Result<(), GlcmError> {
    if src.is_empty() {
        return Err(GlcmError::EmptyImage);
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    if !(1..=256).contains(&max_gray_level) {
        return Err(GlcmError::InvalidGrayLevel(max_gray_level));
    }

    let lut = zoom_gray_lut(max_gray_level, range);

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice())
        .for_each(|(d, &s)| *d = lut[s as usize]);

    Ok(())
}
