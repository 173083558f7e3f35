use pcv_image::Image;

use super::{zoom_gray, GlcmError, GrayLevel, GrayRange};

/// Direction of the pixel offset used to pair intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlcmDirection {
    /// Right neighbor, offset `(1, 0)`.
    Deg0,
    /// Upper-right neighbor, offset `(1, -1)`.
    Deg45,
    /// Lower neighbor, offset `(0, 1)`.
    Deg90,
    /// Lower-right neighbor, offset `(1, 1)`.
    Deg135,
}

impl GlcmDirection {
    /// All the supported directions.
    pub const ALL: [GlcmDirection; 4] = [
        GlcmDirection::Deg0,
        GlcmDirection::Deg45,
        GlcmDirection::Deg90,
        GlcmDirection::Deg135,
    ];

    /// The `(dx, dy)` offset from a pixel to its paired neighbor.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            GlcmDirection::Deg0 => (1, 0),
            GlcmDirection::Deg45 => (1, -1),
            GlcmDirection::Deg90 => (0, 1),
            GlcmDirection::Deg135 => (1, 1),
        }
    }

    /// The direction angle in degrees.
    pub fn degrees(&self) -> u32 {
        match self {
            GlcmDirection::Deg0 => 0,
            GlcmDirection::Deg45 => 45,
            GlcmDirection::Deg90 => 90,
            GlcmDirection::Deg135 => 135,
        }
    }
}

impl std::fmt::Display for GlcmDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Largest distance from one tolerated for the sum of a [`CooccurrenceMatrix`].
pub const NORMALIZATION_TOLERANCE: f32 = 1e-4;

/// Raw pair counts of a gray-level co-occurrence matrix.
///
/// Entry `(i, j)` holds how often a pixel of intensity `i` has its neighbor along
/// [`CooccurrenceCounts::direction`] at intensity `j`. Use
/// [`CooccurrenceCounts::normalize`] to get the probabilities the texture
/// descriptors are defined on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooccurrenceCounts {
    gray_level: GrayLevel,
    direction: GlcmDirection,
    data: Vec<u64>,
}

impl CooccurrenceCounts {
    /// The gray level count the counts were accumulated with.
    pub fn gray_level(&self) -> GrayLevel {
        self.gray_level
    }

    /// The side length of the matrix.
    pub fn levels(&self) -> usize {
        self.gray_level.levels()
    }

    /// The pairing direction the counts were accumulated with.
    pub fn direction(&self) -> GlcmDirection {
        self.direction
    }

    /// The count at row `i`, column `j`, if both are in range.
    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        let n = self.levels();
        if i >= n || j >= n {
            return None;
        }
        Some(self.data[i * n + j])
    }

    /// The row-major counts.
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Number of pixel pairs counted.
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }

    /// Divide every count by the total to get pair probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`GlcmError::DegenerateMatrix`] if no pair was counted.
    pub fn normalize(&self) -> Result<CooccurrenceMatrix, GlcmError> {
        let total = self.total();
        if total == 0 {
            log::warn!(
                "co-occurrence counts at {} have no pixel pairs, cannot normalize",
                self.direction
            );
            return Err(GlcmError::DegenerateMatrix);
        }

        let total = total as f64;
        Ok(CooccurrenceMatrix {
            gray_level: self.gray_level,
            direction: self.direction,
            data: self
                .data
                .iter()
                .map(|&c| (c as f64 / total) as f32)
                .collect(),
        })
    }
}

/// A normalized gray-level co-occurrence matrix.
///
/// Entry `(i, j)` is the probability that a pixel of intensity `i` has its
/// neighbor along [`CooccurrenceMatrix::direction`] at intensity `j`. The cells
/// always sum to one within [`NORMALIZATION_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct CooccurrenceMatrix {
    gray_level: GrayLevel,
    direction: GlcmDirection,
    data: Vec<f32>,
}

impl CooccurrenceMatrix {
    /// Create a matrix from row-major probabilities.
    ///
    /// # Errors
    ///
    /// * [`GlcmError::InvalidMatrixShape`] if `data` does not hold `levels * levels` values.
    /// * [`GlcmError::DegenerateMatrix`] if every value is zero.
    /// * [`GlcmError::NotNormalized`] if the values do not sum to one.
    pub fn from_vec(
        gray_level: GrayLevel,
        direction: GlcmDirection,
        data: Vec<f32>,
    ) -> Result<Self, GlcmError> {
        let levels = gray_level.levels();
        if data.len() != levels * levels {
            return Err(GlcmError::InvalidMatrixShape(data.len(), levels));
        }

        let matrix = Self {
            gray_level,
            direction,
            data,
        };

        let sum = matrix.sum();
        if sum == 0.0 {
            return Err(GlcmError::DegenerateMatrix);
        }
        if (sum - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(GlcmError::NotNormalized(sum));
        }

        Ok(matrix)
    }

    /// The gray level count the matrix was built with.
    pub fn gray_level(&self) -> GrayLevel {
        self.gray_level
    }

    /// The side length of the matrix.
    pub fn levels(&self) -> usize {
        self.gray_level.levels()
    }

    /// The pairing direction the matrix was built with.
    pub fn direction(&self) -> GlcmDirection {
        self.direction
    }

    /// The probability at row `i`, column `j`, if both are in range.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        let n = self.levels();
        if i >= n || j >= n {
            return None;
        }
        Some(self.data[i * n + j])
    }

    /// The row-major matrix values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterate over `(i, j, probability)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let n = self.levels();
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, &p)| (idx / n, idx % n, p))
    }

    /// Sum of all the cells.
    pub fn sum(&self) -> f32 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() as f32
    }
}

/// Accumulate the raw co-occurrence counts of a gray image.
///
/// If the maximum intensity of `src` does not fit `gray_level`, the image is first
/// rescaled with [`zoom_gray`] onto `[0, L - 1]`. Otherwise the intensities are used
/// as they are.
///
/// Each pixel with an in-bounds neighbor along `direction` contributes one count to
/// cell `[intensity(p), intensity(p + offset)]`. The reverse pair is not added.
///
/// # Errors
///
/// Returns an error if the image is empty.
pub fn glcm_counts(
    src: &Image<u8, 1>,
    direction: GlcmDirection,
    gray_level: GrayLevel,
) -> Result<CooccurrenceCounts, GlcmError> {
    if src.is_empty() {
        return Err(GlcmError::EmptyImage);
    }

    let levels = gray_level.levels();
    let max_value = src.as_slice().iter().copied().max().unwrap_or(0) as usize;

    let quantized;
    let gray = if max_value >= levels {
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        zoom_gray(src, &mut dst, levels, GrayRange::Open)?;
        quantized = dst;
        &quantized
    } else {
        src
    };

    let (cols, rows) = (gray.cols() as isize, gray.rows() as isize);
    let (dx, dy) = direction.offset();
    let data = gray.as_slice();

    let mut counts = vec![0u64; levels * levels];
    let mut num_pairs = 0u64;

    for y in 0..rows {
        let ny = y + dy;
        if ny < 0 || ny >= rows {
            continue;
        }
        for x in 0..cols {
            let nx = x + dx;
            if nx < 0 || nx >= cols {
                continue;
            }
            let row = data[(y * cols + x) as usize] as usize;
            let col = data[(ny * cols + nx) as usize] as usize;
            counts[row * levels + col] += 1;
            num_pairs += 1;
        }
    }

    log::debug!(
        "glcm {} with {} levels: {} pairs from a {}x{} image",
        direction,
        levels,
        num_pairs,
        cols,
        rows
    );

    Ok(CooccurrenceCounts {
        gray_level,
        direction,
        data: counts,
    })
}

/// Compute the normalized co-occurrence matrix of a gray image.
///
/// # Arguments
///
/// * `src` - The input gray image.
/// * `direction` - The neighbor direction.
/// * `gray_level` - The number of gray levels of the matrix.
///
/// # Returns
///
/// A matrix whose cells sum to one.
///
/// # Errors
///
/// Returns [`GlcmError::DegenerateMatrix`] if no pixel has an in-bounds neighbor,
/// e.g. a single column image with [`GlcmDirection::Deg0`].
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::glcm::{glcm_matrix, GlcmDirection, GrayLevel};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 1, 2]).unwrap();
/// let glcm = glcm_matrix(&image, GlcmDirection::Deg0, GrayLevel::Gl4).unwrap();
///
/// assert_eq!(glcm.get(0, 1), Some(0.5));
/// assert_eq!(glcm.get(1, 2), Some(0.5));
/// ```
pub fn glcm_matrix(
    src: &Image<u8, 1>,
    direction: GlcmDirection,
    gray_level: GrayLevel,
) -> Result<CooccurrenceMatrix, GlcmError> {
    glcm_counts(src, direction, gray_level)?.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pcv_image::ImageSize;

    #[test]
    fn test_glcm_counts_directions() -> Result<(), GlcmError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                0, 1, 2,
                1, 2, 3,
                2, 3, 0,
            ],
        )?;

        let glcm = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl4)?;
        assert_eq!(glcm.total(), 6);
        assert_eq!(glcm.get(0, 1), Some(1));
        assert_eq!(glcm.get(1, 2), Some(2));
        assert_eq!(glcm.get(2, 3), Some(2));
        assert_eq!(glcm.get(3, 0), Some(1));

        // 45 degrees pairs a pixel with its upper-right neighbor
        let glcm = glcm_counts(&image, GlcmDirection::Deg45, GrayLevel::Gl4)?;
        assert_eq!(glcm.total(), 4);
        assert_eq!(glcm.get(1, 1), Some(1));
        assert_eq!(glcm.get(2, 2), Some(2));
        assert_eq!(glcm.get(3, 3), Some(1));

        let glcm = glcm_counts(&image, GlcmDirection::Deg90, GrayLevel::Gl4)?;
        assert_eq!(glcm.total(), 6);
        assert_eq!(glcm.get(0, 1), Some(1));
        assert_eq!(glcm.get(2, 3), Some(2));
        assert_eq!(glcm.get(3, 0), Some(1));

        let glcm = glcm_counts(&image, GlcmDirection::Deg135, GrayLevel::Gl4)?;
        assert_eq!(glcm.total(), 4);
        assert_eq!(glcm.get(0, 2), Some(1));
        assert_eq!(glcm.get(1, 3), Some(2));
        assert_eq!(glcm.get(2, 0), Some(1));

        Ok(())
    }

    #[test]
    fn test_glcm_is_not_symmetric() -> Result<(), GlcmError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 3],
        )?;
        let glcm = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl4)?;
        assert_eq!(glcm.get(1, 3), Some(1));
        assert_eq!(glcm.get(3, 1), Some(0));
        Ok(())
    }

    #[test]
    fn test_glcm_matrix_sums_to_one() -> Result<(), GlcmError> {
        let data = (0..40 * 30).map(|i| ((i * 37) % 256) as u8).collect();
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 40,
                height: 30,
            },
            data,
        )?;

        for direction in GlcmDirection::ALL {
            for gray_level in GrayLevel::ALL {
                let glcm = glcm_matrix(&image, direction, gray_level)?;
                assert_eq!(glcm.levels(), gray_level.levels());
                assert_eq!(glcm.as_slice().len(), gray_level.levels().pow(2));
                assert_relative_eq!(glcm.sum(), 1.0, epsilon = 1e-4);
            }
        }
        Ok(())
    }

    #[test]
    fn test_glcm_rescales_when_max_exceeds_levels() -> Result<(), GlcmError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0, 255],
        )?;
        let glcm = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl8)?;
        assert_eq!(glcm.get(0, 7), Some(1));
        Ok(())
    }

    #[test]
    fn test_glcm_low_contrast_image_is_not_rescaled() -> Result<(), GlcmError> {
        // max 200 < 256, intensities are used as they are
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![100, 200],
        )?;
        let glcm = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl256)?;
        assert_eq!(glcm.get(100, 200), Some(1));
        Ok(())
    }

    #[test]
    fn test_glcm_degenerate() -> Result<(), GlcmError> {
        let column = Image::<u8, 1>::new(
            ImageSize {
                width: 1,
                height: 4,
            },
            vec![1, 2, 3, 0],
        )?;
        assert_eq!(
            glcm_matrix(&column, GlcmDirection::Deg0, GrayLevel::Gl4),
            Err(GlcmError::DegenerateMatrix)
        );
        assert!(glcm_matrix(&column, GlcmDirection::Deg90, GrayLevel::Gl4).is_ok());

        let empty = Image::<u8, 1>::new(ImageSize::default(), vec![])?;
        assert_eq!(
            glcm_matrix(&empty, GlcmDirection::Deg0, GrayLevel::Gl4),
            Err(GlcmError::EmptyImage)
        );
        Ok(())
    }

    #[test]
    fn test_from_vec_shape() {
        let res = CooccurrenceMatrix::from_vec(GrayLevel::Gl4, GlcmDirection::Deg0, vec![0.0; 15]);
        assert_eq!(res, Err(GlcmError::InvalidMatrixShape(15, 4)));
    }

    #[test]
    fn test_from_vec_rejects_raw_counts() -> Result<(), GlcmError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 1, 2],
        )?;
        let counts = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl4)?;
        assert_eq!(counts.total(), 2);

        // counts reinterpreted as probabilities sum to the number of pairs
        let raw = counts.as_slice().iter().map(|&c| c as f32).collect();
        assert_eq!(
            CooccurrenceMatrix::from_vec(GrayLevel::Gl4, GlcmDirection::Deg0, raw),
            Err(GlcmError::NotNormalized(2.0))
        );

        assert_eq!(
            CooccurrenceMatrix::from_vec(GrayLevel::Gl4, GlcmDirection::Deg0, vec![0.0; 16]),
            Err(GlcmError::DegenerateMatrix)
        );

        let glcm = counts.normalize()?;
        assert_eq!(glcm.get(0, 1), Some(0.5));
        assert_eq!(glcm.get(1, 2), Some(0.5));
        assert_eq!(glcm.direction(), counts.direction());
        assert_eq!(glcm.gray_level(), counts.gray_level());
        Ok(())
    }

    #[test]
    fn test_normalize_without_pairs() -> Result<(), GlcmError> {
        let pixel = Image::<u8, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![3],
        )?;
        let counts = glcm_counts(&pixel, GlcmDirection::Deg135, GrayLevel::Gl4)?;
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.normalize(), Err(GlcmError::DegenerateMatrix));
        Ok(())
    }
}
