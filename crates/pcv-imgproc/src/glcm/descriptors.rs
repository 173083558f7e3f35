use pcv_image::Image;

use super::{glcm_matrix, CooccurrenceMatrix, GlcmDirection, GlcmError, GrayLevel};

/// Offset added inside the logarithm of [`entropy`] so that empty cells stay finite.
pub const ENTROPY_EPSILON: f32 = 1e-6;

/// Texture statistics computed from a normalized co-occurrence matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDescriptors {
    /// Direction of the matrix the statistics come from.
    pub direction: GlcmDirection,
    /// Gray level count of the matrix the statistics come from.
    pub gray_level: GrayLevel,
    /// Local intensity variation, see [`contrast`].
    pub contrast: f32,
    /// Linear dependency between paired gray levels, see [`correlation`].
    pub correlation: f32,
    /// Randomness of the pair distribution, see [`entropy`].
    pub entropy: f32,
    /// Closeness of the distribution to the diagonal, see [`homogeneity`].
    pub homogeneity: f32,
    /// Inverse difference moment, see [`inverse_difference_moment`].
    pub inverse_difference_moment: f32,
    /// Largest cell of the matrix, see [`max_probability`].
    pub max_probability: f32,
    /// Angular second moment (energy), see [`energy`].
    pub angular_second_moment: f32,
}

impl std::fmt::Display for TextureDescriptors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "GLCM {} with {} gray levels",
            self.direction, self.gray_level
        )?;
        writeln!(f, "MaxProbability: {:.6}", self.max_probability)?;
        writeln!(f, "AngularSecondMoment: {:.6}", self.angular_second_moment)?;
        writeln!(f, "Contrast: {:.6}", self.contrast)?;
        writeln!(f, "Correlation: {:.6}", self.correlation)?;
        writeln!(f, "Entropy: {:.6}", self.entropy)?;
        writeln!(f, "Homogeneity: {:.6}", self.homogeneity)?;
        write!(f, "IDMoment: {:.6}", self.inverse_difference_moment)
    }
}

/// Contrast: `sum (i - j)^2 p(i, j)`.
pub fn contrast(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.cells()
        .map(|(i, j, p)| {
            let d = i as f32 - j as f32;
            d * d * p
        })
        .sum()
}

/// Entropy: `-sum p(i, j) ln(p(i, j) + eps)` with `eps` = [`ENTROPY_EPSILON`].
pub fn entropy(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.cells()
        .map(|(_, _, p)| -p * (p + ENTROPY_EPSILON).ln())
        .sum()
}

/// Homogeneity: `sum p(i, j) / (1 + |i - j|)`.
pub fn homogeneity(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.cells()
        .map(|(i, j, p)| p / (1.0 + i.abs_diff(j) as f32))
        .sum()
}

/// Correlation of the row and column gray levels.
///
/// `sum (i - mu_i)(j - mu_j) p(i, j) / (sigma_i sigma_j)`. Returns 0 when either
/// standard deviation is zero.
pub fn correlation(glcm: &CooccurrenceMatrix) -> f32 {
    let (mut mu_i, mut mu_j) = (0.0f32, 0.0f32);
    for (i, j, p) in glcm.cells() {
        mu_i += i as f32 * p;
        mu_j += j as f32 * p;
    }

    let (mut var_i, mut var_j) = (0.0f32, 0.0f32);
    for (i, j, p) in glcm.cells() {
        var_i += (i as f32 - mu_i).powi(2) * p;
        var_j += (j as f32 - mu_j).powi(2) * p;
    }

    let (sigma_i, sigma_j) = (var_i.sqrt(), var_j.sqrt());
    if sigma_i == 0.0 || sigma_j == 0.0 {
        return 0.0;
    }

    glcm.cells()
        .map(|(i, j, p)| (i as f32 - mu_i) * (j as f32 - mu_j) * p / (sigma_i * sigma_j))
        .sum()
}

/// Energy, also known as angular second moment: `sum p(i, j)^2`.
pub fn energy(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.cells().map(|(_, _, p)| p * p).sum()
}

/// Inverse difference moment: `sum p(i, j) / (1 + (i - j)^2)`.
pub fn inverse_difference_moment(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.cells()
        .map(|(i, j, p)| {
            let d = i as f32 - j as f32;
            p / (1.0 + d * d)
        })
        .sum()
}

/// The largest probability of the matrix.
pub fn max_probability(glcm: &CooccurrenceMatrix) -> f32 {
    glcm.as_slice().iter().copied().fold(0.0, f32::max)
}

/// Compute all the texture statistics of a normalized co-occurrence matrix.
///
/// Raw pair counts go through [`CooccurrenceCounts::normalize`](super::CooccurrenceCounts::normalize)
/// first.
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::glcm::{glcm_counts, texture_descriptors, GlcmDirection, GrayLevel};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 1, 2]).unwrap();
/// let counts = glcm_counts(&image, GlcmDirection::Deg0, GrayLevel::Gl4).unwrap();
///
/// let desc = texture_descriptors(&counts.normalize().unwrap());
/// assert_eq!(desc.angular_second_moment, 0.5);
/// ```
pub fn texture_descriptors(glcm: &CooccurrenceMatrix) -> TextureDescriptors {
    TextureDescriptors {
        direction: glcm.direction(),
        gray_level: glcm.gray_level(),
        contrast: contrast(glcm),
        correlation: correlation(glcm),
        entropy: entropy(glcm),
        homogeneity: homogeneity(glcm),
        inverse_difference_moment: inverse_difference_moment(glcm),
        max_probability: max_probability(glcm),
        angular_second_moment: energy(glcm),
    }
}

/// Build the normalized matrix of `src` and compute its texture statistics.
///
/// Shorthand for [`glcm_matrix`] followed by [`texture_descriptors`].
pub fn glcm_descriptors(
    src: &Image<u8, 1>,
    direction: GlcmDirection,
    gray_level: GrayLevel,
) -> Result<TextureDescriptors, GlcmError> {
    let glcm = glcm_matrix(src, direction, gray_level)?;
    Ok(texture_descriptors(&glcm))
}
