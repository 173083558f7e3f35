use std::cell::OnceCell;

use pcv_image::{Image, ImageSize};

use super::RegionError;
use crate::contours::{find_contours, Contour, Point};
use crate::shape::{bounding_rect, contour_area, min_area_rect, moments, Rect, RotatedRect};

/// The boundary geometry of a connected region of a binary mask.
///
/// The geometric queries only look at the first contour, which is the outer border
/// met first by a raster scan of the mask. Holes are not subtracted from
/// [`Region::area`]. Each query is computed on first use and cached.
#[derive(Debug, Clone)]
pub struct Region {
    size: ImageSize,
    contours: Vec<Contour>,
    centroid: Point<f32>,
    bounding_rect: OnceCell<Rect>,
    min_area_rect: OnceCell<RotatedRect>,
    area: OnceCell<f64>,
    min_area_rect_area: OnceCell<f64>,
}

impl Region {
    /// Create a region from a binary mask.
    ///
    /// # Arguments
    ///
    /// * `mask` - The mask of the region, with pixels equal to 0 or 255.
    /// * `centroid` - The center of the region if already known. When `None` it is
    ///   computed from the moments of the first contour.
    ///
    /// # Errors
    ///
    /// * [`RegionError::InvalidMaskValue`] if a pixel is neither 0 nor 255.
    /// * [`RegionError::EmptyRegion`] if no pixel is set.
    /// * [`RegionError::DegenerateContour`] if the centroid has to be computed and
    ///   the first contour encloses no area.
    ///
    /// # Example
    ///
    /// ```
    /// use pcv_image::{Image, ImageSize};
    /// use pcv_imgproc::contours::Point;
    /// use pcv_imgproc::region::Region;
    ///
    /// let mut mask = Image::<u8, 1>::from_size_val(ImageSize { width: 7, height: 7 }, 0).unwrap();
    /// for y in 1..=5 {
    ///     for x in 1..=5 {
    ///         mask.set_pixel(x, y, 0, 255).unwrap();
    ///     }
    /// }
    ///
    /// let region = Region::new(&mask, None).unwrap();
    /// assert_eq!(region.centroid(), Point::new(3.0, 3.0));
    /// assert_eq!(region.area(), 16.0);
    /// ```
    pub fn new(mask: &Image<u8, 1>, centroid: Option<Point<f32>>) -> Result<Self, RegionError> {
        if let Some(&value) = mask.as_slice().iter().find(|&&v| v != 0 && v != 255) {
            return Err(RegionError::InvalidMaskValue(value));
        }

        let contours = find_contours(mask);
        let Some(first) = contours.first() else {
            return Err(RegionError::EmptyRegion);
        };

        let centroid = match centroid {
            Some(centroid) => centroid,
            None => centroid_of(first, 0)?,
        };

        Ok(Self::from_parts(mask.size(), contours, centroid))
    }

    /// Create a region from already traced contours.
    pub(crate) fn from_parts(
        size: ImageSize,
        contours: Vec<Contour>,
        centroid: Point<f32>,
    ) -> Self {
        Self {
            size,
            contours,
            centroid,
            bounding_rect: OnceCell::new(),
            min_area_rect: OnceCell::new(),
            area: OnceCell::new(),
            min_area_rect_area: OnceCell::new(),
        }
    }

    fn first_contour(&self) -> &[Point<i32>] {
        self.contours
            .first()
            .map(|c| c.points.as_slice())
            .unwrap_or_default()
    }

    /// The area enclosed by the first contour.
    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| contour_area(self.first_contour()))
    }

    /// The axis-aligned bounding rectangle of the first contour.
    pub fn bounding_rect(&self) -> Rect {
        *self
            .bounding_rect
            .get_or_init(|| bounding_rect(self.first_contour()))
    }

    /// The minimum area rotated rectangle enclosing the first contour.
    pub fn min_area_rect(&self) -> RotatedRect {
        *self
            .min_area_rect
            .get_or_init(|| min_area_rect(self.first_contour()))
    }

    /// The area enclosed by the corners of [`Region::min_area_rect`].
    pub fn min_area_rect_area(&self) -> f64 {
        *self
            .min_area_rect_area
            .get_or_init(|| contour_area(&self.min_area_rect().points()))
    }

    /// All the contours of the region, outer borders and holes.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// The center of the region.
    pub fn centroid(&self) -> Point<f32> {
        self.centroid
    }

    /// The size of the mask the region comes from.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the mask the region comes from.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the mask the region comes from.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Render the region back into a 0/255 mask of the source size.
    ///
    /// The contours are filled with the even-odd rule, so holes stay empty, and
    /// their border pixels are set.
    pub fn to_mask(&self) -> Result<Image<u8, 1>, RegionError> {
        let mut mask = Image::<u8, 1>::from_size_val(self.size, 0)?;
        let (width, height) = (self.width() as i32, self.height() as i32);
        let data = mask.as_slice_mut();

        let mut crossings = Vec::new();
        for y in 0..height {
            crossings.clear();
            for contour in &self.contours {
                let points = &contour.points;
                for (i, p1) in points.iter().enumerate() {
                    let p0 = points[(i + points.len() - 1) % points.len()];
                    if (p0.y <= y) == (p1.y <= y) {
                        continue;
                    }
                    let t = (y - p0.y) as f64 / (p1.y - p0.y) as f64;
                    crossings.push(p0.x as f64 + t * (p1.x - p0.x) as f64);
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let x0 = (span[0].ceil() as i32).max(0);
                let x1 = (span[1].floor() as i32).min(width - 1);
                let row = (y * width) as usize;
                for x in x0..=x1 {
                    data[row + x as usize] = 255;
                }
            }
        }

        for p in self.contours.iter().flat_map(|c| &c.points) {
            if (0..width).contains(&p.x) && (0..height).contains(&p.y) {
                data[(p.y * width + p.x) as usize] = 255;
            }
        }

        Ok(mask)
    }
}

/// The centroid of a contour from its moments.
pub(crate) fn centroid_of(contour: &Contour, index: usize) -> Result<Point<f32>, RegionError> {
    let Some(c) = moments(&contour.points).centroid() else {
        log::warn!("contour {index} encloses no area, centroid is undefined");
        return Err(RegionError::DegenerateContour { index });
    };
    Ok(Point::new(c.x as f32, c.y as f32))
}
