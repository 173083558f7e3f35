use super::model::centroid_of;
use super::{Region, RegionError, RegionMap};
use crate::contours::{Contour, Point};

/// Remove the region with the largest area from `regions` and return it with its label.
///
/// When several regions share the largest area the one with the lowest label wins.
/// Returns `None` if `regions` is empty.
pub fn take_max_area_region(regions: &mut RegionMap) -> Option<(usize, Region)> {
    let mut best: Option<(usize, f64)> = None;
    for (&label, region) in regions.iter() {
        let area = region.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((label, area)),
        }
    }

    let (label, _) = best?;
    regions.remove_entry(&label)
}

/// Split `regions` by area.
///
/// # Arguments
///
/// * `regions` - The regions to split.
/// * `min_area` - The smallest area to keep, inclusive.
/// * `max_area` - The largest area to keep, inclusive. May be [`f64::INFINITY`].
///
/// # Returns
///
/// The regions whose area lies in `[min_area, max_area]` and the rest.
///
/// # Errors
///
/// Returns [`RegionError::InvalidAreaRange`] if a bound is NaN or `min_area > max_area`.
///
/// # Example
///
/// ```
/// use pcv_image::{Image, ImageSize};
/// use pcv_imgproc::region::{connection, partition_regions_by_area};
///
/// #[rustfmt::skip]
/// let mask = Image::<u8, 1>::new(
///     ImageSize { width: 5, height: 2 },
///     vec![
///         255, 255, 0, 255, 0,
///         255, 255, 0, 0, 0,
///     ],
/// ).unwrap();
///
/// let (_, regions) = connection(&mask).unwrap();
/// let (kept, rejected) = partition_regions_by_area(regions, 0.5, f64::INFINITY).unwrap();
/// assert_eq!(kept.keys().collect::<Vec<_>>(), vec![&1]);
/// assert_eq!(rejected.keys().collect::<Vec<_>>(), vec![&2]);
/// ```
pub fn partition_regions_by_area(
    regions: RegionMap,
    min_area: f64,
    max_area: f64,
) -> Result<(RegionMap, RegionMap), RegionError> {
    if min_area.is_nan() || max_area.is_nan() || min_area > max_area {
        return Err(RegionError::InvalidAreaRange(min_area, max_area));
    }

    let (kept, rejected): (RegionMap, RegionMap) = regions
        .into_iter()
        .partition(|(_, region)| (min_area..=max_area).contains(&region.area()));

    log::debug!(
        "area partition [{}, {}]: {} kept, {} rejected",
        min_area,
        max_area,
        kept.len(),
        rejected.len()
    );

    Ok((kept, rejected))
}

/// Compute the centroid of every contour from its moments.
///
/// # Errors
///
/// Returns [`RegionError::DegenerateContour`] with the position of the first
/// contour that encloses no area.
///
/// # Example
///
/// ```
/// use pcv_imgproc::contours::{BorderType, Contour, Point};
/// use pcv_imgproc::region::compute_centroids;
///
/// let square = Contour::new(
///     vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)],
///     BorderType::Outer,
///     None,
/// );
///
/// let centroids = compute_centroids(&[square]).unwrap();
/// assert_eq!(centroids, vec![Point::new(2.0, 2.0)]);
/// ```
pub fn compute_centroids(contours: &[Contour]) -> Result<Vec<Point<f32>>, RegionError> {
    contours
        .iter()
        .enumerate()
        .map(|(index, contour)| centroid_of(contour, index))
        .collect()
}
