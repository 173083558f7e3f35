use pcv_image::{Image, ImageSize};

use super::{Region, RegionError, RegionMap};
use crate::connected_components::{connected_components_with_stats, ComponentStats, Connectivity};
use crate::contours::{find_contours, Point};

/// Split a binary mask into its 8-connected regions.
///
/// Each component is cropped to its bounding box with a one pixel margin and traced
/// there; the contours are then moved back to the coordinates of `mask`. Every
/// region keeps the size of `mask` and the centroid found by the labeling.
///
/// # Arguments
///
/// * `mask` - The binary mask, with pixels equal to 0 or 255.
///
/// # Returns
///
/// The number of labels, background included, and the regions keyed by label.
///
/// # Errors
///
/// Returns [`RegionError::InvalidMaskValue`] if a pixel is neither 0 nor 255.
pub fn connection(mask: &Image<u8, 1>) -> Result<(usize, RegionMap), RegionError> {
    if let Some(&value) = mask.as_slice().iter().find(|&&v| v != 0 && v != 255) {
        return Err(RegionError::InvalidMaskValue(value));
    }

    let cc = connected_components_with_stats(mask, Connectivity::Eight)?;

    let mut regions = RegionMap::new();
    for label in 1..cc.num_labels {
        let stats = &cc.stats[label];
        let (crop, origin) = crop_label(&cc.labels, label as u32, stats)?;

        let offset = Point::new(origin.x as i32, origin.y as i32);
        let mut contours = find_contours(&crop);
        contours.iter_mut().for_each(|c| c.translate(offset));

        let centroid = cc.centroids[label];
        let centroid = Point::new(centroid.x as f32, centroid.y as f32);

        regions.insert(label, Region::from_parts(mask.size(), contours, centroid));
    }

    log::debug!(
        "connection: {} regions in a {} mask",
        regions.len(),
        mask.size()
    );

    Ok((cc.num_labels, regions))
}

/// The 0/255 mask of one label inside its bounding box grown by one pixel, and the
/// position of the crop in the label image.
fn crop_label(
    labels: &Image<u32, 1>,
    label: u32,
    stats: &ComponentStats,
) -> Result<(Image<u8, 1>, Point<usize>), RegionError> {
    let x0 = stats.left.saturating_sub(1);
    let y0 = stats.top.saturating_sub(1);
    let x1 = (stats.left + stats.width + 1).min(labels.width());
    let y1 = (stats.top + stats.height + 1).min(labels.height());

    let size = ImageSize {
        width: x1 - x0,
        height: y1 - y0,
    };

    let src = labels.as_slice();
    let mut data = Vec::with_capacity(size.area());
    for y in y0..y1 {
        let row = &src[y * labels.width() + x0..y * labels.width() + x1];
        data.extend(row.iter().map(|&l| if l == label { 255u8 } else { 0 }));
    }

    Ok((Image::new(size, data)?, Point::new(x0, y0)))
}
