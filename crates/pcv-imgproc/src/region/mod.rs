//! Connected regions of a binary mask and the operations over a collection of them.
//!
//! [`connection`] splits a 0/255 mask into one [`Region`] per connected component.
//! The regions live in a [`RegionMap`] keyed by their label, from which
//! [`take_max_area_region`] and [`partition_regions_by_area`] move regions out.
//!
//! # Examples
//!
//! ```
//! use pcv_image::{Image, ImageSize};
//! use pcv_imgproc::region::{connection, take_max_area_region};
//!
//! #[rustfmt::skip]
//! let mask = Image::<u8, 1>::new(
//!     ImageSize { width: 6, height: 4 },
//!     vec![
//!         255, 255, 0, 0, 0, 0,
//!         255, 255, 0, 255, 255, 255,
//!         0, 0, 0, 255, 255, 255,
//!         0, 0, 0, 255, 255, 255,
//!     ],
//! ).unwrap();
//!
//! let (num_labels, mut regions) = connection(&mask).unwrap();
//! assert_eq!(num_labels, 3);
//!
//! let (label, largest) = take_max_area_region(&mut regions).unwrap();
//! assert_eq!(label, 2);
//! assert_eq!(largest.area(), 4.0);
//! assert_eq!(regions.len(), 1);
//! ```

use std::collections::BTreeMap;

use pcv_image::ImageError;

mod extract;
pub use extract::*;

mod model;
pub use model::*;

mod select;
pub use select::*;

/// Regions indexed by their connected component label.
pub type RegionMap = BTreeMap<usize, Region>;

/// Errors produced by the region model and the region collection operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    /// A mask pixel is neither 0 nor 255.
    #[error("Invalid mask value {0}, expected 0 or 255")]
    InvalidMaskValue(u8),

    /// The mask has no foreground pixel.
    #[error("The mask has no foreground pixel")]
    EmptyRegion,

    /// A contour encloses no area, so its centroid is undefined.
    #[error("Contour {index} encloses no area")]
    DegenerateContour {
        /// Position of the contour in its list.
        index: usize,
    },

    /// The area bounds are NaN or the minimum exceeds the maximum.
    #[error("Invalid area range [{0}, {1}]")]
    InvalidAreaRange(f64, f64),

    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),
}
