#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// connected component labeling module.
pub mod connected_components;

/// contour tracing module.
pub mod contours;

/// gray-level co-occurrence texture descriptors.
pub mod glcm;

/// connected region model and region collection operations.
pub mod region;

/// moments and bounding shapes of point sets.
pub mod shape;
