#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use pcv_image as image;

#[doc(inline)]
pub use pcv_imgproc as imgproc;
