
mod bounding_rect;
mod qr_detection;

pub use bounding_rect::*;
pub use qr_detection::*;
