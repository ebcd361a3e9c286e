#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// pixel buffer representation for raster images.
pub mod buffer;

/// Error types for the image module.
pub mod error;

pub use crate::buffer::{PixelBuffer, PixelFormat};
pub use crate::error::ImageError;
