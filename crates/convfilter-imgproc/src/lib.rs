#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image filtering module.
pub mod filter;

/// convolution kernel types and presets.
pub mod kernel;

pub use crate::filter::{filter2d, filter2d_serial, filter2d_with_normalization};
pub use crate::kernel::Kernel3;
