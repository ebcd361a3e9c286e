/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image width or height is zero.
    #[error("Invalid image dimensions ({0}x{1}), width and height must be >= 1")]
    InvalidDimensions(usize, usize),

    /// Error when the row stride is smaller than a packed row.
    #[error("Row stride ({0}) is smaller than width * bytes_per_pixel ({1})")]
    InvalidStride(usize, usize),

    /// Error when the data length does not match stride * height.
    #[error("Data length ({0}) does not match stride * height ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the bytes per pixel is not one of the supported layouts.
    #[error("Unsupported bytes per pixel ({0}), expected 3 or 4")]
    UnsupportedBytesPerPixel(usize),

    /// Error when a normalization divisor is zero or not finite.
    #[error("Invalid normalization divisor ({0}), must be finite and non-zero")]
    InvalidNormalization(f64),
}
