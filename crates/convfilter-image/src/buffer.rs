use crate::error::ImageError;

/// Channel layout of an interleaved 8-bit pixel buffer.
///
/// The first three bytes of a pixel are always the color channels; the
/// optional fourth byte is alpha. Both RGB and BGR orders are supported since
/// decoded bitmaps commonly arrive in either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit red, green, blue.
    Rgb8,
    /// 8-bit red, green, blue, alpha.
    Rgba8,
    /// 8-bit blue, green, red (native bitmap order).
    Bgr8,
    /// 8-bit blue, green, red, alpha.
    Bgra8,
}

impl PixelFormat {
    /// Number of bytes occupied by one pixel.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }

    /// Whether the layout carries an alpha byte.
    pub const fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::Rgba8 | PixelFormat::Bgra8)
    }
}

/// An owned interleaved 8-bit raster with an explicit row stride.
///
/// The buffer holds `stride * height` bytes where `stride >= width *
/// bytes_per_pixel`; rows may carry trailing padding, as produced by native
/// bitmap APIs that align rows.
///
/// # Examples
///
/// ```
/// use convfilter_image::{PixelBuffer, PixelFormat};
///
/// let image = PixelBuffer::new(10, 20, PixelFormat::Rgb8, vec![0u8; 10 * 20 * 3]).unwrap();
///
/// assert_eq!(image.width(), 10);
/// assert_eq!(image.height(), 20);
/// assert_eq!(image.stride(), 30);
/// ```
#[derive(Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer with a packed stride (`width * bytes_per_pixel`).
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the image in pixels.
    /// * `height` - The height of the image in pixels.
    /// * `format` - The channel layout of the pixel data.
    /// * `data` - The pixel data, row major, exactly `width * height *
    ///   bytes_per_pixel` bytes.
    ///
    /// # Errors
    ///
    /// If the dimensions are zero or the data length does not match, an error
    /// is returned.
    pub fn new(
        width: usize,
        height: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let stride = width * format.bytes_per_pixel();
        Self::from_raw_parts(width, height, stride, format, data)
    }

    /// Create a new buffer from raw parts with an explicit row stride.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the image in pixels.
    /// * `height` - The height of the image in pixels.
    /// * `stride` - Bytes from the start of one row to the next, at least
    ///   `width * bytes_per_pixel`.
    /// * `format` - The channel layout of the pixel data.
    /// * `data` - The pixel data, exactly `stride * height` bytes.
    ///
    /// # Errors
    ///
    /// If the dimensions are zero, the stride is too small for a packed row,
    /// or the data length does not match `stride * height`, an error is
    /// returned.
    pub fn from_raw_parts(
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions(width, height));
        }

        let min_stride = width * format.bytes_per_pixel();
        if stride < min_stride {
            return Err(ImageError::InvalidStride(stride, min_stride));
        }

        if data.len() != stride * height {
            return Err(ImageError::InvalidDataLength(data.len(), stride * height));
        }

        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Create a new buffer with the given size and a constant byte value.
    ///
    /// # Examples
    ///
    /// ```
    /// use convfilter_image::{PixelBuffer, PixelFormat};
    ///
    /// let image = PixelBuffer::from_size_val(4, 3, PixelFormat::Bgra8, 255).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 4 * 3 * 4);
    /// ```
    pub fn from_size_val(
        width: usize,
        height: usize,
        format: PixelFormat,
        val: u8,
    ) -> Result<Self, ImageError> {
        let data = vec![val; width * height * format.bytes_per_pixel()];
        Self::new(width, height, format, data)
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from the start of one row to the start of the next.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Channel layout of the pixel data.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of bytes occupied by one pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// The packed pixel bytes of row `y`, without any stride padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let offset = y * self.stride;
        &self.data[offset..offset + self.width * self.bytes_per_pixel()]
    }

    /// The bytes of the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        &self.row(y)[x * bpp..(x + 1) * bpp]
    }

    /// The whole underlying byte region, including stride padding.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
