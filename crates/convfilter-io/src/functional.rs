use std::path::Path;

use convfilter_image::{PixelBuffer, PixelFormat};

use crate::error::IoError;

/// File extensions accepted by [`read_image`], matching the formats the
/// filter front end offers (`*.jpg; *.png; *.bmp`).
const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Reads an image from the given file path into a [`PixelBuffer`].
///
/// The file is mapped to memory and decoded with the image crate. 8-bit RGB
/// and RGBA images map directly; 8-bit grayscale is expanded to RGB. Other
/// color types are rejected.
///
/// # Arguments
///
/// * `file_path` - The path to a JPEG, PNG or BMP file.
///
/// # Returns
///
/// A pixel buffer with a packed stride in [`PixelFormat::Rgb8`] or
/// [`PixelFormat::Rgba8`] layout.
pub fn read_image(file_path: impl AsRef<Path>) -> Result<PixelBuffer, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists and has a supported extension
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let valid_extension = file_path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        SUPPORTED_EXTENSIONS.iter().any(|e| ext == *e)
    });
    if !valid_extension {
        return Err(IoError::InvalidFileExtension(file_path));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(&file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap))
        .with_guessed_format()?
        .decode()?;

    let width = img.width() as usize;
    let height = img.height() as usize;

    let buffer = match img.color() {
        image::ColorType::L8 | image::ColorType::Rgb8 => PixelBuffer::new(
            width,
            height,
            PixelFormat::Rgb8,
            img.into_rgb8().into_raw(),
        )?,
        image::ColorType::Rgba8 => PixelBuffer::new(
            width,
            height,
            PixelFormat::Rgba8,
            img.into_rgba8().into_raw(),
        )?,
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };

    Ok(buffer)
}

/// Writes the given pixel buffer to the given file path as PNG.
///
/// BGR channel orders are swizzled to RGB and stride padding is dropped
/// before encoding.
///
/// # Arguments
///
/// * `file_path` - The path of the PNG file to write.
/// * `image_buf` - The pixel buffer to encode.
pub fn write_image_png(
    file_path: impl AsRef<Path>,
    image_buf: &PixelBuffer,
) -> Result<(), IoError> {
    let width = image_buf.width();
    let height = image_buf.height();
    let bpp = image_buf.bytes_per_pixel();
    let swizzle = matches!(
        image_buf.format(),
        PixelFormat::Bgr8 | PixelFormat::Bgra8
    );

    let mut packed = Vec::with_capacity(width * height * bpp);
    for y in 0..height {
        for pix in image_buf.row(y).chunks_exact(bpp) {
            if swizzle {
                packed.extend_from_slice(&[pix[2], pix[1], pix[0]]);
                packed.extend_from_slice(&pix[3..]);
            } else {
                packed.extend_from_slice(pix);
            }
        }
    }

    let color_type = if image_buf.format().has_alpha() {
        image::ExtendedColorType::Rgba8
    } else {
        image::ExtendedColorType::Rgb8
    };

    image::save_buffer_with_format(
        file_path,
        &packed,
        width as u32,
        height as u32,
        color_type,
        image::ImageFormat::Png,
    )?;

    Ok(())
}
