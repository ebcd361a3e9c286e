use convfilter_image::{ImageError, PixelBuffer};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::kernel::Kernel3;

/// Convolve one destination row.
///
/// Border pixels use the edge-clamp-to-self policy: when `x` (or `y`) sits on
/// the image border, `edge_x` (or `edge_y`) is zero and every kernel offset in
/// that axis collapses to the pixel itself. This reproduces the behavior of
/// the original filter and is NOT the conventional per-offset clamp-to-edge;
/// the two disagree on borders and must not be swapped.
fn convolve_row(
    src: &PixelBuffer,
    weights: &[[i32; 3]; 3],
    normalization: f64,
    y: usize,
    dst_row: &mut [u8],
) {
    let width = src.width();
    let height = src.height();
    let bpp = src.bytes_per_pixel();

    let edge_y = usize::from(y > 0 && y < height - 1);
    let src_row = src.row(y);

    for (x, dst_pix) in dst_row.chunks_exact_mut(bpp).enumerate() {
        let edge_x = usize::from(x > 0 && x < width - 1);

        let mut sum = [0.0f64; 3];
        for (i, kernel_row) in weights.iter().enumerate() {
            // y + edge_y * (i - 1); edge_y == 1 implies y >= 1
            let sample_row = src.row(y + i * edge_y - edge_y);
            for (j, &w) in kernel_row.iter().enumerate() {
                let sx = x + j * edge_x - edge_x;
                let pix = &sample_row[sx * bpp..sx * bpp + 3];
                let w = f64::from(w);
                sum[0] += f64::from(pix[0]) * w;
                sum[1] += f64::from(pix[1]) * w;
                sum[2] += f64::from(pix[2]) * w;
            }
        }

        for (dst_c, s) in dst_pix.iter_mut().zip(sum.iter()) {
            *dst_c = (s / normalization).clamp(0.0, 255.0).round() as u8;
        }
        if bpp == 4 {
            dst_pix[3] = src_row[x * bpp + 3];
        }
    }
}

/// Apply a 3x3 convolution kernel to an image, in parallel by row.
///
/// The normalization divisor is the kernel's weight sum, or 1 when the sum is
/// zero, so zero-sum edge-detection kernels never divide by zero.
///
/// Each color channel is convolved independently; the accumulated sum is
/// divided by the normalization divisor, clamped to `[0, 255]` and rounded
/// half away from zero. The alpha channel, when present, is copied unchanged
/// from the source. Rows are processed on the rayon thread pool; every row
/// reads only the source buffer and writes a disjoint destination row, so the
/// result is byte-identical to the serial path regardless of thread count.
///
/// # Arguments
///
/// * `src` - The source image; it is not mutated.
/// * `kernel` - The 3x3 kernel to apply.
///
/// # Returns
///
/// A newly allocated image with the same width, height and pixel format as
/// the source, and a packed stride.
///
/// # Examples
///
/// ```
/// use convfilter_image::{PixelBuffer, PixelFormat};
/// use convfilter_imgproc::{filter2d, kernel::presets};
///
/// let src = PixelBuffer::from_size_val(4, 3, PixelFormat::Rgb8, 128).unwrap();
/// let dst = filter2d(&src, &presets::sharpen()).unwrap();
///
/// assert_eq!(dst.width(), 4);
/// assert_eq!(dst.height(), 3);
/// ```
pub fn filter2d(src: &PixelBuffer, kernel: &Kernel3) -> Result<PixelBuffer, ImageError> {
    filter2d_with_normalization(src, kernel, kernel.normalization())
}

/// Apply a 3x3 convolution kernel with an explicit normalization divisor.
///
/// Same as [`filter2d`] but the caller supplies the divisor instead of
/// deriving it from the kernel's weight sum.
///
/// # Errors
///
/// Fails with [`ImageError::InvalidNormalization`] when the divisor is zero
/// or not finite.
pub fn filter2d_with_normalization(
    src: &PixelBuffer,
    kernel: &Kernel3,
    normalization: f64,
) -> Result<PixelBuffer, ImageError> {
    if normalization == 0.0 || !normalization.is_finite() {
        return Err(ImageError::InvalidNormalization(normalization));
    }

    let dst_stride = src.width() * src.bytes_per_pixel();
    let mut dst_data = vec![0u8; dst_stride * src.height()];

    let weights = kernel.weights();
    dst_data
        .par_chunks_exact_mut(dst_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            convolve_row(src, weights, normalization, y, dst_row);
        });

    PixelBuffer::new(src.width(), src.height(), src.format(), dst_data)
}

/// Apply a 3x3 convolution kernel on the current thread.
///
/// Single-threaded twin of [`filter2d`], mainly useful for small images and
/// for checking the parallel path against.
pub fn filter2d_serial(src: &PixelBuffer, kernel: &Kernel3) -> Result<PixelBuffer, ImageError> {
    let normalization = kernel.normalization();
    let dst_stride = src.width() * src.bytes_per_pixel();
    let mut dst_data = vec![0u8; dst_stride * src.height()];

    let weights = kernel.weights();
    dst_data
        .chunks_exact_mut(dst_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            convolve_row(src, weights, normalization, y, dst_row);
        });

    PixelBuffer::new(src.width(), src.height(), src.format(), dst_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::presets;
    use convfilter_image::PixelFormat;

    fn image_rgb(
        width: usize,
        height: usize,
        f: impl Fn(usize, usize) -> [u8; 3],
    ) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        PixelBuffer::new(width, height, PixelFormat::Rgb8, data).unwrap()
    }

    fn image_rgba(
        width: usize,
        height: usize,
        f: impl Fn(usize, usize) -> [u8; 4],
    ) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        PixelBuffer::new(width, height, PixelFormat::Rgba8, data).unwrap()
    }

    #[test]
    fn identity_is_noop() -> Result<(), ImageError> {
        let src = image_rgb(5, 4, |x, y| {
            let v = (x * 31 + y * 57) as u8;
            [v, v.wrapping_add(1), v.wrapping_add(2)]
        });
        let dst = filter2d(&src, &presets::identity())?;
        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn identity_with_padded_source_stride() -> Result<(), ImageError> {
        // 2x2 rgb rows padded to 8 bytes
        let data = vec![
            10, 11, 12, 20, 21, 22, 0, 0, //
            30, 31, 32, 40, 41, 42, 0, 0, //
        ];
        let src = PixelBuffer::from_raw_parts(2, 2, 8, PixelFormat::Rgb8, data)?;
        let dst = filter2d(&src, &presets::identity())?;

        assert_eq!(dst.stride(), 6);
        for y in 0..2 {
            assert_eq!(dst.row(y), src.row(y));
        }
        Ok(())
    }

    #[test]
    fn zero_sum_kernel_divides_by_one() -> Result<(), ImageError> {
        let src = image_rgb(4, 4, |_, _| [100, 100, 100]);
        let dst = filter2d(&src, &presets::laplacian())?;
        // a flat image has no edges; the laplacian response is zero everywhere
        assert!(dst.as_slice().iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn flat_image_is_fixed_point() -> Result<(), ImageError> {
        let src = image_rgb(6, 5, |_, _| [37, 37, 37]);
        for kernel in [
            presets::box_blur(),
            presets::gaussian_blur(),
            presets::sharpen(),
        ] {
            let dst = filter2d(&src, &kernel)?;
            assert_eq!(dst.as_slice(), src.as_slice(), "kernel {:?}", kernel);
        }
        Ok(())
    }

    #[test]
    fn border_pixels_clamp_to_self() -> Result<(), ImageError> {
        // distinct per-pixel values; all three channels carry the same value
        let values = [[10u8, 2, 7], [4, 9, 1], [8, 3, 6]];
        let src = image_rgb(3, 3, |x, y| [values[y][x]; 3]);
        let dst = filter2d(&src, &presets::box_blur())?;

        // corner (0,0): both axes collapse, all nine samples are the pixel
        // itself. Conventional clamp-to-edge would give round(61/9) = 7.
        assert_eq!(dst.pixel(0, 0), &[10, 10, 10]);
        assert_eq!(dst.pixel(2, 2), &[6, 6, 6]);

        // top edge (1,0): the y axis collapses, each column is sampled three
        // times at y = 0: round((10 + 2 + 7) * 3 / 9) = 6
        assert_eq!(dst.pixel(1, 0), &[6, 6, 6]);

        // left edge (0,1): round((10 + 4 + 8) * 3 / 9) = 7
        assert_eq!(dst.pixel(0, 1), &[7, 7, 7]);

        // interior (1,1): all nine distinct samples, round(50 / 9) = 6
        assert_eq!(dst.pixel(1, 1), &[6, 6, 6]);
        Ok(())
    }

    #[test]
    fn output_clamps_without_wrapping() -> Result<(), ImageError> {
        let src = image_rgb(3, 3, |_, _| [100, 100, 100]);

        let amplify = Kernel3::new([[0, 0, 0], [0, 10, 0], [0, 0, 0]]);
        let dst = filter2d_with_normalization(&src, &amplify, 1.0)?;
        assert!(dst.as_slice().iter().all(|&b| b == 255));

        let negate = Kernel3::new([[0, 0, 0], [0, -1, 0], [0, 0, 0]]);
        let dst = filter2d_with_normalization(&src, &negate, 1.0)?;
        assert!(dst.as_slice().iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn rounds_half_away_from_zero() -> Result<(), ImageError> {
        let src = image_rgb(1, 1, |_, _| [1, 1, 1]);
        let triple = Kernel3::new([[0, 0, 0], [0, 3, 0], [0, 0, 0]]);
        // 3 / 2 = 1.5 rounds up to 2
        let dst = filter2d_with_normalization(&src, &triple, 2.0)?;
        assert_eq!(dst.pixel(0, 0), &[2, 2, 2]);
        Ok(())
    }

    #[test]
    fn dimensions_are_preserved() -> Result<(), ImageError> {
        for (width, height) in [(1, 1), (1, 5), (7, 1), (2, 2), (64, 48)] {
            let src = image_rgb(width, height, |x, y| [(x + y) as u8; 3]);
            let dst = filter2d(&src, &presets::sharpen())?;
            assert_eq!(dst.width(), width);
            assert_eq!(dst.height(), height);
            assert_eq!(dst.format(), src.format());
            assert_eq!(dst.stride(), width * 3);
        }
        Ok(())
    }

    #[test]
    fn parallel_matches_serial() -> Result<(), ImageError> {
        let src = image_rgba(64, 48, |x, y| {
            [
                (x * 7 + y * 13) as u8,
                (x * 3 + y * 29) as u8,
                (x * 11 + y * 5) as u8,
                (x + y * 2) as u8,
            ]
        });
        for kernel in [presets::box_blur(), presets::laplacian(), presets::emboss()] {
            let parallel = filter2d(&src, &kernel)?;
            let serial = filter2d_serial(&src, &kernel)?;
            assert_eq!(parallel.as_slice(), serial.as_slice(), "kernel {:?}", kernel);

            let again = filter2d(&src, &kernel)?;
            assert_eq!(parallel.as_slice(), again.as_slice(), "kernel {:?}", kernel);
        }
        Ok(())
    }

    #[test]
    fn alpha_is_copied_from_source() -> Result<(), ImageError> {
        let src = image_rgba(8, 6, |x, y| {
            [(x * 40) as u8, (y * 40) as u8, 128, (x * 50 + y) as u8]
        });
        let dst = filter2d(&src, &presets::box_blur())?;
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(dst.pixel(x, y)[3], src.pixel(x, y)[3]);
            }
        }
        Ok(())
    }

    #[test]
    fn channel_order_does_not_matter() -> Result<(), ImageError> {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 53 % 251) as u8).collect();
        let rgb = PixelBuffer::new(4, 3, PixelFormat::Rgb8, data.clone())?;
        let bgr = PixelBuffer::new(4, 3, PixelFormat::Bgr8, data)?;

        let dst_rgb = filter2d(&rgb, &presets::gaussian_blur())?;
        let dst_bgr = filter2d(&bgr, &presets::gaussian_blur())?;
        assert_eq!(dst_rgb.as_slice(), dst_bgr.as_slice());
        assert_eq!(dst_bgr.format(), PixelFormat::Bgr8);
        Ok(())
    }

    #[test]
    fn zero_normalization_is_rejected() {
        let src = image_rgb(2, 2, |_, _| [1, 2, 3]);
        let res = filter2d_with_normalization(&src, &presets::identity(), 0.0);
        assert_eq!(res.err(), Some(ImageError::InvalidNormalization(0.0)));

        let res = filter2d_with_normalization(&src, &presets::identity(), f64::NAN);
        assert!(matches!(res, Err(ImageError::InvalidNormalization(_))));
    }
}
