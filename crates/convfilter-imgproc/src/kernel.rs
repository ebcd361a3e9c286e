use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while parsing a kernel from user text.
#[derive(Error, Debug, PartialEq)]
pub enum ParseKernelError {
    /// The text did not contain exactly nine weights.
    #[error("expected 9 kernel weights, got {0}")]
    InvalidWeightCount(usize),

    /// A weight field was not a valid integer.
    #[error("invalid kernel weight: {0:?}")]
    InvalidWeight(String),
}

/// A 3x3 convolution kernel of signed integer weights, row major.
///
/// The kernel is immutable for the duration of a convolution pass. Its
/// normalization divisor is the sum of its weights, except that a zero sum
/// (common for edge-detection kernels) normalizes to 1 so that the filter
/// never divides by zero.
///
/// # Examples
///
/// ```
/// use convfilter_imgproc::Kernel3;
///
/// let kernel = Kernel3::new([[0, 1, 0], [1, -4, 1], [0, 1, 0]]);
///
/// assert_eq!(kernel.weight_sum(), 0);
/// assert_eq!(kernel.normalization(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kernel3([[i32; 3]; 3]);

impl Kernel3 {
    /// Create a kernel from row-major 3x3 weights.
    pub const fn new(weights: [[i32; 3]; 3]) -> Self {
        Self(weights)
    }

    /// Create a kernel from nine row-major weights.
    pub const fn from_flat(w: [i32; 9]) -> Self {
        Self([[w[0], w[1], w[2]], [w[3], w[4], w[5]], [w[6], w[7], w[8]]])
    }

    /// The row-major 3x3 weights.
    pub const fn weights(&self) -> &[[i32; 3]; 3] {
        &self.0
    }

    /// Sum of all nine weights.
    pub fn weight_sum(&self) -> i64 {
        self.0.iter().flatten().map(|&w| i64::from(w)).sum()
    }

    /// The normalization divisor: the weight sum, or 1 when the sum is zero.
    pub fn normalization(&self) -> f64 {
        match self.weight_sum() {
            0 => 1.0,
            sum => sum as f64,
        }
    }
}

impl FromStr for Kernel3 {
    type Err = ParseKernelError;

    /// Parse nine comma or whitespace separated integers, row major.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();

        if fields.len() != 9 {
            return Err(ParseKernelError::InvalidWeightCount(fields.len()));
        }

        let mut w = [0i32; 9];
        for (dst, field) in w.iter_mut().zip(fields.iter()) {
            *dst = field
                .parse()
                .map_err(|_| ParseKernelError::InvalidWeight(field.to_string()))?;
        }

        Ok(Self::from_flat(w))
    }
}

/// Named kernels matching the presets users commonly type in by hand.
pub mod presets {
    use super::Kernel3;

    /// The identity kernel, a no-op filter.
    pub const fn identity() -> Kernel3 {
        Kernel3::new([[0, 0, 0], [0, 1, 0], [0, 0, 0]])
    }

    /// A uniform 3x3 box blur.
    pub const fn box_blur() -> Kernel3 {
        Kernel3::new([[1, 1, 1], [1, 1, 1], [1, 1, 1]])
    }

    /// A 3x3 binomial approximation of a gaussian blur.
    pub const fn gaussian_blur() -> Kernel3 {
        Kernel3::new([[1, 2, 1], [2, 4, 2], [1, 2, 1]])
    }

    /// A sharpening kernel.
    pub const fn sharpen() -> Kernel3 {
        Kernel3::new([[0, -1, 0], [-1, 5, -1], [0, -1, 0]])
    }

    /// The 4-connected laplacian edge-detection kernel (zero weight sum).
    pub const fn laplacian() -> Kernel3 {
        Kernel3::new([[0, 1, 0], [1, -4, 1], [0, 1, 0]])
    }

    /// An emboss kernel.
    pub const fn emboss() -> Kernel3 {
        Kernel3::new([[-2, -1, 0], [-1, 1, 1], [0, 1, 2]])
    }

    /// Look up a preset kernel by name.
    pub fn by_name(name: &str) -> Option<Kernel3> {
        match name {
            "identity" => Some(identity()),
            "box" | "box_blur" => Some(box_blur()),
            "gaussian" | "gaussian_blur" => Some(gaussian_blur()),
            "sharpen" => Some(sharpen()),
            "laplacian" => Some(laplacian()),
            "emboss" => Some(emboss()),
            _ => None,
        }
    }
}
