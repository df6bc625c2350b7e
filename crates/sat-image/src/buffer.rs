//! Raw sample storage with radiometric calibration.
//!
//! A buffer keeps the original integer samples next to the linear
//! calibration that turns them into physical values
//! (`physical = raw * slope + offset`). Large image grids keep their integer
//! footprint and precision this way; calibrated values are computed on
//! demand.

use num_traits::PrimInt;

use crate::error::{ImageError, ImageResult};

/// Linear calibration attached to a sample buffer.
#[derive(Debug, Clone, Copy)]
pub struct Calibration<T> {
    /// Multiplier from raw sample to physical value.
    pub slope: f64,
    /// Additive offset from raw sample to physical value.
    pub offset: f64,
    /// Sentinel raw value meaning "no data".
    pub missing: T,
    /// Whether calibrated values are themselves an integer domain rather
    /// than continuous physical quantities.
    pub scales_to_int: bool,
}

/// Conventional missing-value sentinel for a sample type: the maximum for
/// unsigned types, the minimum for signed ones.
pub fn default_missing<T: PrimInt>() -> T {
    if T::min_value() == T::zero() {
        T::max_value()
    } else {
        T::min_value()
    }
}

/// Read-only access to a calibrated image buffer, independent of the
/// underlying sample type.
pub trait PixelBuffer: std::fmt::Debug {
    /// Number of columns.
    fn columns(&self) -> usize;

    /// Number of lines.
    fn lines(&self) -> usize;

    /// Bits needed to represent the largest sample in the buffer.
    fn bpp(&self) -> u8;

    /// Calibration slope.
    fn slope(&self) -> f64;

    /// Calibration offset.
    fn offset(&self) -> f64;

    /// Whether calibrated values form another integer domain.
    fn scales_to_int(&self) -> bool;

    /// Raw sample at column `x`, line `y`.
    fn unscaled(&self, x: usize, y: usize) -> ImageResult<i64>;

    /// Calibrated value at column `x`, line `y`. The missing sentinel
    /// becomes NaN.
    fn scaled(&self, x: usize, y: usize) -> ImageResult<f64>;

    /// Every raw sample, row-major.
    fn all_unscaled(&self) -> Vec<i64>;

    /// Every calibrated value, row-major.
    fn all_scaled(&self) -> Vec<f64>;

    /// Decimal digits of precision implied by the slope.
    fn decimal_scale(&self) -> i32;

    /// A new buffer covering the `width` x `height` rectangle at (`x`, `y`),
    /// with the same calibration.
    fn crop(&self, x: usize, y: usize, width: usize, height: usize)
        -> ImageResult<Box<dyn PixelBuffer>>;
}

/// Owns the raw samples of one image together with their calibration.
#[derive(Debug, Clone)]
pub struct CalibratedBuffer<T> {
    columns: usize,
    lines: usize,
    samples: Vec<T>,
    calibration: Calibration<T>,
    bpp: u8,
}

impl<T: PrimInt + Into<i64> + std::fmt::Debug + 'static> CalibratedBuffer<T> {
    /// Take ownership of a row-major sample array.
    ///
    /// Fails when the sample count does not match `columns * lines`. The
    /// per-pixel bit depth is derived from the largest sample actually
    /// present, not taken from source metadata.
    pub fn from_samples(
        columns: usize,
        lines: usize,
        samples: Vec<T>,
        calibration: Calibration<T>,
    ) -> ImageResult<Self> {
        if samples.len() != columns * lines {
            return Err(ImageError::SampleCountMismatch {
                expected: columns * lines,
                actual: samples.len(),
            });
        }
        let bpp = bits_for(&samples);
        Ok(Self {
            columns,
            lines,
            samples,
            calibration,
            bpp,
        })
    }

    /// Raw sample in its native type.
    pub fn sample(&self, x: usize, y: usize) -> ImageResult<T> {
        Ok(self.samples[self.index(x, y)?])
    }

    fn index(&self, x: usize, y: usize) -> ImageResult<usize> {
        if x >= self.columns || y >= self.lines {
            return Err(ImageError::OutOfRange {
                x,
                y,
                columns: self.columns,
                lines: self.lines,
            });
        }
        Ok(y * self.columns + x)
    }

    fn scale(&self, raw: T) -> f64 {
        if raw == self.calibration.missing {
            f64::NAN
        } else {
            Into::<i64>::into(raw) as f64 * self.calibration.slope + self.calibration.offset
        }
    }
}

impl<T: PrimInt + Into<i64> + std::fmt::Debug + 'static> PixelBuffer for CalibratedBuffer<T> {
    fn columns(&self) -> usize {
        self.columns
    }

    fn lines(&self) -> usize {
        self.lines
    }

    fn bpp(&self) -> u8 {
        self.bpp
    }

    fn slope(&self) -> f64 {
        self.calibration.slope
    }

    fn offset(&self) -> f64 {
        self.calibration.offset
    }

    fn scales_to_int(&self) -> bool {
        self.calibration.scales_to_int
    }

    fn unscaled(&self, x: usize, y: usize) -> ImageResult<i64> {
        Ok(self.sample(x, y)?.into())
    }

    fn scaled(&self, x: usize, y: usize) -> ImageResult<f64> {
        Ok(self.scale(self.sample(x, y)?))
    }

    fn all_unscaled(&self) -> Vec<i64> {
        self.samples.iter().map(|&s| s.into()).collect()
    }

    fn all_scaled(&self) -> Vec<f64> {
        self.samples.iter().map(|&s| self.scale(s)).collect()
    }

    fn decimal_scale(&self) -> i32 {
        decimal_digits(self.calibration.slope)
    }

    fn crop(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> ImageResult<Box<dyn PixelBuffer>> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidMetadata(format!(
                "empty {}x{} crop",
                width, height
            )));
        }
        if x + width > self.columns || y + height > self.lines {
            return Err(ImageError::OutOfRange {
                x: x + width - 1,
                y: y + height - 1,
                columns: self.columns,
                lines: self.lines,
            });
        }

        let mut samples = Vec::with_capacity(width * height);
        for line in y..y + height {
            let start = line * self.columns + x;
            samples.extend_from_slice(&self.samples[start..start + width]);
        }

        let cropped = CalibratedBuffer::from_samples(width, height, samples, self.calibration)?;
        Ok(Box::new(cropped))
    }
}

/// Bit width of the largest sample: `ceil(log2(max + 1))`, computed with
/// integer arithmetic.
fn bits_for<T: PrimInt + Into<i64>>(samples: &[T]) -> u8 {
    let max = samples
        .iter()
        .copied()
        .fold(T::zero(), |a, b| if b > a { b } else { a });
    let max: i64 = max.into();
    (64 - (max as u64).leading_zeros()) as u8
}

/// Decimal digits of precision implied by a calibration slope: the power of
/// ten below the slope, plus one when the slope is not an exact power of
/// ten.
fn decimal_digits(slope: f64) -> i32 {
    let k = (-slope.log10()).floor();
    if 10f64.powf(-k) == slope {
        k as i32
    } else {
        k as i32 + 1
    }
}
