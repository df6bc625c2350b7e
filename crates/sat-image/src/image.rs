//! Image metadata, acquisition time, and per-image derived geometry.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use geos_projection::constants::EQUATOR_RADIUS;
use geos_projection::{Geos, MapPoint, ProjectedPoint};

use crate::buffer::PixelBuffer;
use crate::error::{ImageError, ImageResult};

/// Unix timestamp of 2000-01-01T00:00:00 UTC.
const EPOCH_2000: i64 = 946_684_800;

/// Acquisition time of one image, minute precision, always UTC.
///
/// Constructed from calendar fields and validated up front; an invalid date
/// never produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AcquisitionTime(DateTime<Utc>);

impl AcquisitionTime {
    /// Validate calendar fields into an acquisition time.
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> ImageResult<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .map(Self)
            .ok_or_else(|| {
                ImageError::MalformedTimestamp(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}",
                    year, month, day, hour, minute
                ))
            })
    }

    /// Parse the compact `YYYYMMDDHHMM` form used by product headers.
    pub fn parse(s: &str) -> ImageResult<Self> {
        if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ImageError::MalformedTimestamp(s.to_string()));
        }
        let field = |range: std::ops::Range<usize>| {
            s[range]
                .parse::<u32>()
                .map_err(|_| ImageError::MalformedTimestamp(s.to_string()))
        };
        Self::new(
            field(0..4)? as i32,
            field(4..6)?,
            field(6..8)?,
            field(8..10)?,
            field(10..12)?,
        )
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Seconds elapsed since 2000-01-01T00:00:00 UTC.
    ///
    /// Pure UTC calendar arithmetic; the process timezone plays no part.
    pub fn seconds_since_2000(&self) -> i64 {
        self.0.timestamp() - EPOCH_2000
    }
}

impl fmt::Display for AcquisitionTime {
    /// `YYYY-MM-DD HH:MM`, zero padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// Metadata and pixel data of one decoded satellite image.
///
/// Built in one shot by an importer; every field is read-only afterwards.
/// The projection is shared across images from the same spacecraft, the
/// pixel buffer is exclusively owned.
#[derive(Debug)]
pub struct Image {
    time: AcquisitionTime,
    spacecraft_id: u16,
    channel_id: u8,
    projection: Arc<Geos>,
    /// Column resolution factor: projected pixels per degree of view angle
    /// (the CFAC header value scaled by 2^-16).
    column_res: f64,
    /// Line resolution factor, same units as `column_res`.
    line_res: f64,
    /// Column of the sub-satellite point in the uncropped image.
    column_offset: i32,
    /// Line of the sub-satellite point in the uncropped image.
    line_offset: i32,
    /// Horizontal crop origin relative to the uncropped image.
    x0: i32,
    /// Vertical crop origin relative to the uncropped image.
    y0: i32,
    data: Box<dyn PixelBuffer>,
}

impl Image {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: AcquisitionTime,
        spacecraft_id: u16,
        channel_id: u8,
        projection: Arc<Geos>,
        column_res: f64,
        line_res: f64,
        column_offset: i32,
        line_offset: i32,
        x0: i32,
        y0: i32,
        data: Box<dyn PixelBuffer>,
    ) -> ImageResult<Self> {
        if !(column_res > 0.0 && line_res > 0.0) {
            return Err(ImageError::InvalidMetadata(format!(
                "resolution factors must be strictly positive, got {} x {}",
                column_res, line_res
            )));
        }
        Ok(Self {
            time,
            spacecraft_id,
            channel_id,
            projection,
            column_res,
            line_res,
            column_offset,
            line_offset,
            x0,
            y0,
            data,
        })
    }

    pub fn time(&self) -> AcquisitionTime {
        self.time
    }

    pub fn spacecraft_id(&self) -> u16 {
        self.spacecraft_id
    }

    pub fn channel_id(&self) -> u8 {
        self.channel_id
    }

    pub fn projection(&self) -> &Arc<Geos> {
        &self.projection
    }

    pub fn column_res(&self) -> f64 {
        self.column_res
    }

    pub fn line_res(&self) -> f64 {
        self.line_res
    }

    pub fn column_offset(&self) -> i32 {
        self.column_offset
    }

    pub fn line_offset(&self) -> i32 {
        self.line_offset
    }

    pub fn x0(&self) -> i32 {
        self.x0
    }

    pub fn y0(&self) -> i32 {
        self.y0
    }

    /// The calibrated pixel data.
    pub fn data(&self) -> &dyn PixelBuffer {
        self.data.as_ref()
    }

    /// Number of columns in the pixel buffer.
    pub fn columns(&self) -> usize {
        self.data.columns()
    }

    /// Number of lines in the pixel buffer.
    pub fn lines(&self) -> usize {
        self.data.lines()
    }

    /// Seconds between the acquisition time and 2000-01-01T00:00:00 UTC.
    pub fn seconds_since_2000(&self) -> i64 {
        self.time.seconds_since_2000()
    }

    /// View angles of the pixel at (`column`, `line`).
    pub fn pixel_to_projected(&self, column: usize, line: usize) -> ProjectedPoint {
        ProjectedPoint::new(
            (column as f64 + f64::from(self.x0) - f64::from(self.column_offset)) / self.column_res,
            (line as f64 + f64::from(self.y0) - f64::from(self.line_offset)) / self.line_res,
        )
    }

    /// Geographic coordinates of the pixel at (`column`, `line`).
    ///
    /// Fails with an out-of-disk error for pixels that look past the Earth
    /// limb (full-disk corners do).
    pub fn pixel_to_map(&self, column: usize, line: usize) -> ImageResult<MapPoint> {
        Ok(self
            .projection
            .projected_to_map(&self.pixel_to_projected(column, line))?)
    }

    /// Nearest pixel to a geographic point.
    ///
    /// The result may lie outside the buffer when the point falls off the
    /// cropped area; callers check against [`Self::columns`]/[`Self::lines`].
    pub fn map_to_pixel(&self, point: &MapPoint) -> ImageResult<(i64, i64)> {
        let p = self.projection.map_to_projected(point)?;
        let column = (p.x * self.column_res).round() as i64 + i64::from(self.column_offset)
            - i64::from(self.x0);
        let line =
            (p.y * self.line_res).round() as i64 + i64::from(self.line_offset) - i64::from(self.y0);
        Ok((column, line))
    }

    /// Ground size in km of one pixel at the sub-satellite point.
    pub fn pixel_size(&self) -> f64 {
        let height = self.projection.orbit_radius() - EQUATOR_RADIUS;
        height * (1.0 / self.column_res).to_radians().tan()
    }

    /// SEVIRI angular sampling constant between adjacent columns: the number
    /// of pixel steps that cover the full disk swath.
    pub fn seviri_dx(&self) -> u32 {
        let height = self.projection.orbit_radius() - EQUATOR_RADIUS;
        let swath = 2.0 * (EQUATOR_RADIUS / self.projection.orbit_radius()).asin();
        (swath / (self.pixel_size() / height).atan()).round() as u32
    }

    /// Line sampling constant; pixels are square, so this equals
    /// [`Self::seviri_dx`].
    pub fn seviri_dy(&self) -> u32 {
        self.seviri_dx()
    }

    /// A copy of this image restricted to the given pixel rectangle.
    ///
    /// The crop origin shifts `x0`/`y0`, so pixel/coordinate mapping keeps
    /// pointing at the same ground locations.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> ImageResult<Image> {
        let data = self.data.crop(x, y, width, height)?;
        Ok(Image {
            time: self.time,
            spacecraft_id: self.spacecraft_id,
            channel_id: self.channel_id,
            projection: Arc::clone(&self.projection),
            column_res: self.column_res,
            line_res: self.line_res,
            column_offset: self.column_offset,
            line_offset: self.line_offset,
            x0: self.x0 + x as i32,
            y0: self.y0 + y as i32,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{default_missing, CalibratedBuffer, Calibration};

    /// SEVIRI full-disk column factor scaled by 2^-16.
    fn seviri_res() -> f64 {
        13_642_337.0 / 65_536.0
    }

    fn test_image() -> Image {
        let samples: Vec<u16> = (0u16..16).collect();
        let data = CalibratedBuffer::from_samples(
            4,
            4,
            samples,
            Calibration {
                slope: 0.01,
                offset: 0.0,
                missing: default_missing::<u16>(),
                scales_to_int: false,
            },
        )
        .unwrap();

        // x0/y0 put the 4x4 grid over the sub-satellite point: pixel (2, 2)
        // lands exactly on the image centre column/line 1856.
        Image::new(
            AcquisitionTime::new(2004, 1, 19, 12, 0).unwrap(),
            55,
            2,
            Arc::new(Geos::nominal(0.0)),
            seviri_res(),
            seviri_res(),
            1856,
            1856,
            1854,
            1854,
            Box::new(data),
        )
        .unwrap()
    }

    #[test]
    fn timestamp_formatting_is_zero_padded() {
        let time = AcquisitionTime::new(2004, 1, 19, 12, 0).unwrap();
        assert_eq!(time.to_string(), "2004-01-19 12:00");

        let time = AcquisitionTime::new(2024, 11, 3, 5, 7).unwrap();
        assert_eq!(time.to_string(), "2024-11-03 05:07");
    }

    #[test]
    fn seconds_since_2000_is_utc_calendar_arithmetic() {
        // 1479 full days from 2000-01-01 to 2004-01-19, plus 12 hours.
        let time = AcquisitionTime::new(2004, 1, 19, 12, 0).unwrap();
        assert_eq!(time.seconds_since_2000(), 127_828_800);

        let epoch = AcquisitionTime::new(2000, 1, 1, 0, 0).unwrap();
        assert_eq!(epoch.seconds_since_2000(), 0);
    }

    #[test]
    fn invalid_calendar_fields_are_rejected() {
        assert!(matches!(
            AcquisitionTime::new(2004, 13, 19, 12, 0),
            Err(ImageError::MalformedTimestamp(_))
        ));
        assert!(matches!(
            AcquisitionTime::new(2023, 2, 29, 0, 0),
            Err(ImageError::MalformedTimestamp(_))
        ));
        assert!(matches!(
            AcquisitionTime::new(2004, 1, 19, 24, 0),
            Err(ImageError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn compact_timestamp_parsing() {
        let time = AcquisitionTime::parse("200401191200").unwrap();
        assert_eq!(time.year(), 2004);
        assert_eq!(time.month(), 1);
        assert_eq!(time.day(), 19);
        assert_eq!(time.hour(), 12);
        assert_eq!(time.minute(), 0);

        assert!(AcquisitionTime::parse("20040119120").is_err());
        assert!(AcquisitionTime::parse("2004011912xx").is_err());
        assert!(AcquisitionTime::parse("200413191200").is_err());
    }

    #[test]
    fn resolution_factors_must_be_positive() {
        let data = CalibratedBuffer::from_samples(
            1,
            1,
            vec![0u8],
            Calibration {
                slope: 1.0,
                offset: 0.0,
                missing: u8::MAX,
                scales_to_int: true,
            },
        )
        .unwrap();

        let result = Image::new(
            AcquisitionTime::new(2004, 1, 19, 12, 0).unwrap(),
            55,
            2,
            Arc::new(Geos::nominal(0.0)),
            0.0,
            seviri_res(),
            1856,
            1856,
            0,
            0,
            Box::new(data),
        );
        assert!(matches!(result, Err(ImageError::InvalidMetadata(_))));
    }

    #[test]
    fn centre_pixel_sits_on_the_sub_satellite_point() {
        let img = test_image();

        let p = img.pixel_to_projected(2, 2);
        assert!(p.x.abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);

        let m = img.pixel_to_map(2, 2).unwrap();
        assert!(m.lat.abs() < 1e-9);
        assert!(m.lon.abs() < 1e-9);

        let (column, line) = img.map_to_pixel(&MapPoint::new(0.0, 0.0)).unwrap();
        assert_eq!((column, line), (2, 2));
    }

    #[test]
    fn pixel_map_roundtrip() {
        let img = test_image();

        for (column, line) in [(0, 0), (3, 1), (1, 3)] {
            let point = img.pixel_to_map(column, line).unwrap();
            let (c, l) = img.map_to_pixel(&point).unwrap();
            assert_eq!((c, l), (column as i64, line as i64));
        }
    }

    #[test]
    fn derived_geometry_matches_seviri_nominal_values() {
        let img = test_image();

        // 3 km pixels at the sub-satellite point for the full-disk factor.
        assert!(
            (img.pixel_size() - 3.0).abs() < 0.01,
            "pixel size {} km",
            img.pixel_size()
        );
        assert_eq!(img.seviri_dx(), 3622);
        assert_eq!(img.seviri_dy(), img.seviri_dx());
    }

    #[test]
    fn crop_shifts_the_pixel_origin() {
        let img = test_image();
        let cropped = img.crop(1, 1, 2, 2).unwrap();

        assert_eq!(cropped.columns(), 2);
        assert_eq!(cropped.lines(), 2);
        assert_eq!(cropped.x0(), 1855);
        assert_eq!(cropped.y0(), 1855);

        // Pixel (1, 1) of the crop is pixel (2, 2) of the original.
        assert_eq!(
            cropped.data().unscaled(1, 1).unwrap(),
            img.data().unscaled(2, 2).unwrap()
        );
        let m = cropped.pixel_to_map(1, 1).unwrap();
        assert!(m.lat.abs() < 1e-9);
        assert!(m.lon.abs() < 1e-9);
    }
}
