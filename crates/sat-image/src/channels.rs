//! Reference calibration for known spectral channels.
//!
//! Importers compare the calibration found in a product against externally
//! known reference values for the channel. Differences are reported as
//! warning-level signals, never as failures: a product with unusual
//! calibration is still usable, but a round trip through the usual
//! parameters may lose precision.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::image::Image;

/// Externally known reference calibration for one spectral channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub channel_id: u8,
    pub name: String,
    pub slope: f64,
    pub offset: f64,
    pub bpp: u8,
}

/// Read-only mapping from channel identity to reference calibration.
///
/// Built by the caller from whatever channel table applies to the spacecraft
/// at hand and handed to the import pipeline; the core ships no table of its
/// own.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: HashMap<u8, ChannelRef>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel_id: u8) -> Option<&ChannelRef> {
        self.channels.get(&channel_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Compare an image's calibration against the reference for its channel.
    ///
    /// Exact float comparison is intended: the reference values are the
    /// exact constants the product should carry.
    pub fn check(&self, image: &Image) -> Vec<CalibrationMismatch> {
        let data = image.data();
        let Some(reference) = self.get(image.channel_id()) else {
            return vec![CalibrationMismatch::UnknownChannel {
                channel_id: image.channel_id(),
            }];
        };

        let mut mismatches = Vec::new();
        if data.slope() != reference.slope {
            mismatches.push(CalibrationMismatch::Slope {
                found: data.slope(),
                expected: reference.slope,
            });
        }
        if data.offset() != reference.offset {
            mismatches.push(CalibrationMismatch::Offset {
                found: data.offset(),
                expected: reference.offset,
            });
        }
        if data.bpp() > reference.bpp {
            mismatches.push(CalibrationMismatch::Bpp {
                found: data.bpp(),
                expected: reference.bpp,
            });
        }
        mismatches
    }
}

impl FromIterator<ChannelRef> for ChannelRegistry {
    fn from_iter<I: IntoIterator<Item = ChannelRef>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().map(|c| (c.channel_id, c)).collect(),
        }
    }
}

/// A difference between observed and reference calibration.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationMismatch {
    UnknownChannel { channel_id: u8 },
    Slope { found: f64, expected: f64 },
    Offset { found: f64, expected: f64 },
    Bpp { found: u8, expected: u8 },
}

impl fmt::Display for CalibrationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationMismatch::UnknownChannel { channel_id } => {
                write!(f, "no reference calibration for channel {}", channel_id)
            }
            CalibrationMismatch::Slope { found, expected } => {
                write!(f, "slope {} differs from the reference {}", found, expected)
            }
            CalibrationMismatch::Offset { found, expected } => {
                write!(f, "offset {} differs from the reference {}", found, expected)
            }
            CalibrationMismatch::Bpp { found, expected } => {
                write!(f, "bit depth {} exceeds the reference {}", found, expected)
            }
        }
    }
}

/// Log every mismatch at warning level.
pub fn log_mismatches(mismatches: &[CalibrationMismatch]) {
    for mismatch in mismatches {
        warn!(mismatch = %mismatch, "calibration differs from reference");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{default_missing, CalibratedBuffer, Calibration};
    use crate::image::AcquisitionTime;
    use geos_projection::Geos;
    use std::sync::Arc;

    fn image_with_calibration(channel_id: u8, slope: f64, offset: f64) -> Image {
        let data = CalibratedBuffer::from_samples(
            2,
            1,
            vec![0u16, 900],
            Calibration {
                slope,
                offset,
                missing: default_missing::<u16>(),
                scales_to_int: false,
            },
        )
        .unwrap();

        Image::new(
            AcquisitionTime::new(2004, 1, 19, 12, 0).unwrap(),
            55,
            channel_id,
            Arc::new(Geos::nominal(0.0)),
            208.0,
            208.0,
            1856,
            1856,
            0,
            0,
            Box::new(data),
        )
        .unwrap()
    }

    fn registry() -> ChannelRegistry {
        [ChannelRef {
            channel_id: 2,
            name: "VIS008".to_string(),
            slope: 0.01,
            offset: 0.0,
            bpp: 10,
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn matching_calibration_produces_no_mismatches() {
        let img = image_with_calibration(2, 0.01, 0.0);
        assert!(registry().check(&img).is_empty());
    }

    #[test]
    fn differing_slope_and_offset_are_reported() {
        let img = image_with_calibration(2, 0.02, 1.0);
        let mismatches = registry().check(&img);
        assert_eq!(mismatches.len(), 2);
        assert!(matches!(
            mismatches[0],
            CalibrationMismatch::Slope {
                found,
                expected
            } if found == 0.02 && expected == 0.01
        ));
        assert!(matches!(mismatches[1], CalibrationMismatch::Offset { .. }));
    }

    #[test]
    fn excess_bit_depth_is_reported() {
        let reference: ChannelRegistry = [ChannelRef {
            channel_id: 2,
            name: "VIS008".to_string(),
            slope: 0.01,
            offset: 0.0,
            bpp: 8,
        }]
        .into_iter()
        .collect();

        // Largest sample is 900, which needs 10 bits.
        let img = image_with_calibration(2, 0.01, 0.0);
        let mismatches = reference.check(&img);
        assert_eq!(
            mismatches,
            vec![CalibrationMismatch::Bpp {
                found: 10,
                expected: 8
            }]
        );
    }

    #[test]
    fn unknown_channel_is_reported() {
        let img = image_with_calibration(7, 0.01, 0.0);
        let mismatches = registry().check(&img);
        assert_eq!(
            mismatches,
            vec![CalibrationMismatch::UnknownChannel { channel_id: 7 }]
        );
    }
}
