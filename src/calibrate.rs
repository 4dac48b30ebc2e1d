//! Affine calibration and bounds enforcement for the set path.
//!
//! The transform is `value * scale + offset` — scale first, offset second;
//! the two do not commute. Bounds are checked on the transformed value, and
//! the transformed value is what gets dispatched to the device. The get
//! path applies no inverse transform.

use crate::error::{Error, RangeKind, Result};
use crate::value::parse_nullable_float;

/// Per-channel calibration parameters, parsed once at load time.
///
/// `None` in any field means "no transform" / "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Calibration {
    /// Parse the four sentinel-string fields as persisted in the store.
    ///
    /// Fails `TypeConversion` on an unparseable field and `InvalidArgument`
    /// when both bounds are present but inverted.
    pub fn from_raw(scale: &str, offset: &str, min: &str, max: &str) -> Result<Self> {
        let cal = Self {
            scale: parse_nullable_float(scale)?,
            offset: parse_nullable_float(offset)?,
            min: parse_nullable_float(min)?,
            max: parse_nullable_float(max)?,
        };
        if let (Some(lo), Some(hi)) = (cal.min, cal.max)
            && lo > hi
        {
            return Err(Error::InvalidArgument(format!(
                "minimum ({lo}) exceeds maximum ({hi})"
            )));
        }
        Ok(cal)
    }

    /// Apply the transform and enforce bounds on the result.
    pub fn apply(&self, value: f64) -> Result<f64> {
        let mut out = value;
        if let Some(scale) = self.scale {
            out *= scale;
        }
        if let Some(offset) = self.offset {
            out += offset;
        }
        if let Some(min) = self.min
            && out < min
        {
            return Err(Error::Range {
                kind: RangeKind::BelowMinimum,
                limit: min,
                value: out,
            });
        }
        if let Some(max) = self.max
            && out > max
        {
            return Err(Error::Range {
                kind: RangeKind::AboveMaximum,
                limit: max,
                value: out,
            });
        }
        Ok(out)
    }
}
