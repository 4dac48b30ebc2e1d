//! Typed channel values and string coercion.
//!
//! Channel definitions and caller inputs arrive as strings; the persisted
//! unit/type tag next to each one says what it really is. Everything is
//! parsed exactly once — at catalog load or request entry — so the dispatch
//! hot path never re-parses strings.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A typed value travelling through the dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelValue {
    /// Plain string argument.
    Str(String),
    /// Integer argument.
    Int(i64),
    /// Dimensionless floating argument.
    Float(f64),
    /// Physical value: magnitude plus a unit tag (e.g. `2.5 V`).
    Dimensioned { magnitude: f64, unit: String },
}

impl ChannelValue {
    /// Numeric view of the value, used when converting a remote get
    /// response into the float the caller receives.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            Self::Dimensioned { magnitude, .. } => Ok(*magnitude),
            Self::Str(s) => s.parse::<f64>().map_err(|_| {
                Error::TypeConversion(format!("response <{s}> is not interpretable as float"))
            }),
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Dimensioned { magnitude, unit } => write!(f, "{magnitude} {unit}"),
        }
    }
}

/// Parse a raw string into a [`ChannelValue`] according to its type spec.
///
/// Vocabulary: `string`/`str`/`s` → string; `float`/`f`/`v` → float;
/// `integer`/`int`/`i` → integer; a leading `.` followed by a unit name →
/// dimensioned value; any other spec is itself treated as a unit name.
pub fn coerce(raw: &str, type_spec: &str) -> Result<ChannelValue> {
    match type_spec {
        "string" | "str" | "s" => Ok(ChannelValue::Str(raw.to_string())),
        "float" | "f" | "v" => raw.parse::<f64>().map(ChannelValue::Float).map_err(|_| {
            Error::TypeConversion(format!("value <{raw}> is not interpretable as float"))
        }),
        "integer" | "int" | "i" => raw.parse::<i64>().map(ChannelValue::Int).map_err(|_| {
            Error::TypeConversion(format!("value <{raw}> is not interpretable as integer"))
        }),
        spec => {
            let unit = spec.strip_prefix('.').unwrap_or(spec);
            let magnitude = raw.parse::<f64>().map_err(|_| {
                Error::TypeConversion(format!(
                    "value <{raw}> is not interpretable as a magnitude for unit <{unit}>"
                ))
            })?;
            Ok(ChannelValue::Dimensioned {
                magnitude,
                unit: unit.to_string(),
            })
        }
    }
}

/// Wrap an already-numeric (calibrated) magnitude according to a type spec.
///
/// Integer specs truncate toward zero; string specs stringify the number.
pub fn coerce_magnitude(value: f64, type_spec: &str) -> ChannelValue {
    match type_spec {
        "string" | "str" | "s" => ChannelValue::Str(value.to_string()),
        "float" | "f" | "v" => ChannelValue::Float(value),
        "integer" | "int" | "i" => ChannelValue::Int(value as i64),
        spec => {
            let unit = spec.strip_prefix('.').unwrap_or(spec);
            ChannelValue::Dimensioned {
                magnitude: value,
                unit: unit.to_string(),
            }
        }
    }
}

/// Parse a nullable float stored as a sentinel string.
///
/// `"none"`, `"-"` and `""` (case-insensitive) mean "no constraint";
/// anything else must parse as a float.
pub fn parse_nullable_float(raw: &str) -> Result<Option<f64>> {
    let lowered = raw.to_ascii_lowercase();
    if matches!(lowered.as_str(), "none" | "-" | "") {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| {
        Error::TypeConversion(format!(
            "value <{raw}> is not interpretable as either float or none"
        ))
    })
}
