//! Inbound requests to the channel service.
//!
//! These mirror the transport-agnostic public operation surface. Numeric
//! and nullable fields arrive as raw strings (the wire keeps them stringly
//! so "none" sentinels and units survive); the service validates and
//! parses them exactly once on entry.

use crate::channel::TargetRef;
use crate::error::{Error, Result};

/// Identity selector for delete/set/get: at least one of ID and name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelKey {
    pub id: Option<u32>,
    pub name: Option<String>,
}

impl ChannelKey {
    pub fn by_id(id: u32) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Parse wire-format identity fields. Empty strings mean "not given".
    pub fn parse(id: &str, name: &str) -> Result<Self> {
        let id = if id.is_empty() {
            None
        } else {
            Some(parse_channel_id(id)?)
        };
        let name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        Ok(Self { id, name })
    }
}

/// Parse a channel ID string as a non-negative integer.
pub fn parse_channel_id(raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|_| {
        Error::InvalidArgument(format!(
            "ID was <{raw}>, must be a non-negative integer"
        ))
    })
}

/// Full description of a channel to add, as received from a caller.
///
/// Field layout follows the persisted schema: descriptive attributes,
/// capability flags, then the get and set groups. `set_min`/`set_max`/
/// `set_offset`/`set_scale` must each parse as float or a none sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddChannelRequest {
    pub id: String,
    pub name: String,
    pub label: String,
    pub description: String,
    pub tags: Vec<String>,

    pub has_get: bool,
    pub has_set: bool,

    pub get_target: TargetRef,
    pub get_inputs: Vec<String>,
    pub get_input_units: Vec<String>,

    pub set_target: TargetRef,
    pub set_var_slot: i64,
    pub set_var_unit: String,
    pub set_statics: Vec<String>,
    pub set_static_units: Vec<String>,
    pub set_min: String,
    pub set_max: String,
    pub set_offset: String,
    pub set_scale: String,
}
