//! Channel definitions — the data model behind every virtual channel.
//!
//! A channel hides which concrete (service, device, operation) a caller is
//! really talking to. The read and write paths are configured separately;
//! a channel may support either or both.

use crate::calibrate::Calibration;
use crate::error::{Error, Result};
use crate::value::ChannelValue;

/// Reference to one remote operation, resolved only through the RpcClient
/// port at dispatch time — never bound to a concrete callable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetRef {
    /// Remote service (device server) name.
    pub service: String,
    /// Device identifier within that service.
    pub device: String,
    /// Operation (setting) name on that service.
    pub operation: String,
}

impl TargetRef {
    pub fn new(
        service: impl Into<String>,
        device: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            device: device.into(),
            operation: operation.into(),
        }
    }
}

/// Read-path configuration: fixed inputs sent as-is on every get.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetSpec {
    pub target: TargetRef,
    /// Coerced once at load; arity 0, 1 or many, passed as one sequence.
    pub inputs: Vec<ChannelValue>,
}

/// Write-path configuration: where the caller's value lands and how it is
/// calibrated before dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetSpec {
    pub target: TargetRef,
    /// Position of the caller value in the final argument list.
    pub var_slot: usize,
    /// Type/unit spec applied to the caller value after calibration.
    pub var_unit: String,
    /// Fixed values filling every other argument position.
    pub statics: Vec<ChannelValue>,
    pub cal: Calibration,
}

/// One virtual channel as held in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDefinition {
    /// Unique across the catalog.
    pub id: u32,
    /// Unique across the catalog.
    pub name: String,
    /// Axis label for plotting/sweeping front-ends.
    pub label: String,
    pub description: String,
    /// Search/sort tags.
    pub tags: Vec<String>,
    pub has_get: bool,
    pub has_set: bool,
    pub get: GetSpec,
    pub set: SetSpec,
}

impl ChannelDefinition {
    /// Canonical identity string, also the store folder name.
    pub fn identity(&self) -> String {
        format!("{} ({})", self.id, self.name)
    }

    /// Check the structural invariants that make a definition dispatchable.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidArgument("channel name is empty".into()));
        }
        if self.has_set && self.set.var_slot > self.set.statics.len() {
            return Err(Error::SlotOutOfRange {
                slot: self.set.var_slot,
                statics: self.set.statics.len(),
            });
        }
        if let (Some(lo), Some(hi)) = (self.set.cal.min, self.set.cal.max)
            && lo > hi
        {
            return Err(Error::InvalidArgument(format!(
                "minimum ({lo}) exceeds maximum ({hi})"
            )));
        }
        Ok(())
    }
}
