//! Shared fixtures for the integration tests: a recording event sink and
//! ready-made channel requests against the in-memory adapters.

use vchan::adapters::mem_store::MemStore;
use vchan::adapters::sim_rpc::SimRpc;
use vchan::app::commands::AddChannelRequest;
use vchan::app::events::ChannelEvent;
use vchan::app::ports::EventSink;
use vchan::app::service::ChannelService;
use vchan::channel::TargetRef;

/// Event sink that records every emitted event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ChannelEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ChannelEvent) {
        self.events.push(event.clone());
    }
}

/// A loaded, empty service over fresh in-memory adapters.
pub fn fresh_service() -> ChannelService<MemStore, SimRpc> {
    fresh_service_with(SimRpc::new())
}

pub fn fresh_service_with(rpc: SimRpc) -> ChannelService<MemStore, SimRpc> {
    let mut service = ChannelService::new(MemStore::new(), rpc).unwrap();
    service.load(&mut RecordingSink::new()).unwrap();
    service
}

/// A write-mostly channel: value scaled by 0.5 into [-1, 1], dispatched as
/// the only argument of `dcbox::set_voltage`.
pub fn coil_request() -> AddChannelRequest {
    AddChannelRequest {
        id: "3".to_string(),
        name: "coil_current".to_string(),
        label: "Coil current".to_string(),
        description: "Main coil drive current".to_string(),
        tags: vec!["magnet".to_string()],
        has_get: true,
        has_set: true,
        get_target: TargetRef::new("dcbox", "dcbox (COM3)", "get_voltage"),
        get_inputs: vec!["2".to_string()],
        get_input_units: vec!["i".to_string()],
        set_target: TargetRef::new("dcbox", "dcbox (COM3)", "set_voltage"),
        set_var_slot: 0,
        set_var_unit: "v".to_string(),
        set_statics: Vec::new(),
        set_static_units: Vec::new(),
        set_min: "-1.0".to_string(),
        set_max: "1.0".to_string(),
        set_offset: "0.0".to_string(),
        set_scale: "0.5".to_string(),
    }
}

/// A channel whose set operation takes a static channel index before the
/// caller value: `set_voltage(2, value)`.
pub fn indexed_request(id: &str, name: &str) -> AddChannelRequest {
    AddChannelRequest {
        id: id.to_string(),
        name: name.to_string(),
        set_var_slot: 1,
        set_statics: vec!["2".to_string()],
        set_static_units: vec!["i".to_string()],
        ..coil_request()
    }
}
