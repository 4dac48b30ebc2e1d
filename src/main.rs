//! Demo composition root.
//!
//! Wires the channel engine to the in-memory store and the simulated RPC
//! client, then walks through the typical lifecycle: load, add a channel,
//! set and get through it, list, delete. Run with `RUST_LOG=info` to see
//! the engine's own logging alongside the emitted events.

use anyhow::Result;

use vchan::ChannelValue;
use vchan::adapters::log_sink::LogEventSink;
use vchan::adapters::mem_store::MemStore;
use vchan::adapters::sim_rpc::SimRpc;
use vchan::app::commands::{AddChannelRequest, ChannelKey};
use vchan::app::service::ChannelService;
use vchan::channel::TargetRef;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = MemStore::new();
    let rpc = SimRpc::new().with_default_response(ChannelValue::Float(0.5));
    let mut sink = LogEventSink::new();

    let mut service = ChannelService::new(store, rpc)?;
    service.load(&mut sink)?;

    let req = AddChannelRequest {
        id: "3".to_string(),
        name: "coil_current".to_string(),
        label: "Coil current".to_string(),
        description: "Main coil drive current, calibrated to amps".to_string(),
        tags: vec!["magnet".to_string()],
        has_get: true,
        has_set: true,
        get_target: TargetRef::new("dcbox", "dcbox (COM3)", "get_voltage"),
        get_inputs: vec!["2".to_string()],
        get_input_units: vec!["i".to_string()],
        set_target: TargetRef::new("dcbox", "dcbox (COM3)", "set_voltage"),
        set_var_slot: 1,
        set_var_unit: "v".to_string(),
        set_statics: vec!["2".to_string()],
        set_static_units: vec!["i".to_string()],
        set_min: "-1.0".to_string(),
        set_max: "1.0".to_string(),
        set_offset: "0.0".to_string(),
        set_scale: "0.5".to_string(),
    };
    service.add_channel(&req, &mut sink)?;

    let key = ChannelKey::by_name("coil_current");
    let response = service.set_channel(&key, 1.0, &mut sink)?;
    println!("set response: {response}");

    let value = service.get_channel(&key, &mut sink)?;
    println!("get value: {value}");

    for (id, name) in service.list_channels() {
        println!("channel {id}: {name}");
    }

    service.delete_channel(&key, &mut sink)?;
    println!("channels left: {}", service.channel_count());
    Ok(())
}
