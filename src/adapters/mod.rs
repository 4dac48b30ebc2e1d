//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements  | Connects to                        |
//! |-------------|-------------|------------------------------------|
//! | `mem_store` | ConfigStore | In-memory tree + JSON snapshots    |
//! | `sim_rpc`   | RpcClient   | Scriptable call recorder           |
//! | `log_sink`  | EventSink   | `log` output                       |
//!
//! A production deployment swaps `mem_store`/`sim_rpc` for adapters over a
//! real registry service and RPC transport; the engine never notices.

pub mod log_sink;
pub mod mem_store;
pub mod sim_rpc;
