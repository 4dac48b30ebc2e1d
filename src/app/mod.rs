//! Application core — pure channel-engine logic, zero I/O.
//!
//! This module holds the business rules of the virtual channel server:
//! catalog lifecycle, request validation, calibration, argument assembly
//! and the dispatch policy. All interaction with the configuration store
//! and the RPC transport happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable with mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
