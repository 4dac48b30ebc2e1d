//! Virtual channel server library.
//!
//! Callers address remote, parameterized device settings through a small
//! stable set of named/numbered virtual channels. Each channel hides the
//! concrete (service, device, operation) it maps to, applies an affine
//! calibration and safety bounds to written values, and merges the caller
//! value with fixed configuration values before dispatching the remote
//! operation.
//!
//! The engine lives in [`app::service::ChannelService`]; persistence and
//! transport are port traits in [`app::ports`], with in-process adapters
//! under [`adapters`] for testing and demos.

#![deny(unused_must_use)]

pub mod app;
pub mod assemble;
pub mod calibrate;
pub mod catalog;
pub mod channel;
pub mod registry;
pub mod value;

mod error;

pub mod adapters;

pub use error::{Error, RangeKind, Result};
pub use value::ChannelValue;
