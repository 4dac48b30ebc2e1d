//! Port traits — the hexagonal boundary between the channel engine and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ChannelService (domain)
//! ```
//!
//! Driven adapters (the hierarchical configuration store, the RPC
//! transport, event sinks) implement these traits. The
//! [`ChannelService`](super::service::ChannelService) consumes them via
//! generics, so the engine never touches a concrete store or transport.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ChannelValue;

// ───────────────────────────────────────────────────────────────
// Configuration store port (driven adapter: domain ↔ persistence)
// ───────────────────────────────────────────────────────────────

/// A value stored at a leaf key of the hierarchical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Ordered list of strings (tags, unit lists, target triples).
    List(Vec<String>),
}

impl StoreValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Hierarchical, path-addressed key/value store with a current directory.
///
/// Paths are absolute, rooted at the store root. Directory navigation is
/// stateful (mirroring registry-style stores); the engine always restores
/// the previous location after working under the channel root, falling back
/// to the channel root itself when the restore fails.
pub trait ConfigStore {
    /// Current directory, as an absolute path.
    fn cwd(&self) -> Vec<String>;

    /// Change the current directory. With `create`, missing path segments
    /// are created along the way.
    fn cd(&mut self, path: &[String], create: bool) -> Result<(), StoreError>;

    /// List the current directory: `(subdirectories, keys)`.
    fn list(&self) -> Result<(Vec<String>, Vec<String>), StoreError>;

    /// Read a leaf key in the current directory.
    fn get(&self, key: &str) -> Result<StoreValue, StoreError>;

    /// Write a leaf key in the current directory.
    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError>;

    /// Delete a leaf key in the current directory.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Remove an empty subdirectory of the current directory.
    fn rmdir(&mut self, name: &str) -> Result<(), StoreError>;
}

/// Errors from [`ConfigStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A path segment does not exist.
    NoSuchPath(String),
    /// The key does not exist in the current directory.
    NoSuchKey(String),
    /// The key exists but holds a different value kind.
    WrongType { key: String, expected: &'static str },
    /// `rmdir` on a non-empty directory.
    DirNotEmpty(String),
    /// Backend I/O failure.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchPath(p) => write!(f, "no such path <{p}>"),
            Self::NoSuchKey(k) => write!(f, "no such key <{k}>"),
            Self::WrongType { key, expected } => {
                write!(f, "key <{key}> does not hold a {expected}")
            }
            Self::DirNotEmpty(d) => write!(f, "directory <{d}> is not empty"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ───────────────────────────────────────────────────────────────
// RPC client port (driven adapter: domain → remote services)
// ───────────────────────────────────────────────────────────────

/// Opaque communication context threading device-selection state across
/// successive calls. Allocated once per channel at load time; never shared
/// between channels, never reallocated after a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcContext(pub u64);

impl fmt::Display for RpcContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx{}", self.0)
    }
}

/// Invoke-a-named-operation / select-a-device primitives.
pub trait RpcClient {
    /// Allocate a fresh communication context.
    fn new_context(&mut self) -> RpcContext;

    /// Invoke `operation` on `service` with an ordered argument sequence.
    fn invoke(
        &mut self,
        service: &str,
        operation: &str,
        args: &[ChannelValue],
        ctx: RpcContext,
    ) -> Result<ChannelValue, RpcError>;

    /// Bind `ctx` to `device` on `service` so subsequent invokes address it.
    fn select_device(
        &mut self,
        service: &str,
        device: &str,
        ctx: RpcContext,
    ) -> Result<(), RpcError>;
}

/// Errors from [`RpcClient`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The transport failed before the remote operation ran.
    Transport(String),
    /// The remote operation itself raised an error.
    Remote(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Remote(msg) => write!(f, "remote: {msg}"),
        }
    }
}

impl std::error::Error for RpcError {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → notifications)
// ───────────────────────────────────────────────────────────────

/// The engine emits lifecycle/operation events through this port.
/// Adapters decide how they are delivered (log, message bus, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ChannelEvent);
}
