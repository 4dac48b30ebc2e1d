//! Unified error types for the virtual channel server.
//!
//! Every fallible engine operation funnels into [`Error`], keeping the
//! public operation surface's error handling uniform. Port-level failures
//! ([`StoreError`], [`RpcError`]) are defined next to their traits in
//! [`crate::app::ports`] and convert into this type via `From`.

use core::fmt;

use crate::app::ports::{RpcError, StoreError};

/// Which bound a calibrated value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// The transformed value fell below the configured minimum.
    BelowMinimum,
    /// The transformed value exceeded the configured maximum.
    AboveMaximum,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum => write!(f, "below minimum"),
            Self::AboveMaximum => write!(f, "above maximum"),
        }
    }
}

/// Every fallible operation on the channel engine returns this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Neither ID nor name given, a malformed numeric ID, or a structurally
    /// invalid channel description (mismatched unit lists, bad bounds pair).
    InvalidArgument(String),
    /// No channel matches the given identity.
    NotFound(String),
    /// ID and name were both given but resolve to different channels.
    /// Carries both resolved identities, `"{id} ({name})"` formatted.
    Conflict {
        /// Identity the ID resolved to.
        by_id: String,
        /// Identity the name resolved to.
        by_name: String,
    },
    /// The ID or name is already registered in the catalog.
    DuplicateKey(String),
    /// A string failed to parse as its declared type.
    TypeConversion(String),
    /// The transformed value is outside the configured bounds.
    Range {
        kind: RangeKind,
        limit: f64,
        value: f64,
    },
    /// The variable-slot index exceeds the static input list.
    SlotOutOfRange { slot: usize, statics: usize },
    /// Get/set invoked on a channel lacking that capability.
    Unsupported {
        channel: String,
        operation: &'static str,
    },
    /// The remote call failed even after the one device-selection retry.
    /// The underlying error is surfaced verbatim, never masked.
    Remote(RpcError),
    /// The configuration store failed.
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Conflict { by_id, by_name } => write!(
                f,
                "conflict: ID resolves to <{by_id}> but name resolves to <{by_name}>"
            ),
            Self::DuplicateKey(msg) => write!(f, "duplicate key: {msg}"),
            Self::TypeConversion(msg) => write!(f, "type conversion: {msg}"),
            Self::Range { kind, limit, value } => {
                write!(f, "range error: value {value} {kind} {limit}")
            }
            Self::SlotOutOfRange { slot, statics } => write!(
                f,
                "slot out of range: variable slot {slot} with {statics} static inputs"
            ),
            Self::Unsupported { channel, operation } => {
                write!(f, "channel <{channel}> does not support {operation}")
            }
            Self::Remote(e) => write!(f, "remote invocation failed: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<RpcError> for Error {
    fn from(e: RpcError) -> Self {
        Self::Remote(e)
    }
}

/// Engine-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
