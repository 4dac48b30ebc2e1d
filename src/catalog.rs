//! In-memory channel catalog: the dual index over all channel definitions.
//!
//! Both maps hold the same `Arc<ChannelEntry>`, so the bidirectional
//! consistency invariant — the definition reachable by ID is the very
//! object reachable by its name — is structural rather than maintained by
//! convention. Catalog state is always constructed per instance; the maps
//! are never shared between service instances.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::app::ports::RpcContext;
use crate::channel::ChannelDefinition;
use crate::error::{Error, Result};

/// Catalog lifecycle. The only state machine in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// Constructed, store not yet read.
    Uninitialized,
    /// Persisted entries are being parsed; corrupt ones get deleted.
    Loading,
    /// Serving lookups.
    Ready,
}

/// A loaded channel: its definition plus the communication context that
/// threads device-selection state across every dispatch for this channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEntry {
    pub def: ChannelDefinition,
    pub ctx: RpcContext,
}

/// Dual-keyed index of every loaded channel.
#[derive(Debug)]
pub struct Catalog {
    state: CatalogState,
    by_id: BTreeMap<u32, Arc<ChannelEntry>>,
    by_name: HashMap<String, Arc<ChannelEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            state: CatalogState::Uninitialized,
            by_id: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub fn begin_load(&mut self) {
        self.state = CatalogState::Loading;
        self.by_id.clear();
        self.by_name.clear();
    }

    pub fn finish_load(&mut self) {
        self.state = CatalogState::Ready;
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert a loaded channel into both maps.
    /// Fails `DuplicateKey` when either key is already taken.
    pub fn insert(&mut self, entry: ChannelEntry) -> Result<Arc<ChannelEntry>> {
        if self.by_id.contains_key(&entry.def.id) {
            return Err(Error::DuplicateKey(format!(
                "ID {} is already taken",
                entry.def.id
            )));
        }
        if self.by_name.contains_key(&entry.def.name) {
            return Err(Error::DuplicateKey(format!(
                "name <{}> is already taken",
                entry.def.name
            )));
        }
        let entry = Arc::new(entry);
        self.by_id.insert(entry.def.id, Arc::clone(&entry));
        self.by_name
            .insert(entry.def.name.clone(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Remove a channel from both maps. Fails `NotFound` if unresolved.
    pub fn remove(&mut self, id: Option<u32>, name: Option<&str>) -> Result<Arc<ChannelEntry>> {
        let entry = self.resolve(id, name)?;
        self.by_id.remove(&entry.def.id);
        self.by_name.remove(&entry.def.name);
        Ok(entry)
    }

    /// Resolve a channel by ID, name, or both.
    ///
    /// At least one key is required (`InvalidArgument` otherwise). When
    /// both are given, each must resolve independently and to the same
    /// channel; disagreement is a `Conflict` naming both identities.
    pub fn resolve(&self, id: Option<u32>, name: Option<&str>) -> Result<Arc<ChannelEntry>> {
        let by_id = match id {
            Some(id) => Some(self.by_id.get(&id).ok_or_else(|| {
                Error::NotFound(format!("no channel matches the ID ({id}) given"))
            })?),
            None => None,
        };
        let by_name = match name {
            Some(name) => Some(self.by_name.get(name).ok_or_else(|| {
                Error::NotFound(format!("no channel matches the name ({name}) given"))
            })?),
            None => None,
        };
        match (by_id, by_name) {
            (Some(a), Some(b)) => {
                if a.def.id == b.def.id && a.def.name == b.def.name {
                    Ok(Arc::clone(a))
                } else {
                    Err(Error::Conflict {
                        by_id: a.def.identity(),
                        by_name: b.def.identity(),
                    })
                }
            }
            (Some(e), None) | (None, Some(e)) => Ok(Arc::clone(e)),
            (None, None) => Err(Error::InvalidArgument(
                "at least one of ID and name must be specified".into(),
            )),
        }
    }

    /// All `(id, name)` pairs in ascending ID order.
    pub fn list(&self) -> Vec<(u32, String)> {
        self.by_id
            .values()
            .map(|e| (e.def.id, e.def.name.clone()))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
