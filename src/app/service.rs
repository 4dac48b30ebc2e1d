//! Channel service — the hexagonal core.
//!
//! [`ChannelService`] owns the catalog and the two driven ports (store and
//! RPC client); event sinks are injected at call sites. It implements the
//! full public operation surface: add/delete/list channels, and the
//! calibrated get/set dispatch with the device-selection retry policy.
//!
//! ```text
//!  requests ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!               │        ChannelService          │
//!  ConfigStore ◀─│ catalog · coerce · calibrate  │──▶ RpcClient
//!               └───────────────────────────────┘
//! ```
//!
//! Every mutating operation takes `&mut self`; the exclusive borrow is the
//! per-catalog mutual exclusion the non-transactional store sequences
//! need. Share the service behind a mutex when serving multiple threads.

use log::{info, warn};

use crate::assemble::assemble_args;
use crate::calibrate::Calibration;
use crate::catalog::{Catalog, ChannelEntry};
use crate::channel::TargetRef;
use crate::error::{Error, Result};
use crate::registry;
use crate::value::{ChannelValue, coerce_magnitude};

use super::commands::{AddChannelRequest, ChannelKey, parse_channel_id};
use super::events::ChannelEvent;
use super::ports::{ConfigStore, EventSink, RpcClient, RpcContext};

/// The channel engine: catalog plus dispatch over injected ports.
pub struct ChannelService<S: ConfigStore, R: RpcClient> {
    store: S,
    rpc: R,
    catalog: Catalog,
}

impl<S: ConfigStore, R: RpcClient> ChannelService<S, R> {
    /// Construct the service and make sure the channel root exists.
    ///
    /// The catalog starts `Uninitialized` — call [`load`](Self::load) next.
    pub fn new(mut store: S, rpc: R) -> Result<Self> {
        registry::setup(&mut store).map_err(Error::Store)?;
        Ok(Self {
            store,
            rpc,
            catalog: Catalog::new(),
        })
    }

    /// Read every persisted channel into the catalog.
    ///
    /// Each entry parses independently: a corrupt folder is deleted from
    /// the store and skipped with a warning, so one bad entry can never
    /// block the rest of the catalog.
    pub fn load(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.catalog.begin_load();
        let folders = registry::list_folders(&mut self.store)?;
        let mut loaded = 0usize;
        let mut skipped = 0usize;
        for folder in folders {
            match registry::read_channel(&mut self.store, &folder) {
                Ok(def) => {
                    let ctx = self.rpc.new_context();
                    match self.catalog.insert(ChannelEntry { def, ctx }) {
                        Ok(_) => loaded += 1,
                        Err(e) => {
                            // Duplicate persisted identity: keep the folder,
                            // index only the first occurrence.
                            warn!("catalog: skipping folder <{folder}>: {e}");
                            skipped += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("catalog: invalid folder <{folder}> ({e}); deleting it");
                    if let Err(del) = registry::delete_channel(&mut self.store, &folder) {
                        warn!("catalog: could not delete invalid folder <{folder}>: {del}");
                    }
                    skipped += 1;
                }
            }
        }
        self.catalog.finish_load();
        info!("catalog ready: {loaded} channels loaded, {skipped} skipped");
        sink.emit(&ChannelEvent::CatalogLoaded { loaded, skipped });
        Ok(())
    }

    // ── Catalog mutation ──────────────────────────────────────

    /// Validate, persist, read back and index a new channel.
    ///
    /// Does not overwrite; to replace a channel, delete the old one first.
    pub fn add_channel(
        &mut self,
        req: &AddChannelRequest,
        sink: &mut impl EventSink,
    ) -> Result<bool> {
        let id = parse_channel_id(&req.id)?;
        if self.catalog.contains_id(id) {
            return Err(Error::DuplicateKey(format!("ID {id} is already taken")));
        }
        if self.catalog.contains_name(&req.name) {
            return Err(Error::DuplicateKey(format!(
                "name <{}> is already taken",
                req.name
            )));
        }
        Self::validate_request(req)?;

        let folder = registry::write_channel(&mut self.store, id, req)?;
        // Read-after-write: the in-memory definition is built from what the
        // store actually holds, not from the request.
        let def = registry::read_channel(&mut self.store, &folder)?;
        let ctx = self.rpc.new_context();
        let entry = self.catalog.insert(ChannelEntry { def, ctx })?;

        info!("added channel <{}>", entry.def.identity());
        sink.emit(&ChannelEvent::ChannelAdded {
            id: entry.def.id,
            name: entry.def.name.clone(),
        });
        Ok(true)
    }

    /// Remove a channel from the store and the catalog.
    pub fn delete_channel(&mut self, key: &ChannelKey, sink: &mut impl EventSink) -> Result<bool> {
        let entry = self.catalog.resolve(key.id, key.name.as_deref())?;
        let folder = entry.def.identity();
        registry::delete_channel(&mut self.store, &folder)?;
        self.catalog.remove(Some(entry.def.id), None)?;

        info!("deleted channel <{folder}>");
        sink.emit(&ChannelEvent::ChannelDeleted {
            id: entry.def.id,
            name: entry.def.name.clone(),
        });
        Ok(true)
    }

    // ── Queries ───────────────────────────────────────────────

    /// All `(id, name)` pairs in ascending ID order.
    pub fn list_channels(&self) -> Vec<(u32, String)> {
        self.catalog.list()
    }

    /// Catalog size.
    pub fn channel_count(&self) -> usize {
        self.catalog.len()
    }

    /// Lifecycle state of the underlying catalog.
    pub fn catalog_state(&self) -> crate::catalog::CatalogState {
        self.catalog.state()
    }

    /// Shared view of the RPC port, mainly for inspecting recorded calls.
    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Tear the service down into its ports.
    pub fn into_parts(self) -> (S, R) {
        (self.store, self.rpc)
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Write `value` through a channel: calibrate, bounds-check, assemble
    /// the argument list and invoke the remote set operation.
    ///
    /// Bounds rejection happens before any remote call, so an out-of-range
    /// write never reaches the device. Returns the stringified response.
    pub fn set_channel(
        &mut self,
        key: &ChannelKey,
        value: f64,
        sink: &mut impl EventSink,
    ) -> Result<String> {
        let entry = self.catalog.resolve(key.id, key.name.as_deref())?;
        if !entry.def.has_set {
            return Err(Error::Unsupported {
                channel: entry.def.identity(),
                operation: "set",
            });
        }
        let set = &entry.def.set;
        let transformed = set.cal.apply(value)?;
        let variable = coerce_magnitude(transformed, &set.var_unit);
        let args = if set.statics.is_empty() {
            vec![variable]
        } else {
            assemble_args(set.var_slot, variable, &set.statics)?
        };

        let response = self.invoke_with_retry(&set.target, &args, entry.ctx)?;
        let response = response.to_string();
        info!(
            "set <{}> = {value} (transformed {transformed}) -> {response}",
            entry.def.identity()
        );
        sink.emit(&ChannelEvent::ChannelSet {
            id: entry.def.id,
            name: entry.def.name.clone(),
            response: response.clone(),
        });
        Ok(response)
    }

    /// Read a channel: invoke the remote get operation with the channel's
    /// fixed inputs and convert the response to a float.
    pub fn get_channel(&mut self, key: &ChannelKey, sink: &mut impl EventSink) -> Result<f64> {
        let entry = self.catalog.resolve(key.id, key.name.as_deref())?;
        if !entry.def.has_get {
            return Err(Error::Unsupported {
                channel: entry.def.identity(),
                operation: "get",
            });
        }
        let get = &entry.def.get;
        let response = self.invoke_with_retry(&get.target, &get.inputs, entry.ctx)?;
        let value = response.as_f64()?;
        info!("get <{}> -> {value}", entry.def.identity());
        sink.emit(&ChannelEvent::ChannelGet {
            id: entry.def.id,
            name: entry.def.name.clone(),
            value,
        });
        Ok(value)
    }

    /// Invoke with the select-then-retry-once policy.
    ///
    /// A first failure triggers an explicit device selection on the same
    /// context followed by exactly one retry; the retry's error (or the
    /// selection's) propagates verbatim.
    fn invoke_with_retry(
        &mut self,
        target: &TargetRef,
        args: &[ChannelValue],
        ctx: RpcContext,
    ) -> Result<ChannelValue> {
        match self
            .rpc
            .invoke(&target.service, &target.operation, args, ctx)
        {
            Ok(response) => Ok(response),
            Err(first) => {
                warn!(
                    "invoke {}::{} failed ({first}); selecting device <{}> and retrying once",
                    target.service, target.operation, target.device
                );
                self.rpc
                    .select_device(&target.service, &target.device, ctx)
                    .map_err(Error::Remote)?;
                self.rpc
                    .invoke(&target.service, &target.operation, args, ctx)
                    .map_err(Error::Remote)
            }
        }
    }

    // ── Request validation ────────────────────────────────────

    /// Check everything that can be checked before touching the store.
    fn validate_request(req: &AddChannelRequest) -> Result<()> {
        if req.name.is_empty() {
            return Err(Error::InvalidArgument("channel name is empty".into()));
        }
        // The four nullable floats and the bounds pair.
        Calibration::from_raw(&req.set_scale, &req.set_offset, &req.set_min, &req.set_max)?;
        // Unit lists must pair up and every value must coerce.
        registry::coerce_all(&req.get_inputs, &req.get_input_units, "get inputs")?;
        let statics = registry::coerce_all(&req.set_statics, &req.set_static_units, "set statics")?;
        let slot = usize::try_from(req.set_var_slot).map_err(|_| {
            Error::InvalidArgument(format!(
                "variable slot ({}) is negative",
                req.set_var_slot
            ))
        })?;
        if slot > statics.len() {
            return Err(Error::SlotOutOfRange {
                slot,
                statics: statics.len(),
            });
        }
        Ok(())
    }
}
