//! Persistence schema for channel definitions.
//!
//! Each channel lives in one store directory named `"{id} ({name})"` under
//! the channel root, with leaf keys for the descriptive attributes and two
//! child directories `get` and `set` holding the respective path fields.
//!
//! ```text
//! vchan/channels/3 (coil_current)/
//!   ID, name, label, description, tags, has_get, has_set
//!   get/  setting, inputs, inputs_units
//!   set/  setting, var_slot, var_units, statics, statics_units,
//!         min, max, offset, scale
//! ```
//!
//! Every operation saves the caller's current directory and restores it on
//! the way out; when the restore itself fails the store is parked at the
//! channel root rather than left in an undefined location.

use log::warn;

use crate::app::commands::AddChannelRequest;
use crate::app::ports::{ConfigStore, StoreError, StoreValue};
use crate::calibrate::Calibration;
use crate::channel::{ChannelDefinition, GetSpec, SetSpec, TargetRef};
use crate::error::{Error, Result};
use crate::value::{ChannelValue, coerce};

/// Absolute store path of the channel root directory.
pub fn channel_root() -> Vec<String> {
    vec!["vchan".to_string(), "channels".to_string()]
}

/// Create the channel root if needed and leave the store positioned there.
pub fn setup<S: ConfigStore>(store: &mut S) -> core::result::Result<(), StoreError> {
    store.cd(&channel_root(), true)
}

/// List all channel folders under the root.
pub fn list_folders<S: ConfigStore>(store: &mut S) -> Result<Vec<String>> {
    let prev = store.cwd();
    let result = (|| {
        store.cd(&channel_root(), true)?;
        let (dirs, _keys) = store.list()?;
        Ok(dirs)
    })();
    restore_or_root(store, &prev);
    result.map_err(Error::Store)
}

/// Persist a full channel definition. Returns the folder name written.
pub fn write_channel<S: ConfigStore>(
    store: &mut S,
    id: u32,
    req: &AddChannelRequest,
) -> Result<String> {
    let prev = store.cwd();
    let folder = format!("{id} ({})", req.name);
    let result = write_inner(store, id, &folder, req);
    restore_or_root(store, &prev);
    result.map_err(Error::Store)?;
    Ok(folder)
}

fn write_inner<S: ConfigStore>(
    store: &mut S,
    id: u32,
    folder: &str,
    req: &AddChannelRequest,
) -> core::result::Result<(), StoreError> {
    let mut path = channel_root();
    path.push(folder.to_string());
    store.cd(&path, true)?;

    // Descriptive attributes and capability flags.
    store.set("ID", StoreValue::Int(i64::from(id)))?;
    store.set("name", StoreValue::Str(req.name.clone()))?;
    store.set("label", StoreValue::Str(req.label.clone()))?;
    store.set("description", StoreValue::Str(req.description.clone()))?;
    store.set("tags", StoreValue::List(req.tags.clone()))?;
    store.set("has_get", StoreValue::Bool(req.has_get))?;
    store.set("has_set", StoreValue::Bool(req.has_set))?;

    // <get> group.
    let mut get_path = path.clone();
    get_path.push("get".to_string());
    store.cd(&get_path, true)?;
    store.set("setting", target_value(&req.get_target))?;
    store.set("inputs", StoreValue::List(req.get_inputs.clone()))?;
    store.set("inputs_units", StoreValue::List(req.get_input_units.clone()))?;

    // <set> group.
    let mut set_path = path;
    set_path.push("set".to_string());
    store.cd(&set_path, true)?;
    store.set("setting", target_value(&req.set_target))?;
    store.set("var_slot", StoreValue::Int(req.set_var_slot))?;
    store.set("var_units", StoreValue::Str(req.set_var_unit.clone()))?;
    store.set("statics", StoreValue::List(req.set_statics.clone()))?;
    store.set(
        "statics_units",
        StoreValue::List(req.set_static_units.clone()),
    )?;
    store.set("min", StoreValue::Str(req.set_min.clone()))?;
    store.set("max", StoreValue::Str(req.set_max.clone()))?;
    store.set("offset", StoreValue::Str(req.set_offset.clone()))?;
    store.set("scale", StoreValue::Str(req.set_scale.clone()))?;
    Ok(())
}

/// Load one channel folder into a validated [`ChannelDefinition`].
///
/// Any missing key, wrong value kind, unit-list mismatch or unparseable
/// field fails the whole entry; the loader treats that as a corrupt folder.
pub fn read_channel<S: ConfigStore>(store: &mut S, folder: &str) -> Result<ChannelDefinition> {
    let prev = store.cwd();
    let result = read_inner(store, folder);
    restore_or_root(store, &prev);
    result
}

fn read_inner<S: ConfigStore>(store: &mut S, folder: &str) -> Result<ChannelDefinition> {
    let mut path = channel_root();
    path.push(folder.to_string());
    store.cd(&path, false).map_err(Error::Store)?;

    let id = get_int(store, "ID")?;
    let id = u32::try_from(id)
        .map_err(|_| Error::InvalidArgument(format!("stored ID ({id}) is negative")))?;
    let name = get_str(store, "name")?;
    let label = get_str(store, "label")?;
    let description = get_str(store, "description")?;
    let tags = get_list(store, "tags")?;
    let has_get = get_bool(store, "has_get")?;
    let has_set = get_bool(store, "has_set")?;

    let mut get_path = path.clone();
    get_path.push("get".to_string());
    store.cd(&get_path, false).map_err(Error::Store)?;
    let get_target = target_ref(&get_list(store, "setting")?)?;
    let get_inputs_raw = get_list(store, "inputs")?;
    let get_units = get_list(store, "inputs_units")?;
    let get_inputs = coerce_all(&get_inputs_raw, &get_units, "get inputs")?;

    let mut set_path = path;
    set_path.push("set".to_string());
    store.cd(&set_path, false).map_err(Error::Store)?;
    let set_target = target_ref(&get_list(store, "setting")?)?;
    let var_slot = get_int(store, "var_slot")?;
    let var_slot = usize::try_from(var_slot)
        .map_err(|_| Error::InvalidArgument(format!("variable slot ({var_slot}) is negative")))?;
    let var_unit = get_str(store, "var_units")?;
    let statics_raw = get_list(store, "statics")?;
    let statics_units = get_list(store, "statics_units")?;
    let statics = coerce_all(&statics_raw, &statics_units, "set statics")?;
    let cal = Calibration::from_raw(
        &get_str(store, "scale")?,
        &get_str(store, "offset")?,
        &get_str(store, "min")?,
        &get_str(store, "max")?,
    )?;

    let def = ChannelDefinition {
        id,
        name,
        label,
        description,
        tags,
        has_get,
        has_set,
        get: GetSpec {
            target: get_target,
            inputs: get_inputs,
        },
        set: SetSpec {
            target: set_target,
            var_slot,
            var_unit,
            statics,
            cal,
        },
    };
    def.validate()?;
    Ok(def)
}

/// Recursively delete a channel folder (keys, `get`/`set` subtrees, then
/// the folder itself).
pub fn delete_channel<S: ConfigStore>(store: &mut S, folder: &str) -> Result<()> {
    let prev = store.cwd();
    let mut path = channel_root();
    path.push(folder.to_string());
    let result = delete_tree(store, path);
    restore_or_root(store, &prev);
    result.map_err(Error::Store)
}

fn delete_tree<S: ConfigStore>(
    store: &mut S,
    path: Vec<String>,
) -> core::result::Result<(), StoreError> {
    store.cd(&path, false)?;
    let (dirs, keys) = store.list()?;
    for key in keys {
        store.delete(&key)?;
    }
    for dir in dirs {
        let mut sub = path.clone();
        sub.push(dir);
        delete_tree(store, sub)?;
    }
    let (parent, name) = match path.split_last() {
        Some((name, parent)) => (parent.to_vec(), name.clone()),
        None => return Ok(()),
    };
    store.cd(&parent, false)?;
    store.rmdir(&name)
}

/// Restore the saved working directory; on failure fall back to the
/// channel root so the store position is never left undefined.
fn restore_or_root<S: ConfigStore>(store: &mut S, prev: &[String]) {
    if store.cd(prev, false).is_err() {
        warn!(
            "store: could not restore previous location {:?}; parking at channel root",
            prev
        );
        if let Err(e) = store.cd(&channel_root(), true) {
            warn!("store: could not reach channel root either: {e}");
        }
    }
}

// ── Typed leaf accessors ──────────────────────────────────────

fn wrong_type(key: &str, expected: &'static str) -> Error {
    Error::Store(StoreError::WrongType {
        key: key.to_string(),
        expected,
    })
}

fn get_str<S: ConfigStore>(store: &S, key: &str) -> Result<String> {
    let v = store.get(key).map_err(Error::Store)?;
    v.as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| wrong_type(key, "string"))
}

fn get_int<S: ConfigStore>(store: &S, key: &str) -> Result<i64> {
    let v = store.get(key).map_err(Error::Store)?;
    v.as_int().ok_or_else(|| wrong_type(key, "integer"))
}

fn get_bool<S: ConfigStore>(store: &S, key: &str) -> Result<bool> {
    let v = store.get(key).map_err(Error::Store)?;
    v.as_bool().ok_or_else(|| wrong_type(key, "boolean"))
}

fn get_list<S: ConfigStore>(store: &S, key: &str) -> Result<Vec<String>> {
    let v = store.get(key).map_err(Error::Store)?;
    v.as_list()
        .map(<[String]>::to_vec)
        .ok_or_else(|| wrong_type(key, "string list"))
}

fn target_value(target: &TargetRef) -> StoreValue {
    StoreValue::List(vec![
        target.service.clone(),
        target.device.clone(),
        target.operation.clone(),
    ])
}

fn target_ref(list: &[String]) -> Result<TargetRef> {
    match list {
        [service, device, operation] => {
            Ok(TargetRef::new(service.clone(), device.clone(), operation.clone()))
        }
        _ => Err(Error::InvalidArgument(format!(
            "target must be [service, device, operation], got {} entries",
            list.len()
        ))),
    }
}

/// Coerce a raw string list against its unit/type list, element-wise.
pub fn coerce_all(
    raws: &[String],
    units: &[String],
    what: &str,
) -> Result<Vec<ChannelValue>> {
    if raws.len() != units.len() {
        return Err(Error::InvalidArgument(format!(
            "{what}: {} values but {} units",
            raws.len(),
            units.len()
        )));
    }
    raws.iter()
        .zip(units)
        .map(|(raw, unit)| coerce(raw, unit))
        .collect()
}
