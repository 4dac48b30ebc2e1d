//! Catalog lifecycle tests: add/delete/list, identity resolution, and
//! loading persisted channels back out of the store.

use vchan::Error;
use vchan::adapters::mem_store::MemStore;
use vchan::adapters::sim_rpc::SimRpc;
use vchan::app::commands::ChannelKey;
use vchan::app::events::ChannelEvent;
use vchan::app::ports::{ConfigStore, StoreValue};
use vchan::app::service::ChannelService;
use vchan::catalog::CatalogState;
use vchan::registry;

use crate::mocks::{RecordingSink, coil_request, fresh_service, indexed_request};

#[test]
fn add_indexes_and_announces_the_channel() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();

    assert!(service.add_channel(&coil_request(), &mut sink).unwrap());

    assert_eq!(service.channel_count(), 1);
    assert_eq!(
        service.list_channels(),
        vec![(3, "coil_current".to_string())]
    );
    assert_eq!(
        sink.events,
        vec![ChannelEvent::ChannelAdded {
            id: 3,
            name: "coil_current".to_string(),
        }]
    );
}

#[test]
fn duplicate_id_or_name_leaves_catalog_unchanged() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    // Same ID, fresh name.
    let same_id = indexed_request("3", "other_name");
    assert!(matches!(
        service.add_channel(&same_id, &mut sink),
        Err(Error::DuplicateKey(_))
    ));

    // Fresh ID, same name.
    let same_name = indexed_request("4", "coil_current");
    assert!(matches!(
        service.add_channel(&same_name, &mut sink),
        Err(Error::DuplicateKey(_))
    ));

    assert_eq!(service.channel_count(), 1);
}

#[test]
fn malformed_id_is_rejected_before_any_write() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    let req = indexed_request("minus one", "x");
    assert!(matches!(
        service.add_channel(&req, &mut sink),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(service.channel_count(), 0);
}

#[test]
fn delete_unregisters_both_keys_and_the_folder() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    assert!(
        service
            .delete_channel(&ChannelKey::by_name("coil_current"), &mut sink)
            .unwrap()
    );
    assert_eq!(service.channel_count(), 0);
    assert!(matches!(
        service.delete_channel(&ChannelKey::by_id(3), &mut sink),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.delete_channel(&ChannelKey::by_name("coil_current"), &mut sink),
        Err(Error::NotFound(_))
    ));

    // The store folder is gone too.
    let (mut store, _rpc) = service.into_parts();
    let mut folder = registry::channel_root();
    folder.push("3 (coil_current)".to_string());
    assert!(store.cd(&folder, false).is_err());
}

#[test]
fn mismatched_id_and_name_is_a_conflict_naming_both() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();
    service
        .add_channel(&indexed_request("5", "heater"), &mut sink)
        .unwrap();

    let key = ChannelKey {
        id: Some(3),
        name: Some("heater".to_string()),
    };
    let err = service.delete_channel(&key, &mut sink).unwrap_err();
    assert_eq!(
        err,
        Error::Conflict {
            by_id: "3 (coil_current)".to_string(),
            by_name: "5 (heater)".to_string(),
        }
    );
    // Nothing was deleted.
    assert_eq!(service.channel_count(), 2);
}

#[test]
fn list_is_ordered_by_id() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service
        .add_channel(&indexed_request("9", "z_stage"), &mut sink)
        .unwrap();
    service
        .add_channel(&indexed_request("2", "a_stage"), &mut sink)
        .unwrap();
    assert_eq!(
        service.list_channels(),
        vec![(2, "a_stage".to_string()), (9, "z_stage".to_string())]
    );
}

#[test]
fn load_restores_persisted_channels() {
    // First life: persist one channel, then tear the service down.
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();
    let (store, _rpc) = service.into_parts();

    // Second life over the same store.
    let mut service = ChannelService::new(store, SimRpc::new()).unwrap();
    assert_eq!(service.catalog_state(), CatalogState::Uninitialized);

    let mut sink = RecordingSink::new();
    service.load(&mut sink).unwrap();
    assert_eq!(service.catalog_state(), CatalogState::Ready);
    assert_eq!(
        service.list_channels(),
        vec![(3, "coil_current".to_string())]
    );
    assert_eq!(
        sink.events,
        vec![ChannelEvent::CatalogLoaded {
            loaded: 1,
            skipped: 0,
        }]
    );

    // The restored channel dispatches.
    let response = service
        .set_channel(&ChannelKey::by_id(3), 1.0, &mut sink)
        .unwrap();
    assert_eq!(response, "ok");
}

#[test]
fn corrupt_folder_is_deleted_and_skipped_on_load() {
    // A folder with only an ID key, missing everything else.
    let mut store = MemStore::new();
    let mut bad = registry::channel_root();
    bad.push("7 (broken)".to_string());
    store.cd(&bad, true).unwrap();
    store.set("ID", StoreValue::Int(7)).unwrap();

    let mut service = ChannelService::new(store, SimRpc::new()).unwrap();
    let mut sink = RecordingSink::new();
    service.load(&mut sink).unwrap();

    assert_eq!(service.channel_count(), 0);
    assert_eq!(
        sink.events,
        vec![ChannelEvent::CatalogLoaded {
            loaded: 0,
            skipped: 1,
        }]
    );

    // The invalid folder was removed from the store.
    let (mut store, _rpc) = service.into_parts();
    assert!(store.cd(&bad, false).is_err());
}

#[test]
fn duplicate_persisted_identity_is_skipped_but_kept() {
    // Two complete folders claiming the same name.
    let mut store = MemStore::new();
    registry::setup(&mut store).unwrap();
    registry::write_channel(&mut store, 1, &indexed_request("1", "coil_current")).unwrap();
    registry::write_channel(&mut store, 9, &indexed_request("9", "coil_current")).unwrap();

    let mut service = ChannelService::new(store, SimRpc::new()).unwrap();
    let mut sink = RecordingSink::new();
    service.load(&mut sink).unwrap();

    assert_eq!(service.channel_count(), 1);
    assert_eq!(
        sink.events,
        vec![ChannelEvent::CatalogLoaded {
            loaded: 1,
            skipped: 1,
        }]
    );

    // Unlike a corrupt folder, the loser keeps its data.
    let (mut store, _rpc) = service.into_parts();
    let mut loser = registry::channel_root();
    loser.push("9 (coil_current)".to_string());
    assert!(store.cd(&loser, false).is_ok());
}

#[test]
fn store_position_survives_engine_operations() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();
    service
        .delete_channel(&ChannelKey::by_id(3), &mut sink)
        .unwrap();

    // The engine worked under the channel root the whole time but never
    // moved the store from where setup left it.
    let (store, _rpc) = service.into_parts();
    assert_eq!(store.cwd(), registry::channel_root());
}
