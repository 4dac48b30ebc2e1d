//! Dispatch tests: calibration on the write path, argument assembly,
//! capability checks and the select-then-retry-once policy.

use vchan::adapters::sim_rpc::{RpcCall, SimRpc};
use vchan::app::commands::ChannelKey;
use vchan::app::events::ChannelEvent;
use vchan::app::ports::RpcError;
use vchan::{ChannelValue, Error, RangeKind};

use crate::mocks::{RecordingSink, coil_request, fresh_service, fresh_service_with, indexed_request};

#[test]
fn set_dispatches_the_calibrated_value() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    let response = service
        .set_channel(&ChannelKey::by_id(3), 1.0, &mut sink)
        .unwrap();
    assert_eq!(response, "ok");

    // Scale 0.5: the device saw 0.5, not the caller's 1.0, as the only
    // argument.
    let invoke = service
        .rpc()
        .calls
        .iter()
        .find(|c| matches!(c, RpcCall::Invoke { .. }))
        .unwrap();
    match invoke {
        RpcCall::Invoke {
            service: svc,
            operation,
            args,
            ..
        } => {
            assert_eq!(svc, "dcbox");
            assert_eq!(operation, "set_voltage");
            assert_eq!(args, &vec![ChannelValue::Float(0.5)]);
        }
        RpcCall::Select { .. } => unreachable!(),
    }

    assert!(sink.events.contains(&ChannelEvent::ChannelSet {
        id: 3,
        name: "coil_current".to_string(),
        response: "ok".to_string(),
    }));
}

#[test]
fn out_of_range_set_never_reaches_the_device() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    // 3.0 * 0.5 = 1.5, above the 1.0 maximum.
    let err = service
        .set_channel(&ChannelKey::by_id(3), 3.0, &mut sink)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Range {
            kind: RangeKind::AboveMaximum,
            limit: 1.0,
            value: 1.5,
        }
    );
    assert_eq!(service.rpc().invoke_count(), 0);
}

#[test]
fn set_interleaves_statics_around_the_value() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service
        .add_channel(&indexed_request("4", "heater"), &mut sink)
        .unwrap();

    service
        .set_channel(&ChannelKey::by_name("heater"), 1.0, &mut sink)
        .unwrap();

    // Static channel index first, calibrated value in slot 1.
    match service.rpc().calls.last().unwrap() {
        RpcCall::Invoke { args, .. } => {
            assert_eq!(
                args,
                &vec![ChannelValue::Int(2), ChannelValue::Float(0.5)]
            );
        }
        RpcCall::Select { .. } => unreachable!(),
    }
}

#[test]
fn get_sends_the_fixed_inputs_and_returns_a_float() {
    let mut rpc = SimRpc::new();
    rpc.push_response(ChannelValue::Dimensioned {
        magnitude: 2.5,
        unit: "V".to_string(),
    });
    let mut service = fresh_service_with(rpc);
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    let value = service
        .get_channel(&ChannelKey::by_name("coil_current"), &mut sink)
        .unwrap();
    assert_eq!(value, 2.5);

    match service.rpc().calls.last().unwrap() {
        RpcCall::Invoke {
            operation, args, ..
        } => {
            assert_eq!(operation, "get_voltage");
            assert_eq!(args, &vec![ChannelValue::Int(2)]);
        }
        RpcCall::Select { .. } => unreachable!(),
    }
    assert!(sink.events.contains(&ChannelEvent::ChannelGet {
        id: 3,
        name: "coil_current".to_string(),
        value: 2.5,
    }));
}

#[test]
fn missing_capability_is_unsupported() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();

    let mut write_only = coil_request();
    write_only.has_get = false;
    service.add_channel(&write_only, &mut sink).unwrap();

    let mut read_only = indexed_request("4", "probe");
    read_only.has_set = false;
    service.add_channel(&read_only, &mut sink).unwrap();

    assert!(matches!(
        service.get_channel(&ChannelKey::by_id(3), &mut sink),
        Err(Error::Unsupported {
            operation: "get",
            ..
        })
    ));
    assert!(matches!(
        service.set_channel(&ChannelKey::by_id(4), 0.0, &mut sink),
        Err(Error::Unsupported {
            operation: "set",
            ..
        })
    ));
    assert_eq!(service.rpc().invoke_count(), 0);
}

#[test]
fn failed_invoke_selects_the_device_and_retries_once() {
    let mut rpc = SimRpc::new();
    rpc.fail_next_invokes(1);
    let mut service = fresh_service_with(rpc);
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    let response = service
        .set_channel(&ChannelKey::by_id(3), 1.0, &mut sink)
        .unwrap();
    assert_eq!(response, "ok");
    assert_eq!(service.rpc().invoke_count(), 2);
    assert_eq!(service.rpc().select_count(), 1);

    // invoke, select, invoke — all on the channel's own context, with the
    // selection addressed at the configured device.
    let calls = &service.rpc().calls;
    let ctx0 = match &calls[0] {
        RpcCall::Invoke { ctx, .. } => *ctx,
        RpcCall::Select { .. } => unreachable!(),
    };
    match &calls[1] {
        RpcCall::Select {
            service: svc,
            device,
            ctx,
        } => {
            assert_eq!(svc, "dcbox");
            assert_eq!(device, "dcbox (COM3)");
            assert_eq!(*ctx, ctx0);
        }
        RpcCall::Invoke { .. } => unreachable!(),
    }
    match &calls[2] {
        RpcCall::Invoke { ctx, .. } => assert_eq!(*ctx, ctx0),
        RpcCall::Select { .. } => unreachable!(),
    }
}

#[test]
fn second_failure_propagates_verbatim() {
    let mut rpc = SimRpc::new();
    rpc.fail_next_invokes(2);
    let mut service = fresh_service_with(rpc);
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    let err = service
        .set_channel(&ChannelKey::by_id(3), 1.0, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Remote(RpcError::Transport(_))));
    assert_eq!(service.rpc().invoke_count(), 2);
    assert_eq!(service.rpc().select_count(), 1);
}

#[test]
fn failed_selection_aborts_without_a_retry() {
    let mut rpc = SimRpc::new();
    rpc.fail_next_invokes(1);
    rpc.fail_next_selects(1);
    let mut service = fresh_service_with(rpc);
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();

    let err = service
        .set_channel(&ChannelKey::by_id(3), 1.0, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Remote(RpcError::Transport(_))));
    assert_eq!(service.rpc().invoke_count(), 1);
    assert_eq!(service.rpc().select_count(), 1);
}

#[test]
fn channels_get_their_own_context() {
    let mut service = fresh_service();
    let mut sink = RecordingSink::new();
    service.add_channel(&coil_request(), &mut sink).unwrap();
    service
        .add_channel(&indexed_request("4", "heater"), &mut sink)
        .unwrap();

    service
        .set_channel(&ChannelKey::by_id(3), 0.0, &mut sink)
        .unwrap();
    service
        .set_channel(&ChannelKey::by_id(4), 0.0, &mut sink)
        .unwrap();

    let contexts: Vec<_> = service
        .rpc()
        .calls
        .iter()
        .map(|c| match c {
            RpcCall::Invoke { ctx, .. } | RpcCall::Select { ctx, .. } => *ctx,
        })
        .collect();
    assert_eq!(contexts.len(), 2);
    assert_ne!(contexts[0], contexts[1]);
}
