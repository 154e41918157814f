//! Configuration error specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn empty_name_is_rejected() {
    let mut host = Host::new();

    let err = host.owner.entity("").seconds(1.0).build().unwrap_err();

    assert!(err.to_string().contains("name must not be empty"), "{}", err);
}

#[test]
fn negative_duration_is_rejected() {
    let mut host = Host::new();

    let err = host.owner.entity("t").seconds(-0.5).build().unwrap_err();

    assert!(err.to_string().contains("must not be negative"), "{}", err);
}

#[test]
fn zero_interval_is_rejected() {
    let mut host = Host::new();

    let err = host.owner.every_frames(0, 0).build().unwrap_err();

    assert!(err.to_string().contains("interval"), "{}", err);
}

#[test]
fn mixed_tick_payloads_need_always_affinity() {
    let mut host = Host::new();

    let err = host
        .owner
        .entity("both")
        .on_tick_frame("f")
        .on_tick_heartbeat("h")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("always"), "{}", err);
}

#[test]
fn unfinished_builder_is_reported() {
    let mut host = Host::new();
    let _ = host.owner.entity("forgotten").seconds(1.0);
    host.owner.entity("kept").seconds(1.0).build().unwrap();

    let open = host.owner.finish_build();

    assert_eq!(open.len(), 1);
    assert_eq!(open[0].name, "forgotten");
    assert!(open[0].location.file().contains("config.rs"));
}
