//! Time scale specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn zero_scale_freezes_timer() {
    let mut host = Host::new();
    host.owner
        .entity("frozen")
        .seconds(0.1)
        .time_scale(0.0)
        .on_elapsed("thaw")
        .start()
        .unwrap();

    host.frames(1000, 1.0);

    assert_eq!(host.count("thaw"), 0);
}

#[test]
fn double_scale_halves_duration() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("haste")
        .seconds(1.0)
        .on_elapsed("haste.done")
        .start()
        .unwrap();
    host.owner.set_time_scale(&id, 2.0).unwrap();

    host.frames(1, 0.25);
    assert_eq!(host.count("haste.done"), 0);

    host.frames(1, 0.25);
    assert_eq!(host.count("haste.done"), 1);
}

#[test]
fn negative_scale_clamps_to_zero() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("rewind")
        .seconds(1.0)
        .start()
        .unwrap();

    host.owner.set_time_scale(&id, -3.0).unwrap();

    assert_eq!(host.owner.get(&id).unwrap().time_scale(), Some(0.0));
}
