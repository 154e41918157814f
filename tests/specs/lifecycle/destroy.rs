//! Destroy specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn destroy_stops_active_entities() {
    let mut host = Host::new();
    host.owner
        .entity("running")
        .on_stopped("running.stopped")
        .start()
        .unwrap();
    let paused = host
        .owner
        .entity("paused")
        .on_stopped("paused.stopped")
        .start()
        .unwrap();
    host.owner
        .entity("idle")
        .on_stopped("idle.stopped")
        .build()
        .unwrap();
    host.owner.pause(&paused).unwrap();

    host.notify(Lifecycle::Destroyed);

    assert_eq!(
        host.trace(),
        trace(&["running.stopped", "paused.stopped"])
    );
    assert!(host.owner.scheduler().is_empty());
}

#[test]
fn destroyed_owner_ignores_ticks_and_rejects_calls() {
    let mut host = Host::new();
    host.owner.entity("spin").on_tick_frame("spin").start().unwrap();
    host.notify(Lifecycle::Destroyed);

    host.frames(3, FRAME).heartbeats(3);
    assert_eq!(host.trace(), trace(&[]));

    let err = host.owner.entity("late").build().unwrap_err();
    assert!(matches!(err, OwnerError::Destroyed(_)));
}
