//! Payload failure specs
//!
//! A failing payload is reported and never stops other entities.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn failing_payload_does_not_block_later_entities() {
    let mut host = Host::with(RecordingExecutor::new().fail_on("bad"));
    host.owner.entity("bad").on_tick_frame("bad").start().unwrap();
    host.owner.entity("good").on_tick_frame("good").start().unwrap();

    let report = host.owner.frame(FRAME).unwrap();

    assert_eq!(host.trace(), trace(&["bad", "good"]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, EntityId::new("bad"));
}

#[test]
fn failing_entity_keeps_advancing() {
    let mut host = Host::with(RecordingExecutor::new().fail_on("tick"));
    let id = host
        .owner
        .entity("fragile")
        .ticks(2)
        .on_tick_frame("tick")
        .on_elapsed("done")
        .start()
        .unwrap();

    host.frames(2, FRAME);

    assert_eq!(host.count("done"), 1);
    assert_eq!(host.state(&id), EntityState::Stopped);
}
