//! Time-slice specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn slice_runs_on_phase_aligned_frames() {
    let mut host = Host::new();
    host.owner
        .every_frames(3, 1)
        .on_tick_frame("slice")
        .start()
        .unwrap();

    let mut ran_on = Vec::new();
    for _ in 0..12 {
        host.clear().frames(1, FRAME);
        if host.count("slice") == 1 {
            ran_on.push(host.owner.frame_count());
        }
    }

    assert_eq!(ran_on, vec![1, 4, 7, 10]);
}

#[test]
fn slice_phase_survives_disable() {
    let mut host = Host::new();
    host.owner
        .every_frames(3, 1)
        .on_tick_frame("slice")
        .start()
        .unwrap();

    host.frames(1, FRAME).notify(Lifecycle::Disabled).frames(1, FRAME);
    host.notify(Lifecycle::Enabled);

    let mut ran_on = Vec::new();
    for _ in 0..8 {
        host.clear().frames(1, FRAME);
        if host.count("slice") == 1 {
            ran_on.push(host.owner.frame_count());
        }
    }

    assert_eq!(ran_on, vec![4, 7, 10]);
}

#[test]
fn staggered_slices_spread_work_across_frames() {
    let mut host = Host::new();
    for offset in 0..3 {
        host.owner
            .every_frames(3, offset)
            .on_tick_frame(format!("ai.{}", offset))
            .start()
            .unwrap();
    }

    host.frames(6, FRAME);

    assert_eq!(
        host.trace(),
        trace(&["ai.1", "ai.2", "ai.0", "ai.1", "ai.2", "ai.0"])
    );
}

#[test]
fn heartbeat_slice_counts_heartbeats() {
    let mut host = Host::new();
    host.owner
        .every_heartbeats(4, 2)
        .ticks(2)
        .on_elapsed("scan.done")
        .start()
        .unwrap();

    host.heartbeats(5);
    assert_eq!(host.count("scan.done"), 0);

    host.heartbeats(1);
    assert_eq!(host.count("scan.done"), 1);
}
