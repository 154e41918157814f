//! Duration specs
//!
//! Verify finite and repeating timers, pausing and restarting.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn finite_timer_elapses_once_and_stops() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("door")
        .seconds(1.0)
        .on_elapsed("door.open")
        .start()
        .unwrap();

    host.frames(3, 0.25);
    assert_eq!(host.trace(), trace(&[]));
    assert_eq!(host.state(&id), EntityState::Running);

    host.frames(1, 0.25);
    assert_eq!(host.trace(), trace(&["door.open"]));
    assert_eq!(host.state(&id), EntityState::Stopped);

    host.frames(10, 0.25);
    assert_eq!(host.count("door.open"), 1);
}

#[test]
fn timer_elapses_from_many_small_frames() {
    let mut host = Host::new();
    host.owner
        .entity("fade")
        .seconds(0.5)
        .on_elapsed("fade.done")
        .start()
        .unwrap();

    host.frames(29, FRAME);
    assert_eq!(host.count("fade.done"), 0);

    host.frames(1, FRAME);
    assert_eq!(host.count("fade.done"), 1);
}

#[test]
fn repeating_timer_fires_once_per_period() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("regen")
        .seconds(0.1)
        .repeating()
        .on_tick_heartbeat("regen.tick")
        .on_elapsed("regen")
        .start()
        .unwrap();

    host.heartbeats(50);

    assert_eq!(host.count("regen"), 10);
    assert_eq!(host.count("regen.tick"), 50);
    assert_eq!(host.state(&id), EntityState::Running);
}

#[test]
fn pause_preserves_progress() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("cast")
        .seconds(1.0)
        .on_paused("cast.paused")
        .on_resumed("cast.resumed")
        .on_elapsed("cast.done")
        .start()
        .unwrap();

    host.frames(1, 0.5);
    host.owner.pause(&id).unwrap();
    host.frames(100, 0.5);
    host.owner.resume(&id).unwrap();
    host.frames(1, 0.5);

    assert_eq!(
        host.trace(),
        trace(&["cast.paused", "cast.resumed", "cast.done"])
    );
}

#[test]
fn stop_resets_progress() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("cast")
        .seconds(1.0)
        .on_started("cast.start")
        .on_stopped("cast.stop")
        .on_elapsed("cast.done")
        .start()
        .unwrap();

    host.frames(3, 0.25);
    host.owner.stop(&id).unwrap();
    host.owner.start(&id).unwrap();
    host.frames(3, 0.25);
    assert_eq!(host.count("cast.done"), 0);

    host.frames(1, 0.25);
    assert_eq!(
        host.trace(),
        trace(&["cast.start", "cast.stop", "cast.start", "cast.done"])
    );
}
