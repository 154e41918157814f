//! Count specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn counter_elapses_after_n_ticks() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("combo")
        .ticks(3)
        .on_tick_frame("combo.tick")
        .on_elapsed("combo.done")
        .start()
        .unwrap();

    host.frames(5, FRAME);

    assert_eq!(
        host.trace(),
        trace(&["combo.tick", "combo.tick", "combo.tick", "combo.done"])
    );
    assert_eq!(host.state(&id), EntityState::Stopped);
}

#[test]
fn repeating_counter_restarts_from_zero() {
    let mut host = Host::new();
    host.owner
        .entity("blink")
        .ticks(2)
        .repeating()
        .on_elapsed("blink")
        .start()
        .unwrap();

    host.frames(7, FRAME);

    assert_eq!(host.count("blink"), 3);
}

#[test]
fn count_ignores_frame_length() {
    let mut host = Host::new();
    host.owner
        .entity("steps")
        .ticks(2)
        .on_elapsed("steps.done")
        .start()
        .unwrap();

    host.frames(1, 100.0);
    assert_eq!(host.count("steps.done"), 0);

    host.frames(1, 0.0);
    assert_eq!(host.count("steps.done"), 1);
}
