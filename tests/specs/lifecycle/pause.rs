//! Enable/disable specs
//!
//! Disabling the owner pauses its running entities; enabling resumes only the
//! entities the disable paused.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn disable_pauses_and_enable_resumes() {
    let mut host = Host::new();
    let id = host
        .owner
        .entity("spin")
        .on_tick_frame("spin")
        .on_paused("spin.paused")
        .on_resumed("spin.resumed")
        .start()
        .unwrap();

    host.frames(1, FRAME)
        .notify(Lifecycle::Disabled)
        .frames(5, FRAME);
    assert_eq!(host.state(&id), EntityState::Paused);

    host.notify(Lifecycle::Enabled).frames(1, FRAME);
    assert_eq!(
        host.trace(),
        trace(&["spin", "spin.paused", "spin.resumed", "spin"])
    );
}

#[test]
fn explicit_pause_survives_reenable() {
    let mut host = Host::new();
    let auto = host.owner.entity("auto").seconds(1.0).start().unwrap();
    let manual = host.owner.entity("manual").seconds(1.0).start().unwrap();
    host.owner.pause(&manual).unwrap();

    host.notify(Lifecycle::Disabled).notify(Lifecycle::Enabled);

    assert_eq!(host.state(&auto), EntityState::Running);
    assert_eq!(host.state(&manual), EntityState::Paused);
}

#[test]
fn disabled_timer_keeps_its_progress() {
    let mut host = Host::new();
    host.owner
        .entity("cooldown")
        .seconds(1.0)
        .on_elapsed("ready")
        .start()
        .unwrap();

    host.frames(1, 0.5)
        .notify(Lifecycle::Disabled)
        .frames(10, 0.5)
        .notify(Lifecycle::Enabled)
        .frames(1, 0.5);

    assert_eq!(host.count("ready"), 1);
}

#[test]
fn payload_disabling_owner_takes_effect_after_tick() {
    let mut host = Host::with(RecordingExecutor::new().request_on("sleep", false));
    host.owner
        .entity("sleeper")
        .ticks(2)
        .on_elapsed("sleep")
        .start()
        .unwrap();
    host.owner
        .entity("worker")
        .on_tick_frame("work")
        .start()
        .unwrap();

    host.frames(4, FRAME);

    assert!(!host.owner.is_enabled());
    assert_eq!(host.trace(), trace(&["work", "sleep", "work"]));
}

#[test]
fn reenabling_from_a_disable_payload_is_rejected() {
    let mut host = Host::with(RecordingExecutor::new().request_on("napping", true));
    host.owner
        .entity("nap")
        .seconds(5.0)
        .on_paused("napping")
        .start()
        .unwrap();

    let err = host.owner.notify(Lifecycle::Disabled).unwrap_err();

    assert!(matches!(err, OwnerError::Lifecycle(_)), "{}", err);
    assert!(!host.owner.is_enabled());
}
