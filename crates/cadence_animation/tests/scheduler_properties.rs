//! Integration tests for the action scheduler
//!
//! These tests drive whole action trees through `ActionScheduler::tick` the
//! way a render loop would, and check:
//! - completion timing of delays and combinators
//! - exact end states of property tweens
//! - cancellation by target
//! - continuations registering within the completing tick

use cadence_animation::{Action, ActionScheduler, Easing};
use cadence_core::{Scene, Stage, TargetId};
use std::sync::{Arc, Mutex};

fn scene_with(properties: &[(&str, f32)]) -> (Scene, TargetId) {
    let mut scene = Scene::new();
    let node = scene.spawn_named("sprite");
    for (name, value) in properties {
        scene.insert_property(node, *name, *value).unwrap();
    }
    (scene, node)
}

/// A delay stays registered until cumulative time reaches its duration
#[test]
fn test_delay_stops_playing_exactly_once() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::delay(1.0));

    let mut transitions = 0;
    let mut was_playing = true;
    for _ in 0..8 {
        let report = scheduler.tick(0.25, &mut scene);
        if report.completed.contains(&id) {
            transitions += 1;
        }
        let playing = scheduler.is_playing(id);
        if was_playing && !playing {
            assert!(report.completed.contains(&id));
        }
        was_playing = playing;
    }

    assert_eq!(transitions, 1);
    assert!(!scheduler.is_playing(id));
}

#[test]
fn test_delay_timing_boundary() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::delay(1.0));

    scheduler.tick(0.5, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(0.25, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(0.25, &mut scene);
    assert!(!scheduler.is_playing(id));
}

/// Linear tween lands halfway at half time and exactly on the target at the end
#[test]
fn test_tween_round_trip() {
    let (mut scene, obj) = scene_with(&[("x", 0.0)]);
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::to(&scene, obj, [("x", 10.0)], 1.0, Easing::Linear).unwrap());

    scheduler.tick(0.5, &mut scene);
    let x = scene.property(obj, "x").unwrap();
    assert!((x - 5.0).abs() < 1e-5, "x = {x}");
    assert!(scheduler.is_playing(id));

    scheduler.tick(0.5, &mut scene);
    assert_eq!(scene.property(obj, "x"), Some(10.0));
    assert!(!scheduler.is_playing(id));
}

#[test]
fn test_tween_multiple_properties_with_overshooting_step() {
    let (mut scene, obj) = scene_with(&[("x", 3.0), ("alpha", 1.0)]);
    let mut scheduler = ActionScheduler::new();
    scheduler.start(
        Action::to(
            &scene,
            obj,
            [("x", -7.3), ("alpha", 0.0)],
            0.3,
            Easing::EaseInOutCubic,
        )
        .unwrap(),
    );

    // 1/60 steps never land exactly on 0.3; the end state is still exact
    for _ in 0..30 {
        scheduler.tick(1.0 / 60.0, &mut scene);
    }
    assert!(scheduler.is_empty());
    assert_eq!(scene.property(obj, "x"), Some(-7.3));
    assert_eq!(scene.property(obj, "alpha"), Some(0.0));
}

/// The second child of a sequence is not entered in the tick the first one finishes
#[test]
fn test_sequence_of_delays() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::sequence([Action::delay(1.0), Action::delay(1.0)]));

    scheduler.tick(1.0, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(1.0, &mut scene);
    assert!(!scheduler.is_playing(id));
}

#[test]
fn test_parallel_of_delays() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::parallel([Action::delay(1.0), Action::delay(2.0)]));

    scheduler.tick(1.0, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(0.5, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(0.5, &mut scene);
    assert!(!scheduler.is_playing(id));
}

#[test]
fn test_repeat_three_cycles() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::repeat(Action::delay(1.0), 3));

    scheduler.tick(1.0, &mut scene);
    assert!(scheduler.is_playing(id));
    scheduler.tick(1.0, &mut scene);
    assert!(scheduler.is_playing(id), "must not finish after two cycles");
    scheduler.tick(1.0, &mut scene);
    assert!(!scheduler.is_playing(id), "must finish on the third cycle");
}

#[test]
fn test_repeat_forever_stays_registered_until_paused() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(Action::repeat_forever(Action::delay(0.25)));

    for _ in 0..100 {
        scheduler.tick(0.25, &mut scene);
    }
    assert!(scheduler.is_playing(id));
    assert!(scheduler.pause(id).is_some());
    assert!(scheduler.is_empty());
}

/// Clearing a target freezes it where it is
#[test]
fn test_clear_freezes_target() {
    let (mut scene, obj) = scene_with(&[("x", 0.0), ("y", 0.0)]);
    let other = scene.spawn();
    scene.insert_property(other, "x", 0.0).unwrap();

    let mut scheduler = ActionScheduler::new();
    scheduler.start(Action::to(&scene, obj, [("x", 10.0)], 1.0, Easing::Linear).unwrap());
    scheduler.start(Action::to(&scene, obj, [("y", 10.0)], 2.0, Easing::Linear).unwrap());
    let untouched =
        scheduler.start(Action::to(&scene, other, [("x", 10.0)], 1.0, Easing::Linear).unwrap());

    scheduler.tick(0.5, &mut scene);
    let frozen_x = scene.property(obj, "x");
    let frozen_y = scene.property(obj, "y");

    assert_eq!(scheduler.clear(obj), 2);
    scheduler.tick(0.5, &mut scene);

    assert_eq!(scene.property(obj, "x"), frozen_x);
    assert_eq!(scene.property(obj, "y"), frozen_y);
    assert_eq!(scene.property(other, "x"), Some(10.0));
    assert!(!scheduler.is_playing(untouched));
}

/// A queued continuation is playing by the end of the tick its predecessor completes
#[test]
fn test_continuation_registered_in_same_tick() {
    let mut scene = Scene::new();
    let mut scheduler = ActionScheduler::new();

    let b = Action::delay(1.0);
    let b_id = b.id();
    let mut a = Action::delay(0.5);
    a.queue(b);
    let a_id = scheduler.start(a);

    scheduler.tick(0.25, &mut scene);
    assert!(!scheduler.is_playing(b_id));

    scheduler.tick(0.25, &mut scene);
    assert!(!scheduler.is_playing(a_id));
    assert!(scheduler.is_playing(b_id));
}

/// Fade out, detach from the parent, then notify, the usual teardown flow
#[test]
fn test_fade_then_remove_then_notify() {
    let mut scene = Scene::new();
    let root = scene.spawn_named("root");
    let sprite = scene.spawn_named("sprite");
    scene.insert_property(sprite, "alpha", 1.0).unwrap();
    scene.add_child(root, sprite).unwrap();

    let notified = Arc::new(Mutex::new(false));
    let notified_clone = notified.clone();

    let mut scheduler = ActionScheduler::new();
    scheduler.start(
        Action::sequence([
            Action::to(&scene, sprite, [("alpha", 0.0)], 0.5, Easing::EaseOutQuad).unwrap(),
            Action::remove(sprite),
        ])
        .then(Action::run_func(move || {
            *notified_clone.lock().unwrap() = true;
        })),
    );

    // Fade completes
    scheduler.tick(0.5, &mut scene);
    assert_eq!(scene.property(sprite, "alpha"), Some(0.0));
    assert_eq!(scene.parent(sprite), Some(root));

    // Remove runs, sequence completes, continuation registered
    scheduler.tick(1.0 / 60.0, &mut scene);
    assert_eq!(scene.parent(sprite), None);
    assert!(!*notified.lock().unwrap());

    scheduler.tick(1.0 / 60.0, &mut scene);
    assert!(*notified.lock().unwrap());
    assert!(scheduler.is_empty());
}

/// Cancelling does not run callbacks or snap tweens
#[test]
fn test_pause_does_not_complete() {
    let (mut scene, obj) = scene_with(&[("x", 0.0)]);
    let fired = Arc::new(Mutex::new(0));
    let fired_clone = fired.clone();

    let mut scheduler = ActionScheduler::new();
    let id = scheduler.start(
        Action::to(&scene, obj, [("x", 10.0)], 1.0, Easing::Linear)
            .unwrap()
            .then(Action::run_func(move || {
                *fired_clone.lock().unwrap() += 1;
            })),
    );

    scheduler.tick(0.5, &mut scene);
    let paused = scheduler.pause(id).unwrap();
    scheduler.tick(1.0, &mut scene);

    assert!((scene.property(obj, "x").unwrap() - 5.0).abs() < 1e-5);
    assert_eq!(*fired.lock().unwrap(), 0);
    assert_eq!(paused.queued().len(), 1);
}
