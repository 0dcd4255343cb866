//! Integration tests for the engine lifecycle.
//!
//! Every test drives the engine through the headless ports with a simulated
//! clock, the same way a browser would drive it through
//! `requestAnimationFrame`, `resize` and `matchMedia` events.

use driftlight::headless::{ManualFrameHost, ManualViewport, MotionSwitch, RecordingSurface};
use driftlight::{
    mount, Engine, EngineConfig, EngineError, Mounted, Particle, RasterSurface, SchedulerState,
    Vec2, Viewport,
};
use std::rc::Rc;

type Harness = Mounted<RecordingSurface, ManualFrameHost>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn harness(width: f32, height: f32, reduced: bool) -> (Harness, ManualViewport, MotionSwitch) {
    init_tracing();
    let viewport = ManualViewport::new(width, height);
    let motion = MotionSwitch::new(reduced);
    let engine = Engine::builder()
        .with_config(EngineConfig::default().with_seed(0x5eed))
        .with_surface(RecordingSurface::new())
        .with_frame_host(ManualFrameHost::new())
        .with_viewport(Rc::new(viewport.clone()))
        .with_motion(Rc::new(motion.clone()))
        .build()
        .expect("engine builds");
    let mounted = mount(engine);
    mounted.start();
    (mounted, viewport, motion)
}

/// Fire frames at a fixed interval for `count` callbacks.
fn run_frames(mounted: &Harness, start: f64, interval: f64, count: usize) -> f64 {
    let mut ts = start;
    for _ in 0..count {
        ts += interval;
        mounted.engine().borrow_mut().advance_frame(ts);
    }
    ts
}

fn snapshot(mounted: &Harness) -> Vec<Particle> {
    mounted.engine().borrow().store().particles().to_vec()
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_population_follows_breakpoint() {
    for (width, expected) in [(320.0, 30), (767.0, 30), (768.0, 60), (2560.0, 60)] {
        let (mounted, _, _) = harness(width, 600.0, false);
        assert_eq!(mounted.engine().borrow().store().len(), expected, "width {}", width);
    }
}

#[test]
fn test_population_recomputed_on_resize() {
    let (mounted, viewport, _) = harness(1920.0, 1080.0, false);
    assert_eq!(mounted.engine().borrow().store().len(), 60);

    viewport.set_size(600.0, 900.0);
    assert_eq!(mounted.engine().borrow().store().len(), 30);
}

#[test]
fn test_spawned_inside_viewport() {
    let (mounted, viewport, _) = harness(1024.0, 640.0, false);
    for (w, h) in [(1024.0, 640.0), (375.0, 667.0), (3840.0, 2160.0)] {
        viewport.set_size(w, h);
        let bounds = Viewport::new(w, h);
        for p in snapshot(&mounted) {
            assert!(bounds.contains(p.position), "{:?} outside {:?}", p.position, bounds);
            assert!((0.5..=2.0).contains(&p.radius));
            assert!((0.1..=0.3).contains(&p.opacity));
            assert!(p.velocity.x.abs() <= 0.15 && p.velocity.y.abs() <= 0.15);
        }
    }
}

// ============================================================================
// Physics invariants
// ============================================================================

#[test]
fn test_radius_opacity_and_speed_invariant() {
    // Small viewport so plenty of particles hit the walls
    let (mounted, _, _) = harness(40.0, 30.0, false);
    let before = snapshot(&mounted);

    run_frames(&mounted, 0.0, 20.0, 2000);
    let after = snapshot(&mounted);
    assert_eq!(mounted.engine().borrow().throttle().accepted(), 2000);

    let mut flipped = 0;
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.radius, b.radius);
        assert_eq!(a.opacity, b.opacity);
        assert_eq!(a.velocity.x.abs(), b.velocity.x.abs());
        assert_eq!(a.velocity.y.abs(), b.velocity.y.abs());
        assert!(b.is_finite());
        if a.velocity != b.velocity {
            flipped += 1;
        }
    }
    assert!(flipped > 0, "expected some wall bounces");
}

#[test]
fn test_particles_stay_near_bounds() {
    let (mounted, _, _) = harness(50.0, 50.0, false);
    run_frames(&mounted, 0.0, 17.0, 5000);

    for p in snapshot(&mounted) {
        let slack = 0.15 + 1e-3;
        assert!(p.position.x >= -slack && p.position.x <= 50.0 + slack);
        assert!(p.position.y >= -slack && p.position.y <= 50.0 + slack);
    }
}

#[test]
fn test_sign_flips_only_on_crossing() {
    let (mounted, _, _) = harness(200.0, 200.0, false);
    let mut ts = 0.0;
    for _ in 0..3000 {
        let before = snapshot(&mounted);
        ts += 20.0;
        mounted.engine().borrow_mut().advance_frame(ts);
        let after = snapshot(&mounted);

        for (a, b) in before.iter().zip(&after) {
            let x_out = b.position.x < 0.0 || b.position.x > 200.0;
            let y_out = b.position.y < 0.0 || b.position.y > 200.0;
            assert_eq!(a.velocity.x != b.velocity.x, x_out);
            assert_eq!(a.velocity.y != b.velocity.y, y_out);
        }
    }
}

#[test]
fn test_boundary_overshoot_scenario() {
    let (mounted, _, _) = harness(100.0, 100.0, false);
    mounted.engine().borrow_mut().store_mut().particles_mut()[0] =
        Particle::new(Vec2::new(0.0, 50.0), Vec2::new(-0.1, 0.0), 1.0, 0.2);

    mounted.engine().borrow_mut().advance_frame(100.0);
    let p = snapshot(&mounted)[0];
    assert!((p.position.x + 0.1).abs() < 1e-6);
    assert!((p.velocity.x - 0.1).abs() < 1e-6);

    mounted.engine().borrow_mut().advance_frame(200.0);
    let engine = mounted.engine().borrow();
    let drawn = engine.surface().visible()[0];
    assert!((drawn.center.x + 0.1).abs() < 1e-6, "drawn at {:?}", drawn.center);
    assert!((engine.store().particles()[0].velocity.x - 0.1).abs() < 1e-6);
}

// ============================================================================
// Throttling
// ============================================================================

#[test]
fn test_fast_callbacks_are_throttled() {
    let (mounted, _, _) = harness(800.0, 600.0, false);
    // 1 second at 144 Hz
    run_frames(&mounted, 1000.0, 1000.0 / 144.0, 144);

    let engine = mounted.engine().borrow();
    let accepted = engine.throttle().accepted();
    assert!(accepted <= 61, "accepted {}", accepted);
    assert!(accepted >= 45, "accepted {}", accepted);
    assert_eq!(engine.throttle().skipped() + accepted, 144);
    assert!(engine.is_running());
}

#[test]
fn test_at_most_one_step_per_window() {
    let (mounted, _, _) = harness(800.0, 600.0, false);
    let before = snapshot(&mounted);

    // Callbacks 5 ms apart, all within one 16.67 ms window after the first
    for ts in [100.0, 105.0, 110.0, 115.0] {
        mounted.engine().borrow_mut().advance_frame(ts);
    }

    let engine = mounted.engine().borrow();
    assert_eq!(engine.throttle().accepted(), 1);
    assert_eq!(engine.throttle().skipped(), 3);
    let after = engine.store().particles();
    for (a, b) in before.iter().zip(after) {
        assert!(((b.position - a.position) - a.velocity).length() < 1e-4);
    }
}

#[test]
fn test_slow_callbacks_step_every_time() {
    let (mounted, _, _) = harness(800.0, 600.0, false);
    run_frames(&mounted, 0.0, 33.0, 90);

    let engine = mounted.engine().borrow();
    assert_eq!(engine.throttle().accepted(), 90);
    assert_eq!(engine.throttle().skipped(), 0);
}

#[test]
fn test_skipped_frame_still_requests_next() {
    let (mounted, _, _) = harness(800.0, 600.0, false);
    mounted.engine().borrow_mut().advance_frame(100.0);
    let requests = mounted.engine().borrow().host().requests();

    mounted.engine().borrow_mut().advance_frame(101.0);
    let engine = mounted.engine().borrow();
    assert_eq!(engine.host().requests(), requests + 1);
    assert!(engine.host().pending().is_some());
}

// ============================================================================
// Scheduler lifecycle
// ============================================================================

#[test]
fn test_stop_twice_and_stop_without_start() {
    let (mounted, _, _) = harness(800.0, 600.0, true);
    let mut engine = mounted.engine().borrow_mut();
    assert_eq!(engine.scheduler_state(), SchedulerState::Idle);

    engine.stop();
    engine.stop();
    assert_eq!(engine.scheduler_state(), SchedulerState::Idle);
    assert!(engine.host().cancelled().is_empty());
}

#[test]
fn test_same_size_resize_reinitializes() {
    let (mounted, viewport, _) = harness(1920.0, 1080.0, false);
    run_frames(&mounted, 0.0, 20.0, 10);
    let before = snapshot(&mounted);
    let pending = mounted.engine().borrow().host().pending();

    viewport.set_size(1920.0, 1080.0);

    let after = snapshot(&mounted);
    assert_eq!(after.len(), before.len());
    let carried = before
        .iter()
        .zip(&after)
        .filter(|(a, b)| a.position == b.position)
        .count();
    assert_eq!(carried, 0);

    let engine = mounted.engine().borrow();
    assert!(matches!(engine.scheduler_state(), SchedulerState::Scheduled(_)));
    assert_eq!(engine.host().cancelled().last().copied(), pending);
    assert_eq!(engine.generation(), 2);
}

#[test]
fn test_unschedulable_host_stays_idle() {
    let (mounted, _, _) = harness(800.0, 600.0, false);
    {
        let mut engine = mounted.engine().borrow_mut();
        engine.host_mut().set_refuse(true);
        engine.resize();
        assert!(!engine.is_running());
    }
    assert!(!mounted.engine().borrow_mut().advance_frame(100.0));
}

// ============================================================================
// Motion preference
// ============================================================================

#[test]
fn test_reduced_motion_mid_animation() {
    let (mounted, _, motion) = harness(1280.0, 720.0, false);
    let ts = run_frames(&mounted, 0.0, 20.0, 5);
    assert!(!mounted.engine().borrow().surface().is_blank());

    motion.set(true);
    {
        let engine = mounted.engine().borrow();
        assert_eq!(engine.scheduler_state(), SchedulerState::Idle);
        assert!(engine.surface().is_blank());
        assert!(engine.host().pending().is_none());
    }

    let frozen = snapshot(&mounted);
    run_frames(&mounted, ts, 20.0, 10);
    assert_eq!(snapshot(&mounted), frozen);
    assert_eq!(mounted.engine().borrow().throttle().accepted(), 5);

    motion.set(false);
    assert!(mounted.engine().borrow().is_running());
    run_frames(&mounted, ts + 1000.0, 20.0, 3);
    assert_eq!(mounted.engine().borrow().throttle().accepted(), 8);
}

#[test]
fn test_resize_while_reduced_reinitializes_without_starting() {
    let (mounted, viewport, motion) = harness(1280.0, 720.0, true);
    assert!(!mounted.engine().borrow().is_running());
    let before = snapshot(&mounted);

    viewport.set_size(640.0, 480.0);
    {
        let engine = mounted.engine().borrow();
        assert!(!engine.is_running());
        assert_eq!(engine.host().requests(), 0);
        assert_eq!(engine.store().len(), 30);
        assert_eq!(engine.viewport(), Viewport::new(640.0, 480.0));
    }
    assert_ne!(snapshot(&mounted), before);

    motion.set(false);
    assert!(mounted.engine().borrow().is_running());
}

// ============================================================================
// Failure and teardown
// ============================================================================

#[test]
fn test_missing_surface_fails_closed() {
    let viewport = ManualViewport::new(800.0, 600.0);
    let motion = MotionSwitch::new(false);
    let result: Result<Engine<RecordingSurface, ManualFrameHost>, _> = Engine::builder()
        .with_frame_host(ManualFrameHost::new())
        .with_viewport(Rc::new(viewport.clone()))
        .with_motion(Rc::new(motion.clone()))
        .build();

    assert!(matches!(result, Err(EngineError::SurfaceUnavailable(_))));
    assert_eq!(viewport.listener_count(), 0);
    assert_eq!(motion.listener_count(), 0);
}

#[test]
fn test_teardown_leaves_no_listeners() {
    let (mounted, viewport, motion) = harness(800.0, 600.0, false);
    run_frames(&mounted, 0.0, 20.0, 3);

    let engine = mounted.teardown();
    assert_eq!(viewport.listener_count(), 0);
    assert_eq!(motion.listener_count(), 0);

    let engine = engine.borrow();
    assert!(!engine.is_running());
    assert!(engine.surface().is_blank());
}

#[test]
fn test_dropping_mount_cancels_frame_and_blanks() {
    let (mounted, viewport, motion) = harness(800.0, 600.0, false);
    run_frames(&mounted, 0.0, 20.0, 3);
    let engine = Rc::clone(mounted.engine());
    assert!(engine.borrow().host().pending().is_some());
    assert!(!engine.borrow().surface().is_blank());

    drop(mounted);
    assert_eq!(engine.borrow().host().pending(), None);
    assert!(!engine.borrow().is_running());
    assert!(engine.borrow().surface().is_blank());
    assert_eq!(viewport.listener_count(), 0);
    assert_eq!(motion.listener_count(), 0);

    assert!(!engine.borrow_mut().advance_frame(1000.0));
}

// ============================================================================
// Raster output
// ============================================================================

#[test]
fn test_raster_frames_paint_and_clear() {
    init_tracing();
    let viewport = ManualViewport::new(320.0, 240.0);
    let motion = MotionSwitch::new(false);
    let engine = Engine::builder()
        .with_config(
            EngineConfig::default()
                .with_seed(3)
                .with_radius(2.0, 2.0)
                .with_opacity(1.0, 1.0),
        )
        .with_surface(RasterSurface::new(1, 1))
        .with_frame_host(ManualFrameHost::new())
        .with_viewport(Rc::new(viewport.clone()))
        .with_motion(Rc::new(motion.clone()))
        .build()
        .unwrap();
    let mounted = mount(engine);
    mounted.start();

    {
        let mut engine = mounted.engine().borrow_mut();
        assert_eq!(engine.surface().width(), 320);
        assert!(engine.advance_frame(50.0));
        assert!(!engine.surface().is_blank());
    }

    motion.set(true);
    assert!(mounted.engine().borrow().surface().is_blank());
}
