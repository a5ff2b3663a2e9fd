//! Integration tests for the AppService → ports pipeline.
//!
//! These run on the host and drive the service through mock ports,
//! checking the full chain from an inbound callback down to the platform
//! calls it produces.

use crate::mock_platform::{MockPlatform, PlatformCall, RecordingSink};

use boundy::app::commands::AppCommand;
use boundy::app::events::AppEvent;
use boundy::app::ports::Notice;
use boundy::app::service::AppService;
use boundy::config::AppConfig;
use boundy::error::LaunchError;
use boundy::events::{Event, EventQueue, LocationBatch, TimedEvent};
use boundy::geofence::GeoPoint;
use boundy::launch::LaunchOutcome;
use boundy::proximity::ProximityReading;
use boundy::tap::TapState;

const NEAR: GeoPoint = GeoPoint::new(37.6098, 126.9981);
const FAR: GeoPoint = GeoPoint::new(37.62, 126.998);
const TAP: ProximityReading = ProximityReading::new(0.0, 5.0);
const RELEASE: ProximityReading = ProximityReading::new(5.0, 5.0);

fn started(mut platform: MockPlatform) -> (AppService, MockPlatform, RecordingSink) {
    let mut app = AppService::new(AppConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    app.start(&mut platform, &mut sink);
    (app, platform, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_with_permission_begins_updates_and_registers_sensor() {
    let (app, platform, sink) = started(MockPlatform::new());

    assert!(app.location_active());
    assert!(app.tap_detection_active());
    assert_eq!(
        platform.calls,
        vec![
            PlatformCall::StartUpdates(AppConfig::default().location),
            PlatformCall::Register,
        ]
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::Started {
            location_active: true,
            tap_detection: true
        })
    );
}

#[test]
fn start_without_permission_requests_it() {
    let (app, platform, sink) = started(MockPlatform::without_permission());

    assert!(!app.location_active());
    assert!(app.permission_pending());
    assert_eq!(platform.count(|c| *c == PlatformCall::RequestPermission(100)), 1);
    assert_eq!(
        platform.count(|c| matches!(c, PlatformCall::StartUpdates(_))),
        0
    );
    assert_eq!(
        sink.count(|e| *e == AppEvent::PermissionRequested { request_code: 100 }),
        1
    );
}

#[test]
fn missing_sensor_leaves_taps_inert() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::without_sensor());
    assert!(!app.tap_detection_active());

    for t in [0, 100, 200] {
        app.on_proximity(TAP, t, &mut platform, &mut sink);
    }
    assert_eq!(platform.count(|c| *c == PlatformCall::Foreground), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::TapCounted { .. })), 0);
}

#[test]
fn failed_registration_leaves_taps_inert() {
    let mut platform = MockPlatform::new();
    platform.register_fails = true;
    let (app, _platform, _sink) = started(platform);
    assert!(!app.tap_detection_active());
}

// ── Permission flow ───────────────────────────────────────────

#[test]
fn granted_permission_result_starts_updates() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::without_permission());

    platform.permission = true;
    app.handle_command(
        AppCommand::PermissionResult {
            request_code: 100,
            granted: true,
        },
        &mut platform,
        &mut sink,
    );

    assert!(app.location_active());
    assert!(!app.permission_pending());
    assert_eq!(sink.count(|e| *e == AppEvent::LocationStarted), 1);
}

#[test]
fn denied_permission_shows_notice_and_stays_idle() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::without_permission());

    app.handle_command(
        AppCommand::PermissionResult {
            request_code: 100,
            granted: false,
        },
        &mut platform,
        &mut sink,
    );

    assert!(!app.location_active());
    assert_eq!(platform.notices(), vec![Notice::PermissionRequired]);
    assert_eq!(
        sink.count(|e| *e == AppEvent::PermissionDenied { request_code: 100 }),
        1
    );
}

#[test]
fn foreign_request_code_is_treated_as_denied() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::without_permission());
    platform.permission = true;

    app.handle_command(
        AppCommand::PermissionResult {
            request_code: 7,
            granted: true,
        },
        &mut platform,
        &mut sink,
    );

    assert!(!app.location_active());
    assert_eq!(platform.notices(), vec![Notice::PermissionRequired]);
}

#[test]
fn grant_answer_without_actual_permission_does_not_start() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::without_permission());

    // Prompt says granted but the platform still reports no permission.
    app.handle_command(
        AppCommand::PermissionResult {
            request_code: 100,
            granted: true,
        },
        &mut platform,
        &mut sink,
    );
    assert!(!app.location_active());
}

// ── Arrival ───────────────────────────────────────────────────

#[test]
fn arrival_opens_primary_once() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());

    app.on_location_result(&[FAR], &mut platform, &mut sink);
    assert!(!app.has_arrived());
    assert!(platform.opened().is_empty());

    app.on_location_result(&[NEAR], &mut platform, &mut sink);
    assert!(app.has_arrived());
    assert_eq!(platform.opened(), vec!["https://www.youtube.com"]);
    assert_eq!(platform.notices(), vec![Notice::PrimaryOpened]);

    app.on_location_result(&[NEAR, FAR, NEAR], &mut platform, &mut sink);
    assert_eq!(platform.opened().len(), 1, "arrival must be one-shot");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Arrived { .. })), 1);
    assert_eq!(
        sink.count(|e| *e == AppEvent::Launched(LaunchOutcome::Primary)),
        1
    );
}

#[test]
fn every_fix_in_a_batch_is_shown() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.on_location_result(&[FAR, FAR, FAR], &mut platform, &mut sink);
    assert_eq!(
        platform.count(|c| matches!(c, PlatformCall::ShowLocation(_))),
        3
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::LocationUpdated { inside: false, .. })),
        3
    );
}

#[test]
fn invalid_fixes_are_skipped() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.on_location_result(&[GeoPoint::new(f64::NAN, 0.0)], &mut platform, &mut sink);
    assert_eq!(
        platform.count(|c| matches!(c, PlatformCall::ShowLocation(_))),
        0
    );
}

#[test]
fn missing_primary_handler_falls_back() {
    let (mut app, mut platform, mut sink) =
        started(MockPlatform::with_handlers(&["https://www.instagram.com"]));

    app.on_location_result(&[NEAR], &mut platform, &mut sink);

    assert_eq!(
        platform.opened(),
        vec!["https://www.youtube.com", "https://www.instagram.com"]
    );
    assert_eq!(platform.notices(), vec![Notice::FallbackOpened]);
    assert_eq!(
        sink.count(|e| *e == AppEvent::Launched(LaunchOutcome::Fallback)),
        1
    );
}

#[test]
fn both_targets_missing_reports_failure_without_retry() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::with_handlers(&[]));

    app.on_location_result(&[NEAR], &mut platform, &mut sink);
    app.on_location_result(&[NEAR], &mut platform, &mut sink);

    assert_eq!(platform.opened().len(), 2);
    assert!(app.has_arrived());
    assert_eq!(
        sink.count(|e| *e == AppEvent::LaunchFailed(LaunchError::NoHandler)),
        1
    );
}

// ── Triple tap ────────────────────────────────────────────────

#[test]
fn triple_tap_brings_app_forward() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());

    app.on_proximity(TAP, 0, &mut platform, &mut sink);
    app.on_proximity(TAP, 500, &mut platform, &mut sink);
    assert_eq!(app.tap_state(), TapState::Counting(2));
    app.on_proximity(TAP, 1000, &mut platform, &mut sink);

    assert_eq!(platform.count(|c| *c == PlatformCall::Foreground), 1);
    assert_eq!(platform.notices(), vec![Notice::ForegroundRestored]);
    assert_eq!(sink.count(|e| *e == AppEvent::ForegroundRequested), 1);
    assert_eq!(app.tap_state(), TapState::Idle);
}

#[test]
fn far_readings_are_not_taps() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.on_proximity(TAP, 0, &mut platform, &mut sink);
    app.on_proximity(RELEASE, 100, &mut platform, &mut sink);
    app.on_proximity(TAP, 200, &mut platform, &mut sink);
    app.on_proximity(RELEASE, 300, &mut platform, &mut sink);
    assert_eq!(app.tap_state(), TapState::Counting(2));
}

#[test]
fn slow_taps_never_trigger() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    for t in [0, 2500, 5000, 7500] {
        app.tick(t, &mut sink);
        app.on_proximity(TAP, t, &mut platform, &mut sink);
    }
    assert_eq!(platform.count(|c| *c == PlatformCall::Foreground), 0);
    assert_eq!(app.tap_state(), TapState::Counting(1));
    assert_eq!(
        sink.count(|e| *e == AppEvent::TapWindowExpired { dropped: 1 }),
        3
    );
}

#[test]
fn tick_expires_partial_gesture_silently() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.on_proximity(TAP, 0, &mut platform, &mut sink);
    app.on_proximity(TAP, 300, &mut platform, &mut sink);

    app.tick(2299, &mut sink);
    assert_eq!(app.tap_state(), TapState::Counting(2));
    app.tick(2300, &mut sink);
    assert_eq!(app.tap_state(), TapState::Idle);
    assert_eq!(platform.count(|c| *c == PlatformCall::Foreground), 0);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_releases_listeners_once() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());

    app.handle_command(AppCommand::Shutdown, &mut platform, &mut sink);
    app.handle_command(AppCommand::Shutdown, &mut platform, &mut sink);

    assert!(app.is_stopped());
    assert!(!app.location_active());
    assert!(!app.tap_detection_active());
    assert_eq!(platform.count(|c| *c == PlatformCall::Unregister), 1);
    assert_eq!(platform.count(|c| *c == PlatformCall::StopUpdates), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::Stopped), 1);

    // Late callbacks are ignored.
    app.on_location_result(&[NEAR], &mut platform, &mut sink);
    app.on_proximity(TAP, 0, &mut platform, &mut sink);
    assert!(!app.has_arrived());
    assert_eq!(app.tap_state(), TapState::Idle);
}

#[test]
fn start_after_shutdown_is_ignored() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.handle_command(AppCommand::Shutdown, &mut platform, &mut sink);

    app.start(&mut platform, &mut sink);

    assert!(!app.tap_detection_active());
    assert!(!app.location_active());
    assert_eq!(platform.count(|c| *c == PlatformCall::Register), 1);
    assert_eq!(
        platform.count(|c| matches!(c, PlatformCall::StartUpdates(_))),
        1
    );
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn shutdown_discards_partial_gesture() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    app.on_proximity(TAP, 0, &mut platform, &mut sink);
    app.on_proximity(TAP, 100, &mut platform, &mut sink);

    app.handle_command(AppCommand::Shutdown, &mut platform, &mut sink);
    app.tick(5000, &mut sink);

    assert_eq!(app.tap_state(), TapState::Idle);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

// ── Queue dispatch ────────────────────────────────────────────

#[test]
fn queued_events_dispatch_in_order() {
    let (mut app, mut platform, mut sink) = started(MockPlatform::new());
    let mut queue = EventQueue::new();

    let mut batch = LocationBatch::new();
    batch.push(FAR).unwrap();
    batch.push(NEAR).unwrap();
    assert!(queue.push(TimedEvent::new(0, Event::LocationResult(batch))));
    for t in [100, 200, 300] {
        assert!(queue.push(TimedEvent::new(t, Event::Proximity(TAP))));
    }
    assert!(queue.push(TimedEvent::new(400, Event::Command(AppCommand::Shutdown))));

    queue.drain(|e| app.dispatch(e, &mut platform, &mut sink));

    assert!(app.has_arrived());
    assert_eq!(platform.count(|c| *c == PlatformCall::Foreground), 1);
    assert!(app.is_stopped());
}
