//! End-to-end replay tests: trace JSON → ReplayPlatform → AppService.

use crate::mock_platform::RecordingSink;

use boundy::adapters::replay::{self, ReplayPlatform, Trace};
use boundy::app::events::AppEvent;
use boundy::app::ports::Notice;
use boundy::app::service::AppService;
use boundy::config::AppConfig;
use boundy::launch::LaunchOutcome;

fn replay(json: &str) -> (replay::ReplaySummary, ReplayPlatform, RecordingSink) {
    let trace = Trace::from_json(json).unwrap();
    let mut app = AppService::new(AppConfig::default()).unwrap();
    let mut platform = ReplayPlatform::new(&trace.device);
    let mut sink = RecordingSink::new();
    let summary = replay::run(&trace, &mut app, &mut platform, &mut sink);
    (summary, platform, sink)
}

#[test]
fn walk_in_with_fallback_and_triple_tap() {
    let (summary, platform, sink) = replay(
        r#"{
            "device": {
                "permission_granted": false,
                "proximity_max_range": 5.0,
                "handlers": ["https://www.instagram.com"]
            },
            "events": [
                { "at_ms": 0,     "type": "permission", "granted": true },
                { "at_ms": 10000, "type": "location", "fixes": [{ "latitude": 37.62, "longitude": 126.998 }] },
                { "at_ms": 20000, "type": "location", "fixes": [{ "latitude": 37.6098, "longitude": 126.9981 }] },
                { "at_ms": 21000, "type": "proximity", "distance": 0.0 },
                { "at_ms": 21500, "type": "proximity", "distance": 0.0 },
                { "at_ms": 22000, "type": "proximity", "distance": 0.0 },
                { "at_ms": 30000, "type": "location", "fixes": [{ "latitude": 37.6097, "longitude": 126.998 }] }
            ]
        }"#,
    );

    assert!(summary.arrived);
    assert_eq!(summary.opened, vec!["https://www.instagram.com".to_owned()]);
    assert_eq!(summary.foreground_requests, 1);
    assert_eq!(summary.dispatched, 14);
    assert_eq!(summary.dropped, 0);

    assert_eq!(
        platform.notices(),
        &[Notice::FallbackOpened, Notice::ForegroundRestored]
    );
    assert!(!platform.location_running());
    assert!(!platform.proximity_registered());
    assert_eq!(
        sink.count(|e| *e == AppEvent::Launched(LaunchOutcome::Fallback)),
        1
    );
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn fixes_before_permission_are_never_seen() {
    let (summary, platform, _sink) = replay(
        r#"{
            "device": { "handlers": ["https://"] },
            "events": [
                { "at_ms": 0,    "type": "location", "fixes": [{ "latitude": 37.6097, "longitude": 126.998 }] },
                { "at_ms": 1000, "type": "permission", "granted": false }
            ]
        }"#,
    );

    assert!(!summary.arrived);
    assert!(summary.opened.is_empty());
    assert_eq!(platform.last_location(), None);
    assert_eq!(platform.notices(), &[Notice::PermissionRequired]);
}

#[test]
fn no_sensor_means_no_foreground() {
    let (summary, _platform, sink) = replay(
        r#"{
            "device": { "permission_granted": true },
            "events": [
                { "at_ms": 0,   "type": "proximity", "distance": 0.0 },
                { "at_ms": 100, "type": "proximity", "distance": 0.0 },
                { "at_ms": 200, "type": "proximity", "distance": 0.0 },
                { "at_ms": 300, "type": "shutdown" }
            ]
        }"#,
    );

    assert_eq!(summary.foreground_requests, 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::TapCounted { .. })), 0);
    assert_eq!(sink.count(|e| *e == AppEvent::Stopped), 1);
}

#[test]
fn trailing_partial_gesture_is_flushed() {
    let (summary, _platform, sink) = replay(
        r#"{
            "device": { "permission_granted": true, "proximity_max_range": 5.0 },
            "events": [
                { "at_ms": 0,   "type": "proximity", "distance": 0.0 },
                { "at_ms": 400, "type": "proximity", "distance": 0.0 }
            ]
        }"#,
    );

    assert_eq!(summary.foreground_requests, 0);
    assert_eq!(
        sink.count(|e| *e == AppEvent::TapWindowExpired { dropped: 2 }),
        1
    );
}

#[test]
fn out_of_order_entry_does_not_expire_window() {
    let (summary, _platform, sink) = replay(
        r#"{
            "device": { "permission_granted": true, "proximity_max_range": 5.0 },
            "events": [
                { "at_ms": 1000, "type": "proximity", "distance": 0.0 },
                { "at_ms": 1100, "type": "proximity", "distance": 0.0 },
                { "at_ms": 1050, "type": "proximity", "distance": 0.0 }
            ]
        }"#,
    );

    assert_eq!(summary.foreground_requests, 1);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::TapWindowExpired { .. })),
        0
    );
}

#[test]
fn nothing_is_emitted_after_trace_shutdown() {
    let (_summary, _platform, sink) = replay(
        r#"{
            "device": { "permission_granted": true, "proximity_max_range": 5.0 },
            "events": [
                { "at_ms": 0,    "type": "proximity", "distance": 0.0 },
                { "at_ms": 100,  "type": "proximity", "distance": 0.0 },
                { "at_ms": 200,  "type": "shutdown" },
                { "at_ms": 5000, "type": "tick" }
            ]
        }"#,
    );

    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::TapWindowExpired { .. })),
        0
    );
}
