//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the geofence evaluator and the tap debouncer.  All
//! platform interaction flows through port traits passed in at call sites,
//! making the whole service testable with mock adapters.
//!
//! ```text
//!  EventQueue ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │        AppService         │
//!   Platform  ◀──│  Geofence · TapDebouncer  │
//!                 └──────────────────────────┘
//! ```

use log::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::events::{Event, TimedEvent};
use crate::geofence::{GeoPoint, GeofenceEvaluator, Proximity};
use crate::launch::{LaunchOutcome, LaunchTarget, launch_with_fallback};
use crate::proximity::ProximityReading;
use crate::tap::{TapDebouncer, TapGesture, TapState};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, LocationPort, Notice, PermissionPort, Platform};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// Orchestrates all domain logic.  Construct once per process.
pub struct AppService {
    config: AppConfig,
    geofence: GeofenceEvaluator,
    taps: TapDebouncer,
    target: LaunchTarget,
    location_active: bool,
    tap_detection: bool,
    permission_pending: bool,
    stopped: bool,
}

impl AppService {
    /// Construct the service.  Rejects an invalid configuration.
    ///
    /// Does **not** touch the platform; call [`start`](Self::start) next.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let zone = config.target_zone()?;
        let taps = TapDebouncer::new(config.tap_window_ms, config.tap_threshold);
        let target = LaunchTarget::new(config.primary_uri.clone(), config.fallback_uri.clone());

        Ok(Self {
            geofence: GeofenceEvaluator::new(zone),
            taps,
            target,
            config,
            location_active: false,
            tap_detection: false,
            permission_pending: false,
            stopped: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start location updates (or ask for permission) and subscribe to the
    /// proximity sensor.
    /// Does nothing once the service has been shut down.
    pub fn start(&mut self, platform: &mut impl Platform, sink: &mut impl EventSink) {
        if self.stopped {
            warn!("AppService already stopped, ignoring start");
            return;
        }
        if platform.has_fine_location() {
            self.start_location(platform, sink);
        } else {
            let code = self.config.permission_request_code;
            info!("Fine-location permission missing, requesting (code {})", code);
            platform.request_fine_location(code);
            self.permission_pending = true;
            sink.emit(&AppEvent::PermissionRequested { request_code: code });
        }

        match platform.max_range() {
            Some(range) => match platform.register() {
                Ok(()) => {
                    self.tap_detection = true;
                    info!("Proximity listener registered (max range {:.1})", range);
                }
                Err(e) => warn!("Proximity listener not registered ({}), tap detection off", e),
            },
            None => warn!("No proximity sensor, tap detection off"),
        }

        sink.emit(&AppEvent::Started {
            location_active: self.location_active,
            tap_detection: self.tap_detection,
        });
        info!(
            "AppService started (location={}, taps={})",
            self.location_active, self.tap_detection
        );
    }

    /// Route one queued event to its handler.
    pub fn dispatch(
        &mut self,
        event: TimedEvent,
        platform: &mut impl Platform,
        sink: &mut impl EventSink,
    ) {
        match event.event {
            Event::LocationResult(batch) => self.on_location_result(&batch, platform, sink),
            Event::Proximity(reading) => self.on_proximity(reading, event.at_ms, platform, sink),
            Event::Tick => self.tick(event.at_ms, sink),
            Event::Command(cmd) => self.handle_command(cmd, platform, sink),
        }
    }

    // ── Location ──────────────────────────────────────────────

    /// Evaluate every fix of one provider callback, in order.
    pub fn on_location_result(
        &mut self,
        fixes: &[GeoPoint],
        platform: &mut impl Platform,
        sink: &mut impl EventSink,
    ) {
        if self.stopped {
            debug!("Ignoring {} fix(es) after shutdown", fixes.len());
            return;
        }

        for &fix in fixes {
            if !fix.is_valid() {
                warn!("Discarding invalid fix {}", fix);
                continue;
            }

            platform.show_location(fix);
            let eval = self.geofence.evaluate(fix);
            debug!(
                "Fix {} is {:.1} m from target ({:?})",
                fix, eval.distance_m, eval.proximity
            );
            sink.emit(&AppEvent::LocationUpdated {
                point: fix,
                distance_m: eval.distance_m,
                inside: eval.proximity == Proximity::Inside,
            });

            if eval.arrived {
                info!("Arrived at target zone ({:.1} m from center)", eval.distance_m);
                sink.emit(&AppEvent::Arrived {
                    point: fix,
                    distance_m: eval.distance_m,
                });
                self.launch_target(platform, sink);
            }
        }
    }

    // ── Proximity ─────────────────────────────────────────────

    /// Feed one proximity change into the tap debouncer.
    pub fn on_proximity(
        &mut self,
        reading: ProximityReading,
        now_ms: u32,
        platform: &mut impl Platform,
        sink: &mut impl EventSink,
    ) {
        if !self.tap_detection || !reading.is_trigger() {
            return;
        }

        self.poll_taps(now_ms, sink);
        match self.taps.on_tap(now_ms) {
            Some(TapGesture::ForegroundRequested) => {
                info!("Triple tap, bringing app to foreground");
                platform.bring_to_foreground();
                platform.show_notice(Notice::ForegroundRestored);
                sink.emit(&AppEvent::ForegroundRequested);
            }
            None => sink.emit(&AppEvent::TapCounted {
                count: self.taps.count(),
            }),
        }
    }

    /// Expire the tap window if it is due.
    pub fn tick(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.poll_taps(now_ms, sink);
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        platform: &mut impl Platform,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::PermissionResult {
                request_code,
                granted,
            } => {
                if request_code == self.config.permission_request_code && granted {
                    self.permission_pending = false;
                    self.start_location(platform, sink);
                } else {
                    warn!(
                        "Location permission not granted (code {}, granted={})",
                        request_code, granted
                    );
                    platform.show_notice(Notice::PermissionRequired);
                    sink.emit(&AppEvent::PermissionDenied { request_code });
                }
            }
            AppCommand::Shutdown => self.shutdown(platform, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Whether the one-shot arrival has already happened.
    pub fn has_arrived(&self) -> bool {
        self.geofence.has_arrived()
    }

    pub fn tap_state(&self) -> TapState {
        self.taps.state()
    }

    pub fn location_active(&self) -> bool {
        self.location_active
    }

    pub fn tap_detection_active(&self) -> bool {
        self.tap_detection
    }

    pub fn permission_pending(&self) -> bool {
        self.permission_pending
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_location(
        &mut self,
        platform: &mut (impl LocationPort + PermissionPort),
        sink: &mut impl EventSink,
    ) {
        if self.location_active || self.stopped {
            return;
        }
        if !platform.has_fine_location() {
            warn!("Location start skipped: permission still missing");
            return;
        }
        match platform.start_updates(&self.config.location) {
            Ok(()) => {
                self.location_active = true;
                info!(
                    "Location updates started ({} ms, {:?})",
                    self.config.location.interval_ms, self.config.location.priority
                );
                sink.emit(&AppEvent::LocationStarted);
            }
            Err(e) => warn!("Location updates failed to start: {}", e),
        }
    }

    fn launch_target(&mut self, platform: &mut impl Platform, sink: &mut impl EventSink) {
        match launch_with_fallback(platform, &self.target) {
            Ok(outcome) => {
                let notice = match outcome {
                    LaunchOutcome::Primary => Notice::PrimaryOpened,
                    LaunchOutcome::Fallback => Notice::FallbackOpened,
                };
                platform.show_notice(notice);
                sink.emit(&AppEvent::Launched(outcome));
            }
            Err(e) => {
                error!("Arrival launch failed: {}", e);
                sink.emit(&AppEvent::LaunchFailed(e));
            }
        }
    }

    fn poll_taps(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        if let Some(dropped) = self.taps.poll(now_ms) {
            debug!("Tap window expired, dropped {} tap(s)", dropped);
            sink.emit(&AppEvent::TapWindowExpired { dropped });
        }
    }

    fn shutdown(&mut self, platform: &mut impl Platform, sink: &mut impl EventSink) {
        if self.stopped {
            return;
        }
        if self.tap_detection {
            platform.unregister();
            self.tap_detection = false;
        }
        if self.location_active {
            platform.stop_updates();
            self.location_active = false;
        }
        self.taps.reset();
        self.stopped = true;
        info!("AppService stopped");
        sink.emit(&AppEvent::Stopped);
    }
}
