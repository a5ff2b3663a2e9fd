//! Application core: pure domain logic, zero platform calls.
//!
//! This module contains the rules for boundy: geofence arrival, launch
//! policy and the triple-tap gesture.  All interaction with the platform
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without a device.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
