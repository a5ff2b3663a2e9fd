//! boundy library.
//!
//! Geofence arrival detection and proximity triple-tap gestures, written as
//! plain state machines behind port traits.  Platform adapters live in
//! [`adapters`]; the host replay binary is `src/main.rs`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod geofence;
pub mod launch;
pub mod proximity;
pub mod tap;
