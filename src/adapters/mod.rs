//! Adapters: concrete host implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                                  | Connects to          |
//! |---------------|---------------------------------------------|----------------------|
//! | `config_file` | ConfigPort                                  | JSON file on disk    |
//! | `log_sink`    | EventSink                                   | `log` facade         |
//! | `replay`      | LocationPort, PermissionPort, ProximityPort | Recorded JSON trace  |
//! |               | LauncherPort, DisplayPort                   |                      |

pub mod config_file;
pub mod log_sink;
pub mod replay;
