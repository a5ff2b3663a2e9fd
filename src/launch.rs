//! Arrival launch policy: primary target, one fallback, nothing more.
//!
//! ```text
//!   open(primary) ──Ok──▶ Primary
//!        │
//!       Err
//!        ▼
//!   open(fallback) ──Ok──▶ Fallback
//!        │
//!       Err ──▶ LaunchError (no third attempt)
//! ```

use log::{info, warn};

use crate::app::ports::LauncherPort;
use crate::error::LaunchError;

/// Which target ended up open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Primary,
    Fallback,
}

/// The pair of URIs tried on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub primary: String,
    pub fallback: String,
}

impl LaunchTarget {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }
}

/// Open `target.primary`, falling back to `target.fallback` when the primary
/// fails for any reason.  At most two attempts.
pub fn launch_with_fallback(
    launcher: &mut impl LauncherPort,
    target: &LaunchTarget,
) -> Result<LaunchOutcome, LaunchError> {
    match launcher.open_uri(&target.primary) {
        Ok(()) => {
            info!("Launch: opened {}", target.primary);
            Ok(LaunchOutcome::Primary)
        }
        Err(e) => {
            warn!(
                "Launch: {} failed ({}), falling back to {}",
                target.primary, e, target.fallback
            );
            launcher.open_uri(&target.fallback)?;
            info!("Launch: opened fallback {}", target.fallback);
            Ok(LaunchOutcome::Fallback)
        }
    }
}
