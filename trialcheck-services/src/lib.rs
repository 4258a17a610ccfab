//! trialcheck-services
//!
//! OS service control for the trial status checker: the controller trait,
//! the Windows (`sc`/`net`) and systemd backends, and the checker that
//! performs the single restart attempt.
//!
//! Public API:
//! - `checker::ServiceChecker`: query / restart once / re-query
//! - `controller::ServiceController`: backend trait
//! - `platform_controller`: backend matching the host OS

pub mod checker;
pub mod controller;
pub mod sc;
pub mod systemctl;

pub use checker::ServiceChecker;
pub use controller::{run_command, CommandOutput, ServiceController};
pub use sc::ScController;
pub use systemctl::SystemctlController;

use std::sync::Arc;

/// Service controller for the OS this binary was built for.
pub fn platform_controller() -> Arc<dyn ServiceController> {
    #[cfg(windows)]
    {
        Arc::new(ScController::new())
    }
    #[cfg(not(windows))]
    {
        Arc::new(SystemctlController::new())
    }
}
