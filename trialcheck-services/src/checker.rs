//! Service Checker - query, restart once, re-query
//!
//! Implements the service health check on top of a [`ServiceController`].

use crate::controller::ServiceController;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trialcheck_core::{ServiceHealth, ServiceStatus};

/// Service health checker
///
/// Generic over the controller type, allowing the real OS backends or mock
/// controllers for testing.
pub struct ServiceChecker<C: ServiceController + ?Sized = dyn ServiceController> {
    controller: Arc<C>,
}

impl<C: ServiceController + ?Sized> Clone for ServiceChecker<C> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<C: ServiceController + ?Sized> ServiceChecker<C> {
    /// Create a new ServiceChecker around a controller
    pub fn new(controller: Arc<C>) -> Self {
        Self { controller }
    }

    /// Query a service, treating a failed query as "not running".
    async fn status(&self, service: &str) -> ServiceStatus {
        match self.controller.query(service).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Querying service {} failed: {}", service, e);
                ServiceStatus::NotRunning(e.to_string())
            }
        }
    }

    /// Check one service, attempting a single restart if it is not running.
    ///
    /// Start failures are swallowed; the re-query decides the final health.
    pub async fn check(&self, service: &str) -> ServiceHealth {
        let initial = self.status(service).await;

        if initial.is_running() {
            debug!("Service {} is running", service);
            return ServiceHealth {
                name: service.to_string(),
                initial,
                after_restart: None,
            };
        }

        info!(
            "Service {} not running ({}), attempting restart via {}",
            service,
            initial.report(),
            self.controller.backend_name()
        );

        if let Err(e) = self.controller.start(service).await {
            debug!("Start command for {} failed: {}", service, e);
        }

        let after = self.status(service).await;
        if after.is_running() {
            info!("Service {} restarted", service);
        } else {
            warn!("Service {} still not running after restart", service);
        }

        ServiceHealth {
            name: service.to_string(),
            initial,
            after_restart: Some(after),
        }
    }

    /// Check every service concurrently.
    ///
    /// Results are returned in the same order as `services`.
    pub async fn check_all<S: AsRef<str>>(&self, services: &[S]) -> Vec<ServiceHealth> {
        join_all(services.iter().map(|s| self.check(s.as_ref()))).await
    }
}
