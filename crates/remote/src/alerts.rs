//! Recoverable scan failures
//!
//! An [`Alert`] records why a resource type (or a single resource) was left
//! out of the inventory. Rendering alerts is up to the [`Alerter`].

use crate::error::{ApiError, EnumerationError, Provider};
use resource::ResourceType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Scan phase an alert was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Enumeration,
    DetailsFetching,
}

/// Structured description of a recoverable failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Type left out of the inventory
    pub resource_type: ResourceType,
    /// Type whose listing was forbidden (a dependency, or the type itself)
    pub listed_type: ResourceType,
    /// Set when a single resource was skipped during details fetching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub phase: Phase,
    pub provider: Provider,
    pub cause: ApiError,
}

impl Alert {
    /// Alert for an enumeration refused by the provider.
    pub fn access_denied(err: &EnumerationError) -> Self {
        Self {
            resource_type: err.resource_type().clone(),
            listed_type: err.listed_type().clone(),
            resource_id: None,
            phase: Phase::Enumeration,
            provider: err.cause().provider,
            cause: err.cause().clone(),
        }
    }

    /// Alert for a details read refused by the provider.
    pub fn details_access_denied(ty: &ResourceType, id: &str, cause: &ApiError) -> Self {
        Self {
            resource_type: ty.clone(),
            listed_type: ty.clone(),
            resource_id: Some(id.to_string()),
            phase: Phase::DetailsFetching,
            provider: cause.provider,
            cause: cause.clone(),
        }
    }

    pub fn message(&self) -> String {
        match self.phase {
            Phase::Enumeration => format!(
                "Ignoring {} from drift calculation: Listing {} is forbidden: {}",
                self.resource_type, self.listed_type, self.cause
            ),
            Phase::DetailsFetching => format!(
                "Ignoring {}.{} from drift calculation: Reading details of {} is forbidden: {}",
                self.resource_type,
                self.resource_id.as_deref().unwrap_or_default(),
                self.listed_type,
                self.cause
            ),
        }
    }

    /// What the user can do about it.
    pub fn remediation(&self) -> String {
        format!(
            "It seems that we got access denied errors while reading {} resources.\n\
             The minimal read-only permissions needed for a scan are documented here, \
             please update yours: {}",
            self.provider,
            self.provider.policy_url()
        )
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Consumer of scan alerts.
///
/// Called concurrently from scan workers; implementations serialize
/// internally.
pub trait Alerter: Send + Sync {
    fn send_alert(&self, ty: &ResourceType, alert: Alert);
}

/// Alerter that keeps every alert, grouped by resource type.
#[derive(Debug, Default)]
pub struct AlertCollector {
    alerts: Mutex<BTreeMap<ResourceType, Vec<Alert>>>,
}

impl AlertCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of collected alerts.
    pub fn alerts(&self) -> BTreeMap<ResourceType, Vec<Alert>> {
        self.lock().clone()
    }

    /// Alerts raised for one type.
    pub fn alerts_for(&self, ty: &str) -> Vec<Alert> {
        self.lock()
            .get(&ResourceType::new(ty))
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of alerts.
    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ResourceType, Vec<Alert>>> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Alerter for AlertCollector {
    fn send_alert(&self, ty: &ResourceType, alert: Alert) {
        log::warn!("{alert}");
        self.lock().entry(ty.clone()).or_default().push(alert);
    }
}
