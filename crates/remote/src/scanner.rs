//! Scan orchestration
//!
//! Runs every registered enumerator on a worker pool, isolating failures per
//! resource type: access-denied failures become alerts and the type is left
//! out, anything else aborts the whole scan with no partial inventory.

use crate::alerts::{Alert, Alerter};
use crate::enumerator::{DetailsFetcher, Enumerator};
use crate::error::{Result, ScanError};
use crate::library::RemoteLibrary;
use rayon::prelude::*;
use resource::{Filter, Resource, ResourceType, Supplier};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Hydrate resources through registered details fetchers
    pub deep: bool,
    /// Enumerators run concurrently
    pub jobs: usize,
    /// Bound on the whole scan, `None` to wait indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            deep: false,
            jobs: 4,
            timeout: None,
        }
    }
}

/// Produces the observed inventory from a [`RemoteLibrary`].
#[derive(Clone)]
pub struct Scanner {
    library: Arc<RemoteLibrary>,
    alerter: Arc<dyn Alerter>,
    options: ScannerOptions,
    filter: Arc<dyn Filter>,
}

impl Scanner {
    pub fn new(
        library: RemoteLibrary,
        alerter: Arc<dyn Alerter>,
        options: ScannerOptions,
        filter: Arc<dyn Filter>,
    ) -> Self {
        Self {
            library: Arc::new(library),
            alerter,
            options,
            filter,
        }
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Enumerate, filter and optionally hydrate every registered type.
    ///
    /// The result is grouped by resource type, in type order.
    pub fn resources(&self) -> Result<Vec<Resource>> {
        match self.options.timeout {
            Some(timeout) => self.scan_with_timeout(timeout),
            None => self.scan(&AtomicBool::new(false)),
        }
    }

    fn scan_with_timeout(&self, timeout: Duration) -> Result<Vec<Resource>> {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let scanner = self.clone();
        let flag = Arc::clone(&cancel);
        thread::Builder::new()
            .name("scanner".to_string())
            .spawn(move || {
                // The receiver is gone when the caller already timed out
                let _ = tx.send(scanner.scan(&flag));
            })
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                cancel.store(true, Ordering::SeqCst);
                log::error!("scan timed out after {}s", timeout.as_secs());
                Err(ScanError::Timeout(timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ScanError::Aborted),
        }
    }

    fn scan(&self, cancel: &AtomicBool) -> Result<Vec<Resource>> {
        let enumerators: Vec<&Arc<dyn Enumerator>> = self.library.enumerators().collect();
        log::debug!(
            "scanning {} resource types with {} jobs",
            enumerators.len(),
            self.options.jobs
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.max(1))
            .build()
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let per_type = pool.install(|| {
            enumerators
                .par_iter()
                .map(|enumerator| {
                    if cancel.load(Ordering::SeqCst) {
                        return Ok(Vec::new());
                    }
                    let result = self.scan_type(enumerator.as_ref(), cancel);
                    if result.is_err() {
                        cancel.store(true, Ordering::SeqCst);
                    }
                    result
                })
                .collect::<Result<Vec<Vec<Resource>>>>()
        })?;

        Ok(per_type.into_iter().flatten().collect())
    }

    fn scan_type(&self, enumerator: &dyn Enumerator, cancel: &AtomicBool) -> Result<Vec<Resource>> {
        let ty = enumerator.supported_type();

        let resources = match enumerator.enumerate() {
            Ok(resources) => resources,
            Err(err) if err.is_access_denied() => {
                self.alerter.send_alert(err.resource_type(), Alert::access_denied(&err));
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        log::debug!("enumerated {} {ty}", resources.len());

        let mut ignored_types: HashMap<ResourceType, bool> = HashMap::new();
        let kept: Vec<Resource> = resources
            .into_iter()
            .filter(|res| {
                let ignored = *ignored_types
                    .entry(res.resource_type().clone())
                    .or_insert_with(|| self.filter.is_type_ignored(res.resource_type()));
                !ignored && !self.filter.is_resource_ignored(res)
            })
            .collect();

        if !self.options.deep {
            return Ok(kept);
        }
        match self.library.get_details_fetcher(&ty) {
            Some(fetcher) => self.hydrate(&ty, fetcher.as_ref(), kept, cancel),
            None => {
                if kept.first().and_then(Resource::schema).is_some_and(|s| s.is_deep_mode()) {
                    log::debug!("{ty} needs deep mode but has no details fetcher");
                }
                Ok(kept)
            }
        }
    }

    fn hydrate(
        &self,
        ty: &ResourceType,
        fetcher: &dyn DetailsFetcher,
        resources: Vec<Resource>,
        cancel: &AtomicBool,
    ) -> Result<Vec<Resource>> {
        let mut hydrated = Vec::with_capacity(resources.len());
        for resource in resources {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            let id = resource.resource_id().to_string();
            match fetcher.read_details(resource) {
                Ok(Some(resource)) => hydrated.push(resource),
                Ok(None) => {}
                Err(err) if err.is_access_denied() => {
                    if let crate::error::DetailsError::Read { source, .. } = &err {
                        self.alerter
                            .send_alert(ty, Alert::details_access_denied(ty, &id, source));
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(hydrated)
    }
}

impl Supplier for Scanner {
    type Error = ScanError;

    fn resources(&self) -> Result<Vec<Resource>> {
        Scanner::resources(self)
    }
}
