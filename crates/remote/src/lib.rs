//! # Remote
//!
//! Builds the observed inventory of a cloud account.
//!
//! Each resource type has one [`Enumerator`] that lists its live resources
//! through a cached repository. The [`Scanner`] runs every registered
//! enumerator concurrently and isolates failures per type: missing
//! permissions produce an [`Alert`] and the type is skipped, any other
//! error aborts the scan.
//!
//! ## Core Concepts
//!
//! - **Enumerator / DetailsFetcher**: list a type, optionally hydrate it
//! - **RemoteLibrary**: type-keyed registry of enumerators and fetchers
//! - **Scanner**: worker pool, filtering, deep mode, timeout
//! - **Alerter**: sink for access-denied warnings
//!
//! ## Example
//!
//! ```
//! use remote::aws::{self, AwsClients, replay::ReplayClient};
//! use remote::{AlertCollector, RemoteLibrary, Scanner, ScannerOptions};
//! use resource::{NoFilter, SchemaRepository, SchemaResourceFactory};
//! use scancache::MemoryCache;
//! use std::sync::Arc;
//!
//! let mut schemas = SchemaRepository::new();
//! resource::aws::init(&mut schemas, resource::aws::DEFAULT_VERSION, None)?;
//! let factory = Arc::new(SchemaResourceFactory::new(Arc::new(schemas)));
//!
//! let client = Arc::new(ReplayClient::from_json(r#"{"rest_apis": [{"id": "3of73v5ob4"}]}"#)?);
//! let mut library = RemoteLibrary::new();
//! aws::init(
//!     &mut library,
//!     AwsClients { api_gateway: client.clone(), app_autoscaling: client, reader: None },
//!     Arc::new(MemoryCache::unbounded()),
//!     factory,
//! )?;
//!
//! let alerts = Arc::new(AlertCollector::new());
//! let scanner = Scanner::new(library, alerts, ScannerOptions::default(), Arc::new(NoFilter));
//! let resources = scanner.resources()?;
//! assert_eq!(resources[0].resource_id(), "3of73v5ob4");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alerts;
pub mod aws;
pub mod enumerator;
pub mod error;
pub mod library;
pub mod pager;
pub mod scanner;

pub use alerts::{Alert, AlertCollector, Alerter, Phase};
pub use enumerator::{DetailsFetcher, Enumerator, GenericDetailsFetcher, ReadResourceArgs, ResourceReader};
pub use error::{
    ApiError, DetailsError, EnumerationError, LibraryError, Provider, Result, ScanError,
};
pub use library::RemoteLibrary;
pub use scanner::{Scanner, ScannerOptions};
