//! Collaborator traits
//!
//! These traits let state readers and scanners stay independent of how
//! filtering, progress reporting or result consumption are implemented.

use crate::resource::Resource;
use crate::types::ResourceType;

/// Decides which resources are excluded from both inventories.
pub trait Filter: Send + Sync {
    /// Whether every resource of `ty` is ignored.
    fn is_type_ignored(&self, ty: &ResourceType) -> bool;

    /// Whether a single resource of a non-ignored type is ignored.
    fn is_resource_ignored(&self, _resource: &Resource) -> bool {
        false
    }
}

/// Filter that keeps everything
pub struct NoFilter;

impl Filter for NoFilter {
    fn is_type_ignored(&self, _ty: &ResourceType) -> bool {
        false
    }
}

/// Progress reporting. Observability only.
pub trait Progress: Send + Sync {
    /// One more resource processed
    fn inc(&self);

    /// Processing is over, successfully or not
    fn stop(&self);
}

/// No-op progress
pub struct NoProgress;

impl Progress for NoProgress {
    fn inc(&self) {}
    fn stop(&self) {}
}

/// Produces one resource inventory.
pub trait Supplier: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn resources(&self) -> Result<Vec<Resource>, Self::Error>;
}
