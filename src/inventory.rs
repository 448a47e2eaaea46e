//! Declared and observed inventories, collected side by side

use anyhow::{Context, Result};
use resource::{Resource, ResourceType, Supplier};
use std::collections::BTreeMap;

/// Both resource sets of one run.
#[derive(Debug, Default)]
pub struct Inventory {
    /// From the state document
    pub declared: Vec<Resource>,
    /// From the cloud scan
    pub observed: Vec<Resource>,
}

impl Inventory {
    /// Run both suppliers concurrently. Either failure fails the whole run.
    pub fn collect<D, O>(declared: &D, observed: &O) -> Result<Self>
    where
        D: Supplier,
        O: Supplier,
    {
        let (declared, observed) = rayon::join(|| declared.resources(), || observed.resources());
        Ok(Self {
            declared: declared.context("Failed to read state")?,
            observed: observed.context("Failed to scan cloud resources")?,
        })
    }

    /// Declared and observed counts for every type present in either set.
    pub fn type_counts(&self) -> BTreeMap<ResourceType, (usize, usize)> {
        let mut counts: BTreeMap<ResourceType, (usize, usize)> = BTreeMap::new();
        for res in &self.declared {
            counts.entry(res.resource_type().clone()).or_default().0 += 1;
        }
        for res in &self.observed {
            counts.entry(res.resource_type().clone()).or_default().1 += 1;
        }
        counts
    }
}
