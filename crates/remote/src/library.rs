//! Registry of enumerators and details fetchers

use crate::enumerator::{DetailsFetcher, Enumerator};
use crate::error::LibraryError;
use resource::ResourceType;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps resource types to their enumerator and optional details fetcher.
///
/// Iteration follows resource type order, so scans are reproducible.
#[derive(Default)]
pub struct RemoteLibrary {
    enumerators: BTreeMap<ResourceType, Arc<dyn Enumerator>>,
    fetchers: BTreeMap<ResourceType, Arc<dyn DetailsFetcher>>,
}

impl RemoteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumerator under its supported type.
    pub fn add_enumerator<E: Enumerator + 'static>(&mut self, enumerator: E) -> Result<(), LibraryError> {
        let ty = enumerator.supported_type();
        if self.enumerators.contains_key(&ty) {
            return Err(LibraryError::DuplicateEnumerator(ty));
        }
        log::trace!("registered enumerator for {ty}");
        self.enumerators.insert(ty, Arc::new(enumerator));
        Ok(())
    }

    pub fn add_details_fetcher<F: DetailsFetcher + 'static>(
        &mut self,
        ty: impl Into<ResourceType>,
        fetcher: F,
    ) -> Result<(), LibraryError> {
        let ty = ty.into();
        if self.fetchers.contains_key(&ty) {
            return Err(LibraryError::DuplicateDetailsFetcher(ty));
        }
        self.fetchers.insert(ty, Arc::new(fetcher));
        Ok(())
    }

    pub fn enumerators(&self) -> impl Iterator<Item = &Arc<dyn Enumerator>> {
        self.enumerators.values()
    }

    pub fn get_enumerator(&self, ty: &ResourceType) -> Option<&Arc<dyn Enumerator>> {
        self.enumerators.get(ty)
    }

    pub fn get_details_fetcher(&self, ty: &ResourceType) -> Option<&Arc<dyn DetailsFetcher>> {
        self.fetchers.get(ty)
    }

    /// Registered types, sorted.
    pub fn supported_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.enumerators.keys()
    }

    pub fn len(&self) -> usize {
        self.enumerators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enumerators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DetailsError, EnumerationError};
    use resource::Resource;

    struct Named(&'static str);

    impl Enumerator for Named {
        fn supported_type(&self) -> ResourceType {
            self.0.into()
        }

        fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
            Ok(Vec::new())
        }
    }

    struct Passthrough;

    impl DetailsFetcher for Passthrough {
        fn read_details(&self, resource: Resource) -> Result<Option<Resource>, DetailsError> {
            Ok(Some(resource))
        }
    }

    #[test]
    fn test_lookup_by_type() {
        let mut library = RemoteLibrary::new();
        library.add_enumerator(Named("aws_s3_bucket")).unwrap();

        assert!(library.get_enumerator(&"aws_s3_bucket".into()).is_some());
        assert!(library.get_enumerator(&"aws_route".into()).is_none());
        assert!(library.get_details_fetcher(&"aws_s3_bucket".into()).is_none());
    }

    #[test]
    fn test_duplicate_enumerator_is_rejected() {
        let mut library = RemoteLibrary::new();
        library.add_enumerator(Named("aws_s3_bucket")).unwrap();

        let err = library.add_enumerator(Named("aws_s3_bucket")).unwrap_err();
        assert_eq!(err, LibraryError::DuplicateEnumerator("aws_s3_bucket".into()));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_duplicate_fetcher_is_rejected() {
        let mut library = RemoteLibrary::new();
        library.add_details_fetcher("aws_route", Passthrough).unwrap();
        assert!(library.add_details_fetcher("aws_route", Passthrough).is_err());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut library = RemoteLibrary::new();
        for ty in ["google_compute_health_check", "aws_route", "azurerm_resource_group"] {
            library.add_enumerator(Named(ty)).unwrap();
        }

        let types: Vec<_> = library.enumerators().map(|e| e.supported_type()).collect();
        assert_eq!(
            types,
            vec![
                ResourceType::new("aws_route"),
                ResourceType::new("azurerm_resource_group"),
                ResourceType::new("google_compute_health_check"),
            ]
        );
    }
}
