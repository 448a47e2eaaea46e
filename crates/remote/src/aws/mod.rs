//! AWS reference integration
//!
//! API Gateway and Application Auto Scaling repositories and enumerators,
//! wired into a [`RemoteLibrary`] by [`init`].

pub mod client;
pub mod enumerators;
pub mod replay;
pub mod repository;

use crate::enumerator::{GenericDetailsFetcher, ResourceReader};
use crate::error::LibraryError;
use crate::library::RemoteLibrary;
use client::{ApiGatewayClient, AppAutoScalingClient};
use enumerators::{
    ApiGatewayAuthorizerEnumerator, ApiGatewayDomainNameEnumerator, ApiGatewayResourceEnumerator,
    ApiGatewayRestApiEnumerator, AppAutoScalingTargetEnumerator,
};
use repository::{
    ApiGatewayRepository, AppAutoScalingRepository, CachedApiGatewayRepository,
    CachedAppAutoScalingRepository,
};
use resource::{Deserializer, ResourceFactory};
use scancache::{Cache, Memoizer};
use std::sync::Arc;

/// SDK clients and provider reader for one AWS account.
pub struct AwsClients {
    pub api_gateway: Arc<dyn ApiGatewayClient>,
    pub app_autoscaling: Arc<dyn AppAutoScalingClient>,
    /// Used for deep-mode details fetching when present
    pub reader: Option<Arc<dyn ResourceReader>>,
}

/// Register every AWS enumerator (and details fetcher, given a reader).
pub fn init(
    library: &mut RemoteLibrary,
    clients: AwsClients,
    cache: Arc<dyn Cache>,
    factory: Arc<dyn ResourceFactory>,
) -> Result<(), LibraryError> {
    let memo = Arc::new(Memoizer::new(cache));
    let api_gateway: Arc<dyn ApiGatewayRepository> = Arc::new(CachedApiGatewayRepository::new(
        clients.api_gateway,
        Arc::clone(&memo),
    ));
    let app_autoscaling: Arc<dyn AppAutoScalingRepository> = Arc::new(
        CachedAppAutoScalingRepository::new(clients.app_autoscaling, memo),
    );

    library.add_enumerator(ApiGatewayRestApiEnumerator::new(
        Arc::clone(&api_gateway),
        Arc::clone(&factory),
    ))?;
    library.add_enumerator(ApiGatewayResourceEnumerator::new(
        Arc::clone(&api_gateway),
        Arc::clone(&factory),
    ))?;
    library.add_enumerator(ApiGatewayAuthorizerEnumerator::new(
        Arc::clone(&api_gateway),
        Arc::clone(&factory),
    ))?;
    library.add_enumerator(ApiGatewayDomainNameEnumerator::new(
        api_gateway,
        Arc::clone(&factory),
    ))?;
    library.add_enumerator(AppAutoScalingTargetEnumerator::new(
        app_autoscaling,
        Arc::clone(&factory),
    ))?;

    if let Some(reader) = clients.reader {
        let deserializer = Deserializer::new(factory);
        let types: Vec<_> = library.supported_types().cloned().collect();
        for ty in types {
            library.add_details_fetcher(
                ty.clone(),
                GenericDetailsFetcher::new(ty, Arc::clone(&reader), deserializer.clone()),
            )?;
        }
    }

    Ok(())
}
