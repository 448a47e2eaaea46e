//! API Gateway and Application Auto Scaling enumerators

use super::repository::{ApiGatewayRepository, AppAutoScalingRepository};
use crate::enumerator::Enumerator;
use crate::error::EnumerationError;
use resource::aws::{
    AWS_API_GATEWAY_AUTHORIZER, AWS_API_GATEWAY_DOMAIN_NAME, AWS_API_GATEWAY_RESOURCE,
    AWS_API_GATEWAY_REST_API, AWS_APPAUTOSCALING_TARGET,
};
use resource::{Attributes, Resource, ResourceFactory, ResourceType};
use std::sync::Arc;

pub struct ApiGatewayRestApiEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayRestApiEnumerator {
    pub fn new(repository: Arc<dyn ApiGatewayRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

impl Enumerator for ApiGatewayRestApiEnumerator {
    fn supported_type(&self) -> ResourceType {
        AWS_API_GATEWAY_REST_API.into()
    }

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
        let apis = self
            .repository
            .list_all_rest_apis()
            .map_err(|e| EnumerationError::listing(self.supported_type(), e))?;

        Ok(apis
            .iter()
            .map(|api| {
                self.factory
                    .create_abstract_resource(AWS_API_GATEWAY_REST_API, &api.id, Attributes::new())
            })
            .collect())
    }
}

pub struct ApiGatewayResourceEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayResourceEnumerator {
    pub fn new(repository: Arc<dyn ApiGatewayRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

impl Enumerator for ApiGatewayResourceEnumerator {
    fn supported_type(&self) -> ResourceType {
        AWS_API_GATEWAY_RESOURCE.into()
    }

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
        let apis = self.repository.list_all_rest_apis().map_err(|e| {
            EnumerationError::listing_with_type(self.supported_type(), AWS_API_GATEWAY_REST_API, e)
        })?;
        let resources = self
            .repository
            .list_all_rest_api_resources(&apis)
            .map_err(|e| EnumerationError::listing(self.supported_type(), e))?;

        Ok(resources
            .into_iter()
            .map(|item| {
                let mut attrs = Attributes::new();
                attrs.insert("rest_api_id", item.rest_api_id);
                attrs.insert("path", item.path);
                self.factory
                    .create_abstract_resource(AWS_API_GATEWAY_RESOURCE, &item.id, attrs)
            })
            .collect())
    }
}

pub struct ApiGatewayAuthorizerEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayAuthorizerEnumerator {
    pub fn new(repository: Arc<dyn ApiGatewayRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

impl Enumerator for ApiGatewayAuthorizerEnumerator {
    fn supported_type(&self) -> ResourceType {
        AWS_API_GATEWAY_AUTHORIZER.into()
    }

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
        let apis = self.repository.list_all_rest_apis().map_err(|e| {
            EnumerationError::listing_with_type(self.supported_type(), AWS_API_GATEWAY_REST_API, e)
        })?;
        let authorizers = self
            .repository
            .list_all_rest_api_authorizers(&apis)
            .map_err(|e| EnumerationError::listing(self.supported_type(), e))?;

        Ok(authorizers
            .iter()
            .map(|authorizer| {
                self.factory.create_abstract_resource(
                    AWS_API_GATEWAY_AUTHORIZER,
                    &authorizer.id,
                    Attributes::new(),
                )
            })
            .collect())
    }
}

pub struct ApiGatewayDomainNameEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayDomainNameEnumerator {
    pub fn new(repository: Arc<dyn ApiGatewayRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

impl Enumerator for ApiGatewayDomainNameEnumerator {
    fn supported_type(&self) -> ResourceType {
        AWS_API_GATEWAY_DOMAIN_NAME.into()
    }

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
        let domains = self
            .repository
            .list_all_domain_names()
            .map_err(|e| EnumerationError::listing(self.supported_type(), e))?;

        Ok(domains
            .iter()
            .map(|domain| {
                self.factory.create_abstract_resource(
                    AWS_API_GATEWAY_DOMAIN_NAME,
                    &domain.domain_name,
                    Attributes::new(),
                )
            })
            .collect())
    }
}

pub struct AppAutoScalingTargetEnumerator {
    repository: Arc<dyn AppAutoScalingRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl AppAutoScalingTargetEnumerator {
    pub fn new(repository: Arc<dyn AppAutoScalingRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { repository, factory }
    }
}

impl Enumerator for AppAutoScalingTargetEnumerator {
    fn supported_type(&self) -> ResourceType {
        AWS_APPAUTOSCALING_TARGET.into()
    }

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError> {
        let mut results = Vec::new();
        for namespace in self.repository.service_namespace_values() {
            let targets = self
                .repository
                .describe_scalable_targets(namespace)
                .map_err(|e| EnumerationError::listing(self.supported_type(), e))?;

            for target in targets.iter() {
                let mut attrs = Attributes::new();
                attrs.insert("service_namespace", target.service_namespace.clone());
                attrs.insert("scalable_dimension", target.scalable_dimension.clone());
                results.push(self.factory.create_abstract_resource(
                    AWS_APPAUTOSCALING_TARGET,
                    &target.resource_id,
                    attrs,
                ));
            }
        }
        Ok(results)
    }
}
