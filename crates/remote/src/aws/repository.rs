//! Cached AWS repositories
//!
//! Every listing drains pagination, then stores the whole result in the
//! shared cache under `<operation>[_<scope>]`. Per-API listings are keyed
//! by API id so distinct parents never collide.

use super::client::{
    ApiGatewayClient, ApiResource, AppAutoScalingClient, Authorizer, DomainName, RestApi,
    SERVICE_NAMESPACES, ScalableTarget,
};
use crate::error::{ApiError, Provider};
use crate::pager::{Page, drain_pages};
use scancache::Memoizer;
use std::sync::Arc;

fn drain_listing<T>(
    fetch: impl FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
) -> Result<Vec<T>, ApiError> {
    drain_pages(fetch, |token| ApiError::pagination_loop(Provider::Aws, token))
}

pub trait ApiGatewayRepository: Send + Sync {
    fn list_all_rest_apis(&self) -> Result<Arc<Vec<RestApi>>, ApiError>;
    fn list_all_rest_api_resources(&self, apis: &[RestApi]) -> Result<Vec<ApiResource>, ApiError>;
    fn list_all_rest_api_authorizers(&self, apis: &[RestApi]) -> Result<Vec<Authorizer>, ApiError>;
    fn list_all_domain_names(&self) -> Result<Arc<Vec<DomainName>>, ApiError>;
}

pub trait AppAutoScalingRepository: Send + Sync {
    fn service_namespace_values(&self) -> &[&'static str];
    fn describe_scalable_targets(&self, namespace: &str) -> Result<Arc<Vec<ScalableTarget>>, ApiError>;
}

pub struct CachedApiGatewayRepository {
    client: Arc<dyn ApiGatewayClient>,
    memo: Arc<Memoizer>,
}

impl CachedApiGatewayRepository {
    pub fn new(client: Arc<dyn ApiGatewayClient>, memo: Arc<Memoizer>) -> Self {
        Self { client, memo }
    }
}

impl ApiGatewayRepository for CachedApiGatewayRepository {
    fn list_all_rest_apis(&self) -> Result<Arc<Vec<RestApi>>, ApiError> {
        self.memo.get_or_try_insert_with("apigatewayListAllRestApis", || {
            drain_listing(|position| self.client.get_rest_apis(position))
        })
    }

    fn list_all_rest_api_resources(&self, apis: &[RestApi]) -> Result<Vec<ApiResource>, ApiError> {
        let mut resources = Vec::new();
        for api in apis {
            let key = format!("apigatewayListAllRestApiResources_api_{}", api.id);
            let listed = self.memo.get_or_try_insert_with(&key, || {
                drain_listing(|position| self.client.get_resources(&api.id, position)).map(|items| {
                    items
                        .into_iter()
                        .map(|item| ApiResource {
                            rest_api_id: api.id.clone(),
                            ..item
                        })
                        .collect::<Vec<_>>()
                })
            })?;
            resources.extend(listed.iter().cloned());
        }
        Ok(resources)
    }

    fn list_all_rest_api_authorizers(&self, apis: &[RestApi]) -> Result<Vec<Authorizer>, ApiError> {
        let mut authorizers = Vec::new();
        for api in apis {
            let key = format!("apigatewayListAllRestApiAuthorizers_api_{}", api.id);
            let listed = self.memo.get_or_try_insert_with(&key, || {
                drain_listing(|position| self.client.get_authorizers(&api.id, position)).map(|items| {
                    items
                        .into_iter()
                        .map(|item| Authorizer {
                            rest_api_id: api.id.clone(),
                            ..item
                        })
                        .collect::<Vec<_>>()
                })
            })?;
            authorizers.extend(listed.iter().cloned());
        }
        Ok(authorizers)
    }

    fn list_all_domain_names(&self) -> Result<Arc<Vec<DomainName>>, ApiError> {
        self.memo.get_or_try_insert_with("apigatewayListAllDomainNames", || {
            drain_listing(|position| self.client.get_domain_names(position))
        })
    }
}

pub struct CachedAppAutoScalingRepository {
    client: Arc<dyn AppAutoScalingClient>,
    memo: Arc<Memoizer>,
}

impl CachedAppAutoScalingRepository {
    pub fn new(client: Arc<dyn AppAutoScalingClient>, memo: Arc<Memoizer>) -> Self {
        Self { client, memo }
    }
}

impl AppAutoScalingRepository for CachedAppAutoScalingRepository {
    fn service_namespace_values(&self) -> &[&'static str] {
        SERVICE_NAMESPACES
    }

    fn describe_scalable_targets(&self, namespace: &str) -> Result<Arc<Vec<ScalableTarget>>, ApiError> {
        let key = format!("appAutoScalingDescribeScalableTargets_{namespace}");
        self.memo.get_or_try_insert_with(&key, || {
            drain_listing(|token| self.client.describe_scalable_targets(namespace, token))
        })
    }
}
