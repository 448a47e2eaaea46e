//! AWS API surfaces used by the reference repositories
//!
//! These traits are the seam between repositories and an SDK client. Each
//! method is one page of one API call.

use crate::error::ApiError;
use crate::pager::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApi {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    pub id: String,
    /// Filled in by the repository from the parent API
    #[serde(default)]
    pub rest_api_id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorizer {
    pub id: String,
    /// Filled in by the repository from the parent API
    #[serde(default)]
    pub rest_api_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainName {
    pub domain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalableTarget {
    pub resource_id: String,
    pub service_namespace: String,
    pub scalable_dimension: String,
    #[serde(default)]
    pub min_capacity: i64,
    #[serde(default)]
    pub max_capacity: i64,
}

/// Service namespaces accepted by `DescribeScalableTargets`.
pub const SERVICE_NAMESPACES: &[&str] = &[
    "ecs",
    "elasticmapreduce",
    "ec2",
    "appstream",
    "dynamodb",
    "rds",
    "sagemaker",
    "custom-resource",
    "comprehend",
    "lambda",
    "cassandra",
    "kafka",
];

/// API Gateway (REST) read calls.
pub trait ApiGatewayClient: Send + Sync {
    fn get_rest_apis(&self, position: Option<&str>) -> Result<Page<RestApi>, ApiError>;

    fn get_resources(
        &self,
        rest_api_id: &str,
        position: Option<&str>,
    ) -> Result<Page<ApiResource>, ApiError>;

    fn get_authorizers(
        &self,
        rest_api_id: &str,
        position: Option<&str>,
    ) -> Result<Page<Authorizer>, ApiError>;

    fn get_domain_names(&self, position: Option<&str>) -> Result<Page<DomainName>, ApiError>;
}

/// Application Auto Scaling read calls.
pub trait AppAutoScalingClient: Send + Sync {
    fn describe_scalable_targets(
        &self,
        namespace: &str,
        next_token: Option<&str>,
    ) -> Result<Page<ScalableTarget>, ApiError>;
}
