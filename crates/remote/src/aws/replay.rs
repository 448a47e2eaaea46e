//! Replays recorded AWS responses
//!
//! A recording is a JSON document with the items each call returns, an
//! optional page size, per-resource details for deep mode, and injected
//! errors keyed by operation (`GetAuthorizers`) or operation and scope
//! (`GetAuthorizers:3of73v5ob4`).

use super::client::{
    ApiGatewayClient, ApiResource, AppAutoScalingClient, Authorizer, DomainName, RestApi,
    ScalableTarget,
};
use crate::enumerator::{ReadResourceArgs, ResourceReader};
use crate::error::{ApiError, Provider};
use crate::pager::Page;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Deserialize)]
struct RecordedError {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    code: Option<String>,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Recording {
    #[serde(default)]
    page_size: Option<usize>,
    #[serde(default)]
    rest_apis: Vec<RestApi>,
    #[serde(default)]
    rest_api_resources: BTreeMap<String, Vec<ApiResource>>,
    #[serde(default)]
    authorizers: BTreeMap<String, Vec<Authorizer>>,
    #[serde(default)]
    domain_names: Vec<DomainName>,
    #[serde(default)]
    scalable_targets: BTreeMap<String, Vec<ScalableTarget>>,
    /// type -> id -> attributes
    #[serde(default)]
    details: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    errors: BTreeMap<String, RecordedError>,
}

/// AWS client answering from a recording.
#[derive(Debug)]
pub struct ReplayClient {
    recording: Recording,
    calls: Mutex<BTreeMap<String, u32>>,
}

impl ReplayClient {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            recording: serde_json::from_str(json)?,
            calls: Mutex::new(BTreeMap::new()),
        })
    }

    /// Number of requests made for an operation, pages included.
    pub fn calls(&self, operation: &str) -> u32 {
        self.lock().get(operation).copied().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, u32>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request(&self, operation: &str, scope: Option<&str>) -> Result<(), ApiError> {
        *self.lock().entry(operation.to_string()).or_default() += 1;

        let scoped = scope.and_then(|s| self.recording.errors.get(&format!("{operation}:{s}")));
        match scoped.or_else(|| self.recording.errors.get(operation)) {
            Some(recorded) => {
                let mut err = ApiError::new(Provider::Aws, recorded.message.clone());
                err.status = recorded.status;
                err.code = recorded.code.clone();
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn page<T: Clone>(&self, items: &[T], position: Option<&str>) -> Result<Page<T>, ApiError> {
        let start: usize = match position {
            None => 0,
            Some(token) => token.parse().map_err(|_| {
                ApiError::new(Provider::Aws, format!("invalid pagination token {token}"))
                    .with_code("BadRequestException")
                    .with_status(400)
            })?,
        };
        let size = self.recording.page_size.unwrap_or(usize::MAX).max(1);
        let end = start.saturating_add(size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();

        Ok(if end < items.len() {
            Page::with_next(slice, end.to_string())
        } else {
            Page::last(slice)
        })
    }
}

impl ApiGatewayClient for ReplayClient {
    fn get_rest_apis(&self, position: Option<&str>) -> Result<Page<RestApi>, ApiError> {
        self.request("GetRestApis", None)?;
        self.page(&self.recording.rest_apis, position)
    }

    fn get_resources(&self, rest_api_id: &str, position: Option<&str>) -> Result<Page<ApiResource>, ApiError> {
        self.request("GetResources", Some(rest_api_id))?;
        let items = self.recording.rest_api_resources.get(rest_api_id);
        self.page(items.map_or(&[][..], Vec::as_slice), position)
    }

    fn get_authorizers(&self, rest_api_id: &str, position: Option<&str>) -> Result<Page<Authorizer>, ApiError> {
        self.request("GetAuthorizers", Some(rest_api_id))?;
        let items = self.recording.authorizers.get(rest_api_id);
        self.page(items.map_or(&[][..], Vec::as_slice), position)
    }

    fn get_domain_names(&self, position: Option<&str>) -> Result<Page<DomainName>, ApiError> {
        self.request("GetDomainNames", None)?;
        self.page(&self.recording.domain_names, position)
    }
}

impl AppAutoScalingClient for ReplayClient {
    fn describe_scalable_targets(
        &self,
        namespace: &str,
        next_token: Option<&str>,
    ) -> Result<Page<ScalableTarget>, ApiError> {
        self.request("DescribeScalableTargets", Some(namespace))?;
        let items = self.recording.scalable_targets.get(namespace);
        self.page(items.map_or(&[][..], Vec::as_slice), next_token)
    }
}

impl ResourceReader for ReplayClient {
    fn read_resource(&self, args: ReadResourceArgs<'_>) -> Result<Option<Value>, ApiError> {
        self.request("ReadResource", Some(args.ty.as_str()))?;
        Ok(self
            .recording
            .details
            .get(args.ty.as_str())
            .and_then(|by_id| by_id.get(args.id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging() {
        let client = ReplayClient::from_json(
            r#"{"page_size": 2, "domain_names": [
                {"domain_name": "a.example.com"},
                {"domain_name": "b.example.com"},
                {"domain_name": "c.example.com"}
            ]}"#,
        )
        .unwrap();

        let first = client.get_domain_names(None).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = client.get_domain_names(Some("2")).unwrap();
        assert_eq!(second.items[0].domain_name, "c.example.com");
        assert!(second.next_token.is_none());
        assert_eq!(client.calls("GetDomainNames"), 2);
    }

    #[test]
    fn test_scoped_error() {
        let client = ReplayClient::from_json(
            r#"{"errors": {"GetAuthorizers:bad": {"status": 403, "code": "AccessDeniedException", "message": "denied"}}}"#,
        )
        .unwrap();

        assert!(client.get_authorizers("good", None).unwrap().items.is_empty());
        let err = client.get_authorizers("bad", None).unwrap_err();
        assert!(err.is_access_denied());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(ReplayClient::from_json(r#"{"restapis": []}"#).is_err());
    }

    #[test]
    fn test_read_resource() {
        let client = ReplayClient::from_json(
            r#"{"details": {"aws_api_gateway_rest_api": {"3of73v5ob4": {"name": "api"}}}}"#,
        )
        .unwrap();
        let ty = "aws_api_gateway_rest_api".into();

        let found = client
            .read_resource(ReadResourceArgs {
                ty: &ty,
                id: "3of73v5ob4",
                attributes: BTreeMap::new(),
            })
            .unwrap();
        assert_eq!(found.unwrap()["name"], "api");

        let missing = client
            .read_resource(ReadResourceArgs {
                ty: &ty,
                id: "1jitcobwol",
                attributes: BTreeMap::new(),
            })
            .unwrap();
        assert!(missing.is_none());
    }
}
