//! Error taxonomy for cloud scanning.
//!
//! Raw API failures ([`ApiError`]) are wrapped by enumerators into
//! [`EnumerationError`]s naming the failing type. The scanner turns the
//! access-denied ones into alerts and treats everything else as fatal.

use resource::ResourceType;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Cloud provider an API call was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Google,
    Github,
}

impl Provider {
    /// Provider owning a Terraform resource type, from its prefix.
    pub fn from_resource_type(ty: &ResourceType) -> Option<Self> {
        match ty.provider() {
            "aws" => Some(Self::Aws),
            "azurerm" => Some(Self::Azure),
            "google" => Some(Self::Google),
            "github" => Some(Self::Github),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Google => "Google Cloud",
            Self::Github => "GitHub",
        }
    }

    /// Where to find the minimal read-only permissions for a scan.
    pub fn policy_url(&self) -> &'static str {
        match self {
            Self::Aws => "https://docs.driftctl.com/aws/policy",
            Self::Azure => "https://docs.driftctl.com/azure/policy",
            Self::Google => "https://docs.driftctl.com/google/policy",
            Self::Github => "https://docs.driftctl.com/github/policy",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw failure from an external API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub provider: Provider,
    /// HTTP status, when the transport exposes one
    pub status: Option<u16>,
    /// Provider error code (`AccessDeniedException`, `PermissionDenied`, ...)
    pub code: Option<String>,
    pub message: String,
}

const AWS_ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "AuthorizationError",
    "AuthorizationErrorException",
    "Forbidden",
];

impl ApiError {
    pub fn new(provider: Provider, message: impl Into<String>) -> Self {
        Self {
            provider,
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// A paginated call handed back the continuation token it was given.
    pub fn pagination_loop(provider: Provider, token: &str) -> Self {
        Self::new(provider, format!("pagination token {token} was returned twice"))
            .with_code("PaginationLoop")
    }

    /// Whether the failure comes from missing permissions.
    pub fn is_access_denied(&self) -> bool {
        if self.status == Some(403) {
            return true;
        }
        let Some(code) = self.code.as_deref() else {
            return false;
        };
        match self.provider {
            Provider::Aws => AWS_ACCESS_DENIED_CODES.contains(&code),
            Provider::Google => code == "PermissionDenied",
            Provider::Azure => code == "AuthorizationFailed",
            Provider::Github => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{code}: ")?;
        }
        f.write_str(&self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Listing a resource type failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerationError {
    /// The type's own listing failed
    #[error("error listing {resource_type}: {source}")]
    Listing {
        resource_type: ResourceType,
        source: ApiError,
    },

    /// Listing a dependency type needed to enumerate `resource_type` failed
    #[error("error listing {resource_type} from {listed_type}: {source}")]
    ListingWithType {
        resource_type: ResourceType,
        listed_type: ResourceType,
        source: ApiError,
    },
}

impl EnumerationError {
    pub fn listing(resource_type: impl Into<ResourceType>, source: ApiError) -> Self {
        Self::Listing {
            resource_type: resource_type.into(),
            source,
        }
    }

    pub fn listing_with_type(
        resource_type: impl Into<ResourceType>,
        listed_type: impl Into<ResourceType>,
        source: ApiError,
    ) -> Self {
        Self::ListingWithType {
            resource_type: resource_type.into(),
            listed_type: listed_type.into(),
            source,
        }
    }

    /// Type being enumerated.
    pub fn resource_type(&self) -> &ResourceType {
        match self {
            Self::Listing { resource_type, .. } | Self::ListingWithType { resource_type, .. } => {
                resource_type
            }
        }
    }

    /// Type whose listing actually failed.
    pub fn listed_type(&self) -> &ResourceType {
        match self {
            Self::Listing { resource_type, .. } => resource_type,
            Self::ListingWithType { listed_type, .. } => listed_type,
        }
    }

    pub fn cause(&self) -> &ApiError {
        match self {
            Self::Listing { source, .. } | Self::ListingWithType { source, .. } => source,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        self.cause().is_access_denied()
    }
}

/// Hydrating one resource in deep mode failed.
#[derive(Debug, Error)]
pub enum DetailsError {
    #[error("error reading details of {resource_type} {resource_id}: {source}")]
    Read {
        resource_type: ResourceType,
        resource_id: String,
        source: ApiError,
    },

    #[error("unable to deserialize details of {resource_type} {resource_id}: {source}")]
    Deserialize {
        resource_type: ResourceType,
        resource_id: String,
        source: resource::Error,
    },
}

impl DetailsError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.is_access_denied())
    }
}

/// Fatal outcome of a scan. No partial inventory accompanies it.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Details(#[from] DetailsError),

    #[error("scan did not complete within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("failed to create scan worker pool: {0}")]
    WorkerPool(String),

    #[error("scan worker stopped before reporting a result")]
    Aborted,
}

/// Invalid remote library configuration, detected at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("an enumerator for {0} is already registered")]
    DuplicateEnumerator(ResourceType),

    #[error("a details fetcher for {0} is already registered")]
    DuplicateDetailsFetcher(ResourceType),
}

/// Result type for scans.
pub type Result<T> = std::result::Result<T, ScanError>;
