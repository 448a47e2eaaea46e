//! # Resource
//!
//! The resource model shared by the state reader and the cloud scanner.
//!
//! Both inventories are made of [`Resource`] values built by the same
//! [`ResourceFactory`], so an attribute map read from a state document and
//! one returned by a cloud API are normalized identically and can be
//! compared key by key.
//!
//! ## Core Concepts
//!
//! - **Resource**: type + id identity, attributes, optional provenance
//! - **SchemaRepository**: per-type schema metadata and normalization hooks,
//!   populated once per provider before any resource is created
//! - **ResourceFactory**: builds normalized resources from raw attributes
//! - **Filter / Progress / Supplier**: collaborator traits
//!
//! ## Example
//!
//! ```
//! use resource::{Attributes, ResourceFactory, SchemaRepository, SchemaResourceFactory, aws};
//! use std::sync::Arc;
//!
//! let mut schemas = SchemaRepository::new();
//! aws::init(&mut schemas, aws::DEFAULT_VERSION, None)?;
//! let factory = SchemaResourceFactory::new(Arc::new(schemas));
//!
//! let mut attrs = Attributes::new();
//! attrs.insert("arn", "arn:aws:ec2:us-east-1:123:volume/vol-1");
//! attrs.insert("size", 8);
//!
//! let volume = factory.create_abstract_resource("aws_ebs_volume", "vol-1", attrs);
//! assert!(volume.attributes().get("arn").is_none());
//! # Ok::<(), resource::Error>(())
//! ```

pub mod attributes;
pub mod aws;
pub mod azurerm;
pub mod context;
pub mod deserializer;
pub mod error;
pub mod factory;
pub mod filter;
pub mod google;
pub mod resource;
pub mod schema;
pub mod types;

pub use attributes::Attributes;
pub use context::{Filter, NoFilter, NoProgress, Progress, Supplier};
pub use deserializer::Deserializer;
pub use error::{Error, Result};
pub use factory::{ResourceFactory, SchemaResourceFactory, normalize};
pub use filter::DriftIgnore;
pub use resource::Resource;
pub use schema::{
    AttributeSchema, AttributesFn, NormalizeFn, ProviderSchema, ResourceSchema, SchemaRepository,
};
pub use types::{Flags, ResourceKey, ResourceType, Source};

/// Register every built-in provider.
pub fn init_builtin_providers(repo: &mut SchemaRepository) -> Result<()> {
    aws::init(repo, aws::DEFAULT_VERSION, None)?;
    azurerm::init(repo, azurerm::DEFAULT_VERSION, None)?;
    google::init(repo, google::DEFAULT_VERSION, None)?;
    Ok(())
}
