//! # Tfstate
//!
//! Reads Terraform state documents into the declared resource inventory.
//!
//! A [`StateReader`] fetches the document from its [`StateLocation`]
//! (local file or HTTP), rejects unsupported Terraform releases and state
//! formats, then builds one [`resource::Resource`] per managed instance,
//! tagged with its provenance and filtered like the cloud scan.

pub mod backend;
pub mod document;
pub mod error;
pub mod location;
pub mod reader;
pub mod version;

pub use backend::Backend;
pub use error::{Error, Result};
pub use location::{BackendKind, DEFAULT_KEY, StateLocation};
pub use reader::StateReader;
pub use version::TerraformVersion;
