//! Azure resource metadata

use crate::aws::string_fields;
use crate::error::Result;
use crate::schema::{ProviderSchema, ResourceSchema, SchemaRepository};
use crate::types::Flags;

pub const PROVIDER: &str = "azurerm";
pub const DEFAULT_VERSION: &str = "2.71.0";

pub const AZURERM_PRIVATE_DNS_AAAA_RECORD: &str = "azurerm_private_dns_aaaa_record";
pub const AZURERM_RESOURCE_GROUP: &str = "azurerm_resource_group";

pub fn builtin_schema() -> ProviderSchema {
    ProviderSchema::new()
        .with_resource(AZURERM_PRIVATE_DNS_AAAA_RECORD, ResourceSchema::new())
        .with_resource(AZURERM_RESOURCE_GROUP, ResourceSchema::new())
}

pub fn init(repo: &mut SchemaRepository, version: &str, schema: Option<ProviderSchema>) -> Result<()> {
    repo.init(PROVIDER, version, schema.unwrap_or_else(builtin_schema))?;
    init_metadata(repo);
    Ok(())
}

pub fn init_metadata(repo: &mut SchemaRepository) {
    repo.set_normalize_fn(AZURERM_RESOURCE_GROUP, |attrs| attrs.safe_delete(&["timeouts"]));
    repo.set_human_readable_fn(AZURERM_RESOURCE_GROUP, |attrs| {
        string_fields(attrs, &[("name", "Name")])
    });

    repo.set_normalize_fn(AZURERM_PRIVATE_DNS_AAAA_RECORD, |attrs| {
        attrs.safe_delete(&["timeouts"]);
    });
    repo.set_human_readable_fn(AZURERM_PRIVATE_DNS_AAAA_RECORD, |attrs| {
        string_fields(attrs, &[("name", "Name"), ("zone_name", "Zone")])
    });
    repo.set_flags(AZURERM_PRIVATE_DNS_AAAA_RECORD, Flags::DEEP_MODE);
}
