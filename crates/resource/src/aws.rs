//! AWS resource metadata

use crate::attributes::Attributes;
use crate::error::Result;
use crate::schema::{AttributeSchema, ProviderSchema, ResourceSchema, SchemaRepository};
use crate::types::Flags;
use std::collections::BTreeMap;

pub const PROVIDER: &str = "aws";
pub const DEFAULT_VERSION: &str = "3.19.0";

pub const AWS_API_GATEWAY_AUTHORIZER: &str = "aws_api_gateway_authorizer";
pub const AWS_API_GATEWAY_DOMAIN_NAME: &str = "aws_api_gateway_domain_name";
pub const AWS_API_GATEWAY_RESOURCE: &str = "aws_api_gateway_resource";
pub const AWS_API_GATEWAY_REST_API: &str = "aws_api_gateway_rest_api";
pub const AWS_APPAUTOSCALING_TARGET: &str = "aws_appautoscaling_target";
pub const AWS_EBS_VOLUME: &str = "aws_ebs_volume";
pub const AWS_KMS_ALIAS: &str = "aws_kms_alias";
pub const AWS_NAT_GATEWAY: &str = "aws_nat_gateway";
pub const AWS_ROUTE: &str = "aws_route";
pub const AWS_S3_BUCKET: &str = "aws_s3_bucket";

/// Schemas shipped with the binary, used when no provider schema file is given.
pub fn builtin_schema() -> ProviderSchema {
    ProviderSchema::new()
        .with_resource(
            AWS_API_GATEWAY_AUTHORIZER,
            ResourceSchema::new()
                .with_attribute("type", AttributeSchema::with_default("TOKEN"))
                .with_attribute(
                    "authorizer_result_ttl_in_seconds",
                    AttributeSchema::with_default(300),
                )
                .with_attribute(
                    "identity_source",
                    AttributeSchema::with_default("method.request.header.Authorization"),
                ),
        )
        .with_resource(AWS_API_GATEWAY_DOMAIN_NAME, ResourceSchema::new())
        .with_resource(AWS_API_GATEWAY_RESOURCE, ResourceSchema::new())
        .with_resource(
            AWS_API_GATEWAY_REST_API,
            ResourceSchema::new()
                .with_attribute("api_key_source", AttributeSchema::with_default("HEADER"))
                .with_attribute("minimum_compression_size", AttributeSchema::with_default(-1))
                .with_attribute(
                    "disable_execute_api_endpoint",
                    AttributeSchema::with_default(false),
                ),
        )
        .with_resource(AWS_APPAUTOSCALING_TARGET, ResourceSchema::new())
        .with_resource(AWS_EBS_VOLUME, ResourceSchema::new())
        .with_resource(AWS_KMS_ALIAS, ResourceSchema::new())
        .with_resource(AWS_NAT_GATEWAY, ResourceSchema::new())
        .with_resource(AWS_ROUTE, ResourceSchema::new())
        .with_resource(
            AWS_S3_BUCKET,
            ResourceSchema::new()
                .with_attribute("acl", AttributeSchema::with_default("private"))
                .with_attribute("force_destroy", AttributeSchema::with_default(false)),
        )
}

/// Register AWS schemas (the built-in ones unless given) and their metadata.
pub fn init(repo: &mut SchemaRepository, version: &str, schema: Option<ProviderSchema>) -> Result<()> {
    repo.init(PROVIDER, version, schema.unwrap_or_else(builtin_schema))?;
    init_metadata(repo);
    Ok(())
}

pub fn init_metadata(repo: &mut SchemaRepository) {
    repo.set_human_readable_fn(AWS_API_GATEWAY_REST_API, name_attribute);
    repo.set_human_readable_fn(AWS_API_GATEWAY_RESOURCE, |attrs| {
        string_fields(attrs, &[("path", "Path"), ("rest_api_id", "Api")])
    });
    repo.set_human_readable_fn(AWS_API_GATEWAY_AUTHORIZER, name_attribute);

    repo.set_resolve_read_fn(AWS_APPAUTOSCALING_TARGET, |attrs| {
        string_fields(
            attrs,
            &[
                ("service_namespace", "service_namespace"),
                ("scalable_dimension", "scalable_dimension"),
            ],
        )
    });

    repo.set_normalize_fn(AWS_EBS_VOLUME, |attrs| {
        attrs.safe_delete(&["arn"]);
        attrs.safe_delete(&["outpost_arn"]);
        attrs.safe_delete(&["snapshot_id"]);
        attrs.delete_if_default("throughput");
    });
    repo.set_flags(AWS_EBS_VOLUME, Flags::DEEP_MODE);

    repo.set_normalize_fn(AWS_KMS_ALIAS, |attrs| {
        attrs.safe_delete(&["name"]);
        attrs.safe_delete(&["name_prefix"]);
    });
    repo.set_flags(AWS_KMS_ALIAS, Flags::DEEP_MODE);

    repo.set_flags(AWS_NAT_GATEWAY, Flags::DEEP_MODE);

    repo.set_resolve_read_fn(AWS_ROUTE, route_read_attributes);
    repo.set_normalize_fn(AWS_ROUTE, normalize_route);
    repo.set_human_readable_fn(AWS_ROUTE, route_human_readable);
    repo.set_flags(AWS_ROUTE, Flags::DEEP_MODE);
}

fn name_attribute(attrs: &Attributes) -> BTreeMap<String, String> {
    string_fields(attrs, &[("name", "Name")])
}

/// Copy non-empty string attributes under new labels.
pub(crate) fn string_fields(attrs: &Attributes, fields: &[(&str, &str)]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|(key, label)| {
            attrs
                .get_non_empty_str(key)
                .map(|value| ((*label).to_string(), value.to_string()))
        })
        .collect()
}

const ROUTE_TARGETS: [&str; 13] = [
    "vpc_endpoint_id",
    "local_gateway_id",
    "destination_cidr_block",
    "destination_ipv6_cidr_block",
    "egress_only_gateway_id",
    "nat_gateway_id",
    "instance_id",
    "network_interface_id",
    "transit_gateway_id",
    "vpc_peering_connection_id",
    "destination_prefix_list_id",
    "instance_owner_id",
    "carrier_gateway_id",
];

fn normalize_route(attrs: &mut Attributes) {
    attrs.safe_delete(&["timeouts"]);
    for key in ROUTE_TARGETS {
        attrs.delete_if_default(key);
    }
}

fn route_read_attributes(attrs: &Attributes) -> BTreeMap<String, String> {
    let mut read = BTreeMap::new();
    read.insert(
        "route_table_id".to_string(),
        attrs.get_str("route_table_id").unwrap_or_default().to_string(),
    );
    read.extend(string_fields(
        attrs,
        &[
            ("destination_cidr_block", "destination_cidr_block"),
            ("destination_ipv6_cidr_block", "destination_ipv6_cidr_block"),
        ],
    ));
    read
}

fn route_human_readable(attrs: &Attributes) -> BTreeMap<String, String> {
    let mut readable = string_fields(attrs, &[("route_table_id", "Table")]);

    // Prefix list wins over ipv6, which wins over ipv4
    let destination = [
        "destination_prefix_list_id",
        "destination_ipv6_cidr_block",
        "destination_cidr_block",
    ]
    .into_iter()
    .find_map(|key| attrs.get_non_empty_str(key));

    if let Some(destination) = destination {
        readable.insert("Destination".to_string(), destination.to_string());
    }
    readable
}
