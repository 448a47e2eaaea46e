//! `driftscan state`: the declared inventory alone

use crate::Context;
use crate::cli::StateArgs;
use crate::config::Config;
use crate::progress::Spinner;
use crate::ui;
use anyhow::Result;
use resource::{Progress, Resource, ResourceType};
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn run(ctx: &Context, args: StateArgs) -> Result<()> {
    let config = Config::load()?;
    let spinner = Arc::new(Spinner::new("Reading state", ctx.quiet || args.json));
    let resources = read(&args.location, &config, spinner)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(());
    }

    ui::header(&format!("State {}", args.location));
    for (ty, items) in group_by_type(&resources) {
        ui::kv(ty.as_str(), &items.len().to_string());
        if ctx.verbose > 0 {
            for res in items {
                match res.source() {
                    Some(source) => ui::dim(&format!("{} ({})", res.key(), source.internal_name())),
                    None => ui::dim(&res.key().to_string()),
                }
            }
        }
    }
    println!();
    ui::success(&format!("{} resources declared", resources.len()));
    Ok(())
}

/// Read and filter one state document.
pub fn read(location: &str, config: &Config, progress: Arc<dyn Progress>) -> Result<Vec<Resource>> {
    let factory = super::resource_factory()?;
    let filter = Arc::new(config.build_filter()?);
    let reader = super::state_reader(location, config, factory, filter, progress)?;
    Ok(reader.resources()?)
}

fn group_by_type(resources: &[Resource]) -> BTreeMap<&ResourceType, Vec<&Resource>> {
    let mut groups: BTreeMap<&ResourceType, Vec<&Resource>> = BTreeMap::new();
    for res in resources {
        groups.entry(res.resource_type()).or_default().push(res);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use resource::NoProgress;
    use std::fs;
    use tempfile::TempDir;

    const STATE: &str = r#"{
        "version": 4,
        "terraform_version": "1.1.9",
        "resources": [
            {"mode": "managed", "type": "aws_s3_bucket", "name": "logs",
             "instances": [{"attributes": {"id": "logs", "acl": "private"}}]},
            {"mode": "managed", "type": "aws_route", "name": "default",
             "instances": [{"attributes": {"id": "r-rtb-1", "route_table_id": "rtb-1", "destination_cidr_block": "0.0.0.0/0"}}]}
        ]
    }"#;

    fn write_state(temp: &TempDir) -> String {
        let path = temp.path().join("terraform.tfstate");
        fs::write(&path, STATE).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_state() {
        let temp = TempDir::new().unwrap();
        let path = write_state(&temp);

        let resources = read(&path, &Config::default(), Arc::new(NoProgress)).unwrap();
        assert_eq!(resources.len(), 2);

        let groups = group_by_type(&resources);
        let types: Vec<&str> = groups.keys().map(|ty| ty.as_str()).collect();
        assert_eq!(types, vec!["aws_route", "aws_s3_bucket"]);

        let json = serde_json::to_value(&resources).unwrap();
        assert_eq!(json[0]["type"], "aws_s3_bucket");
        assert_eq!(json[0]["source"]["name"], "logs");
    }

    #[test]
    fn test_read_state_with_ignored_type() {
        let temp = TempDir::new().unwrap();
        let path = write_state(&temp);
        let config = Config {
            filter: FilterConfig {
                ignore_types: vec!["aws_s3_*".to_string()],
                driftignore: None,
            },
            ..Config::default()
        };

        let resources = read(&path, &config, Arc::new(NoProgress)).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].resource_id(), "r-rtb-1");
    }

    #[test]
    fn test_unsupported_state_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("terraform.tfstate");
        fs::write(&path, r#"{"version": 4, "terraform_version": "0.10.26", "resources": []}"#).unwrap();

        let err = read(&path.to_string_lossy(), &Config::default(), Arc::new(NoProgress)).unwrap_err();
        assert!(err.to_string().contains("Terraform 0.10.26 which is currently not supported"));
    }
}
