//! `driftscan scan`: declared and observed inventories side by side

use crate::Context;
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::inventory::Inventory;
use crate::progress::Spinner;
use crate::ui;
use anyhow::{Context as _, Result};
use remote::aws::replay::ReplayClient;
use remote::aws::{self, AwsClients};
use remote::{Alert, AlertCollector, RemoteLibrary, ResourceReader, Scanner};
use resource::{Filter, Progress, ResourceType};
use scancache::MemoryCache;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

/// Result of a scan run.
pub struct ScanReport {
    pub inventory: Inventory,
    pub alerts: BTreeMap<ResourceType, Vec<Alert>>,
}

pub fn run(ctx: &Context, args: ScanArgs) -> Result<()> {
    let mut config = Config::load()?;
    config.apply_scan_args(&args)?;

    let spinner = Arc::new(Spinner::new("Reading state", ctx.quiet));
    let report = execute(&args, &config, spinner)?;
    print_report(&report);
    Ok(())
}

/// Build both inventories for `args.from` and the recorded account.
pub fn execute(args: &ScanArgs, config: &Config, progress: Arc<dyn Progress>) -> Result<ScanReport> {
    let factory = super::resource_factory()?;
    let filter: Arc<dyn Filter> = Arc::new(config.build_filter()?);

    let recording = fs::read_to_string(&args.replay)
        .with_context(|| format!("Could not read {}", args.replay.display()))?;
    let client = Arc::new(
        ReplayClient::from_json(&recording)
            .with_context(|| format!("Invalid recording {}", args.replay.display()))?,
    );

    let mut library = RemoteLibrary::new();
    let reader: Option<Arc<dyn ResourceReader>> = if config.scan.deep {
        Some(client.clone())
    } else {
        None
    };
    aws::init(
        &mut library,
        AwsClients {
            api_gateway: client.clone(),
            app_autoscaling: client,
            reader,
        },
        Arc::new(MemoryCache::new(config.cache.capacity)),
        factory.clone(),
    )?;
    log::debug!("{} resource types registered", library.len());

    let alerts = Arc::new(AlertCollector::new());
    let scanner = Scanner::new(
        library,
        alerts.clone(),
        config.scanner_options(),
        Arc::clone(&filter),
    );
    let state = super::state_reader(&args.from, config, factory, filter, progress)?;

    let inventory = Inventory::collect(&state, &scanner)?;
    Ok(ScanReport {
        inventory,
        alerts: alerts.alerts(),
    })
}

fn print_report(report: &ScanReport) {
    let counts = report.inventory.type_counts();
    let width = counts
        .keys()
        .map(|ty| ty.as_str().len())
        .max()
        .unwrap_or(0)
        .max("resource type".len());

    ui::header("Inventory");
    println!("  {:<width$}  {:>6}     {:>6}", "resource type", "state", "cloud");
    for (ty, (declared, observed)) in &counts {
        println!("{}", ui::count_row(ty.as_str(), width, *declared, *observed));
    }
    println!();
    ui::kv("Declared", &report.inventory.declared.len().to_string());
    ui::kv("Observed", &report.inventory.observed.len().to_string());

    if !report.alerts.is_empty() {
        ui::section("Alerts");
        for alert in report.alerts.values().flatten() {
            ui::warn(&alert.message());
            ui::dim(&alert.remediation());
        }
    }
}
