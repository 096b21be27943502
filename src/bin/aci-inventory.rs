// Copyright (c) 2025 - Cowboy AI, Inc.
//! ACI contract inventory CLI
//!
//! Logs in to each selected fabric, builds its contract graph and either
//! writes the full report or answers a single lookup.
//!
//! Run with: cargo run --bin aci-inventory -- --fabric all report
//!
//! Credentials missing from the config file are taken from `ACI_USERNAME`
//! and `ACI_PASSWORD`.

use aci_inventory::{
    client::ApicClient,
    config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, PASSWORD_ENV, USERNAME_ENV},
    report, FabricConfig, FabricSelector, Inventory, InventoryConfig,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "aci-inventory")]
#[command(about = "Read-only ACI contract relationship inventory")]
struct Cli {
    /// Config file listing the fabrics
    #[arg(long, short, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// APIC username for fabrics without one in the config
    #[arg(long, env = USERNAME_ENV)]
    username: Option<String>,

    /// APIC password for fabrics without one in the config
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    password: Option<String>,

    /// Fabric name, or "all"
    #[arg(long, short, default_value = "all", global = true)]
    fabric: FabricSelector,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the full contract report of each fabric to a file
    Report {
        /// Directory the report files are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// List contracts
    Contracts {
        /// Only contracts whose home tenant is this one
        #[arg(long)]
        tenant: Option<String>,
    },

    /// Show providers and consumers of one contract
    Contract {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        name: String,
    },

    /// Show contracts provided and consumed by one EPG
    Epg {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        name: String,
    },

    /// List tenants with their VRFs
    Tenants,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = InventoryConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    config.apply_credentials(cli.username.clone(), cli.password.clone());

    let fabrics: Vec<FabricConfig> = match &cli.fabric {
        FabricSelector::All => config.fabrics.clone(),
        FabricSelector::One(name) => vec![config
            .fabric(name)
            .cloned()
            .with_context(|| format!("Fabric {} is not configured", name))?],
    };

    let inventory = Inventory::collect(
        &fabrics,
        &config.excluded_tenants,
        config.max_concurrent_fabrics,
        ApicClient::new,
    )
    .await;

    if inventory.graphs().next().is_none() {
        bail!("No fabric could be collected");
    }
    for failure in inventory.failures() {
        warn!("Skipping fabric {}: {}", failure.fabric(), failure);
    }

    match cli.command {
        Command::Report { output_dir } => write_reports(&inventory, &cli.fabric, &output_dir),
        Command::Contracts { tenant } => list_contracts(&inventory, &cli.fabric, tenant.as_deref()),
        Command::Contract { tenant, name } => show_contract(&inventory, &cli.fabric, &tenant, &name),
        Command::Epg { tenant, name } => show_epg(&inventory, &cli.fabric, &tenant, &name),
        Command::Tenants => list_tenants(&inventory, &cli.fabric),
    }
}

fn write_reports(inventory: &Inventory, selector: &FabricSelector, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let generated_at = chrono::Local::now().naive_local();
    for (fabric, result) in inventory.select(selector)? {
        let Ok(graph) = result else {
            continue;
        };
        let path = output_dir.join(report::report_file_name(fabric, generated_at));
        let text = report::render_fabric_report(graph.query(), generated_at);
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        let built = graph.report();
        info!(
            "Report for {} written to {} ({} contracts, {} issues)",
            fabric,
            path.display(),
            built.contracts,
            built.issues.len()
        );
        println!("{}", path.display());
    }
    Ok(())
}

fn list_contracts(inventory: &Inventory, selector: &FabricSelector, tenant: Option<&str>) -> Result<()> {
    for outcome in inventory.list_contracts(selector, tenant)? {
        println!("== Fabric: {} ==", outcome.fabric);
        match outcome.result {
            Ok(contracts) if contracts.is_empty() => println!("No contracts found."),
            Ok(contracts) => {
                for contract in contracts {
                    println!("{} ({})", contract.key, contract.scope);
                }
            }
            Err(e) => println!("{}", e),
        }
        println!();
    }
    Ok(())
}

fn show_contract(inventory: &Inventory, selector: &FabricSelector, tenant: &str, name: &str) -> Result<()> {
    for outcome in inventory.get_contract_detail(selector, tenant, name)? {
        println!("== Fabric: {} ==", outcome.fabric);
        match outcome.result {
            Ok(detail) => print!("{}", report::render_contract_tree(&detail)),
            Err(e) => println!("{}", e),
        }
        println!();
    }
    Ok(())
}

fn show_epg(inventory: &Inventory, selector: &FabricSelector, tenant: &str, name: &str) -> Result<()> {
    for outcome in inventory.get_epg_relationships(selector, tenant, name)? {
        println!("== Fabric: {} ==", outcome.fabric);
        match outcome.result {
            Ok(relationships) => print!("{}", report::render_epg_relationships(&relationships)),
            Err(e) => println!("{}", e),
        }
        println!();
    }
    Ok(())
}

fn list_tenants(inventory: &Inventory, selector: &FabricSelector) -> Result<()> {
    for outcome in inventory.list_tenants(selector)? {
        println!("== Fabric: {} ==", outcome.fabric);
        match outcome.result {
            Ok(tenants) => {
                for summary in tenants {
                    let vrfs: Vec<&str> = summary.vrfs.iter().map(|v| v.key.name()).collect();
                    println!(
                        "{}  VRFs: [{}]  contracts: {}  EPGs: {}",
                        summary.tenant.name,
                        vrfs.join(", "),
                        summary.contract_count,
                        summary.epg_count
                    );
                }
            }
            Err(e) => println!("{}", e),
        }
        println!();
    }
    Ok(())
}
