// Copyright (c) 2025 - Cowboy AI, Inc.
//! Text report rendering
//!
//! Renders query results only; nothing here reaches into graph internals.
//!
//! Fabric report layout:
//!
//! ```text
//! ============================================================================
//! ACI CONTRACT REPORT - FABRIC: DC1
//! Generated: 15/10/2026 09:30:00
//! ============================================================================
//!
//! TENANT: Production                     VRFs: Production-VRF
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! CONTRACT: Web-DB-Contract
//!   PROVIDERS                            CONSUMERS
//!   ───────────────────────────────────  ──────────────────────────────────
//!   EPG: Database-EPG                    EPG: Web-Server-EPG
//!     └─ 10.1.100.0/24                     └─ 10.1.200.0/24
//! ```

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::{Contract, Epg, EpgKind, Subnet};
use crate::query::{ContractDetail, EpgRelationships, EpgView, GraphQuery};

pub const REPORT_WIDTH: usize = 140;
pub const COLUMN_WIDTH: usize = 65;

/// Description budget in single-lookup views
const TREE_DESCRIPTION_INTERNAL: usize = 60;
const TREE_DESCRIPTION_EXTERNAL: usize = 50;

/// `contracts_<fabric>_<YYYYmmdd_HHMMSS>.txt`
pub fn report_file_name(fabric: &str, generated_at: NaiveDateTime) -> String {
    format!(
        "contracts_{}_{}.txt",
        fabric,
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn render_fabric_report(query: GraphQuery<'_>, generated_at: NaiveDateTime) -> String {
    FabricReport {
        query,
        generated_at,
    }
    .to_string()
}

pub fn render_contract_tree(detail: &ContractDetail<'_>) -> String {
    ContractTree(detail).to_string()
}

pub fn render_epg_relationships(relationships: &EpgRelationships<'_>) -> String {
    EpgRelationshipsView(relationships).to_string()
}

/// Full per-fabric report
pub struct FabricReport<'g> {
    pub query: GraphQuery<'g>,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Totals {
    tenants: usize,
    contracts: usize,
    providers: usize,
    consumers: usize,
}

impl fmt::Display for FabricReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fabric = self.query.fabric();
        writeln!(f, "{}", "=".repeat(REPORT_WIDTH))?;
        writeln!(f, "ACI CONTRACT REPORT - FABRIC: {}", fabric.to_uppercase())?;
        writeln!(
            f,
            "Generated: {}",
            self.generated_at.format("%d/%m/%Y %H:%M:%S")
        )?;
        writeln!(f, "{}", "=".repeat(REPORT_WIDTH))?;
        writeln!(f)?;

        let mut totals = Totals::default();
        for summary in self.query.list_tenants() {
            let contracts = self.query.list_contracts(Some(&summary.tenant.name));
            if contracts.is_empty() {
                continue;
            }
            totals.tenants += 1;
            totals.contracts += contracts.len();

            let vrfs = if summary.vrfs.is_empty() {
                "none".to_string()
            } else {
                summary
                    .vrfs
                    .iter()
                    .map(|vrf| vrf.key.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let tenant_part = format!("TENANT: {}", summary.tenant.name);
            let spacing = (COLUMN_WIDTH + 1)
                .saturating_sub(tenant_part.chars().count())
                .max(1);
            writeln!(f, "{}{}VRFs: {}", tenant_part, " ".repeat(spacing), vrfs)?;
            writeln!(f, "{}", "━".repeat(REPORT_WIDTH))?;
            writeln!(f)?;

            for contract in contracts {
                let Ok(detail) = self
                    .query
                    .get_contract_detail(contract.tenant(), contract.name())
                else {
                    continue;
                };
                if detail.is_unbound() {
                    continue;
                }
                totals.providers += detail.providers.len();
                totals.consumers += detail.consumers.len();
                write_contract_columns(f, &detail)?;
            }
        }

        let report = self.query.build_report();
        writeln!(f, "{}", "━".repeat(REPORT_WIDTH))?;
        writeln!(f)?;
        writeln!(f, "{}", "═".repeat(REPORT_WIDTH))?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{}", "═".repeat(REPORT_WIDTH))?;
        writeln!(f, "Tenants with contracts: {}", totals.tenants)?;
        writeln!(f, "Contracts: {}", totals.contracts)?;
        writeln!(f, "Provider EPGs: {}", totals.providers)?;
        writeln!(f, "Consumer EPGs: {}", totals.consumers)?;
        writeln!(f, "Dropped bindings: {}", report.dropped_bindings)?;
        writeln!(f, "Incomplete EPGs: {}", report.incomplete_epgs())?;
        writeln!(f, "Fabric: {}", fabric)?;
        writeln!(f, "{}", "═".repeat(REPORT_WIDTH))
    }
}

fn write_contract_columns(f: &mut fmt::Formatter<'_>, detail: &ContractDetail<'_>) -> fmt::Result {
    writeln!(f, "CONTRACT: {}", detail.contract.name())?;
    writeln!(f, "  {:<width$} CONSUMERS", "PROVIDERS", width = COLUMN_WIDTH)?;
    writeln!(
        f,
        "  {} {}",
        "─".repeat(COLUMN_WIDTH),
        "─".repeat(COLUMN_WIDTH)
    )?;

    let providers = epg_lines(&detail.providers);
    let consumers = epg_lines(&detail.consumers);
    for i in 0..providers.len().max(consumers.len()) {
        let left = providers
            .get(i)
            .map(|line| truncate(line, COLUMN_WIDTH))
            .unwrap_or_default();
        let right = consumers.get(i).map(String::as_str).unwrap_or("");
        writeln!(f, "  {:<width$} {}", left, right, width = COLUMN_WIDTH)?;
    }
    writeln!(f)
}

/// Column lines for a list of EPGs, blank line between EPGs
fn epg_lines(views: &[EpgView<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, view) in views.iter().enumerate() {
        lines.push(format!("{}: {}", epg_label(view.epg), view.epg.name()));

        if view.subnets.is_empty() {
            lines.push("  └─ No subnets".to_string());
        }
        for (i, subnet) in view.subnets.iter().enumerate() {
            let branch = if i + 1 == view.subnets.len() { "  └─" } else { "  ├─" };
            lines.push(format!("{} {}", branch, column_subnet(view.epg, subnet)));
        }

        if index + 1 < views.len() {
            lines.push(String::new());
        }
    }
    lines
}

/// Subnet text sized to fit a report column
fn column_subnet(epg: &Epg, subnet: &Subnet) -> String {
    let ip = subnet.cidr.to_string();
    let suffix = scope_suffix(epg, subnet);
    let description = subnet.description.as_deref().map(|text| {
        let budget = COLUMN_WIDTH
            .saturating_sub(6)
            .saturating_sub(ip.chars().count())
            .saturating_sub(suffix.chars().count())
            .saturating_sub(2);
        truncate(text, budget)
    });
    subnet_text(&ip, &suffix, description.as_deref())
}

/// Subnet text for single-lookup views
fn tree_subnet(epg: &Epg, subnet: &Subnet) -> String {
    let ip = subnet.cidr.to_string();
    let suffix = scope_suffix(epg, subnet);
    let budget = if epg.is_external() {
        TREE_DESCRIPTION_EXTERNAL
    } else {
        TREE_DESCRIPTION_INTERNAL
    };
    let description = subnet.description.as_deref().map(|text| truncate(text, budget));
    subnet_text(&ip, &suffix, description.as_deref())
}

fn subnet_text(ip: &str, suffix: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("{}{} {}", ip, suffix, description),
        None => format!("{}{}", ip, suffix),
    }
}

/// External subnets show their scope tag
fn scope_suffix(epg: &Epg, subnet: &Subnet) -> String {
    if epg.is_external() {
        format!(" ({})", subnet.scope.tag())
    } else {
        String::new()
    }
}

fn epg_label(epg: &Epg) -> &'static str {
    match epg.kind {
        EpgKind::Internal { .. } => "EPG",
        EpgKind::External { .. } => "Ext-EPG",
    }
}

/// Cut to `max` characters, ending in `...` when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Tree view of one contract
pub struct ContractTree<'a, 'g>(pub &'a ContractDetail<'g>);

impl fmt::Display for ContractTree<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.0;
        writeln!(
            f,
            "Tenant: {}  |  Contract: {}  |  Scope: {}",
            detail.contract.tenant(),
            detail.contract.name(),
            detail.contract.scope
        )?;
        if let Some(description) = &detail.contract.description {
            writeln!(f, "{}", description)?;
        }
        writeln!(f)?;

        if detail.is_unbound() {
            return writeln!(f, "No provider or consumer EPG bound.");
        }
        if !detail.providers.is_empty() {
            writeln!(f, "Providers:")?;
            write_tree_epgs(f, &detail.providers, "├──")?;
        }
        if !detail.consumers.is_empty() {
            writeln!(f, "Consumers:")?;
            write_tree_epgs(f, &detail.consumers, "└──")?;
        }
        Ok(())
    }
}

fn write_tree_epgs(f: &mut fmt::Formatter<'_>, views: &[EpgView<'_>], branch: &str) -> fmt::Result {
    for view in views {
        writeln!(f, "{} {}-{}", branch, epg_label(view.epg), view.epg.key)?;
        for subnet in &view.subnets {
            writeln!(f, "    ├── {}", tree_subnet(view.epg, subnet))?;
        }
    }
    Ok(())
}

/// Contracts provided and consumed by one EPG
pub struct EpgRelationshipsView<'a, 'g>(pub &'a EpgRelationships<'g>);

impl fmt::Display for EpgRelationshipsView<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rel = self.0;
        let placement = match &rel.epg.kind {
            EpgKind::Internal { vrf } => format!("VRF: {}", vrf),
            EpgKind::External { l3out } => format!("L3Out: {}", l3out),
        };
        writeln!(
            f,
            "Tenant: {}  |  {}: {}  |  {}",
            rel.epg.tenant(),
            epg_label(rel.epg),
            rel.epg.name(),
            placement
        )?;
        writeln!(f)?;

        write_contract_list(f, "Provides", &rel.provided)?;
        write_contract_list(f, "Consumes", &rel.consumed)
    }
}

fn write_contract_list(f: &mut fmt::Formatter<'_>, title: &str, contracts: &[&Contract]) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    if contracts.is_empty() {
        return writeln!(f, "└── (none)");
    }
    for (i, contract) in contracts.iter().enumerate() {
        let branch = if i + 1 == contracts.len() { "└──" } else { "├──" };
        writeln!(f, "{} {} ({})", branch, contract.key, contract.scope)?;
    }
    Ok(())
}
