// Copyright (c) 2025 - Cowboy AI, Inc.
//! Relationship Graph Builder
//!
//! Turns a normalized [`EntitySet`] into an immutable, indexed graph of one
//! fabric:
//!
//! ```text
//!            provides                 consumes
//!   (EPG) ─────────────> (Contract) <───────────── (EPG)
//!     │                      │                       │
//!     └── member of VRF      └── home tenant         └── subnets
//! ```
//!
//! Every index is computed once in [`Graph::build`]. A graph is never
//! patched; fresher data means a new snapshot and a new build.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::domain::{ContractBinding, ContractKey, EpgKey, Fabric, Role, VrfKey};
use crate::errors::DataQualityIssue;
use crate::normalize::EntitySet;
use crate::query::GraphQuery;

/// Keys grouped by the role held
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSets<K: Ord> {
    pub providers: BTreeSet<K>,
    pub consumers: BTreeSet<K>,
}

impl<K: Ord> Default for RoleSets<K> {
    fn default() -> Self {
        Self {
            providers: BTreeSet::new(),
            consumers: BTreeSet::new(),
        }
    }
}

impl<K: Ord> RoleSets<K> {
    pub fn get(&self, role: Role) -> &BTreeSet<K> {
        match role {
            Role::Provider => &self.providers,
            Role::Consumer => &self.consumers,
        }
    }

    fn insert(&mut self, role: Role, key: K) -> bool {
        match role {
            Role::Provider => self.providers.insert(key),
            Role::Consumer => self.consumers.insert(key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty() && self.consumers.is_empty()
    }
}

/// Objects owned by one tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantMembers {
    pub vrfs: BTreeSet<VrfKey>,
    pub contracts: BTreeSet<ContractKey>,
    pub epgs: BTreeSet<EpgKey>,
}

/// Outcome summary of a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub tenants: usize,
    pub vrfs: usize,
    pub contracts: usize,
    pub epgs: usize,
    pub subnets: usize,
    pub bindings: usize,
    /// Bindings dropped because their contract is not in the snapshot
    pub dropped_bindings: usize,
    /// Normalization and build issues, sorted
    pub issues: Vec<DataQualityIssue>,
}

impl BuildReport {
    pub fn incomplete_epgs(&self) -> usize {
        self.issues.iter().filter(|i| i.is_incomplete_epg()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Contract relationship graph of one fabric snapshot
#[derive(Debug, Clone)]
pub struct Graph {
    fabric: Fabric,
    pub(crate) entities: EntitySet,
    bindings: BTreeSet<ContractBinding>,
    pub(crate) by_contract: BTreeMap<ContractKey, RoleSets<EpgKey>>,
    pub(crate) by_epg: BTreeMap<EpgKey, RoleSets<ContractKey>>,
    pub(crate) by_tenant: BTreeMap<String, TenantMembers>,
    report: BuildReport,
}

impl Graph {
    /// Link EPGs to contracts and index the snapshot
    ///
    /// A binding to a contract missing from `entities` is dropped and
    /// recorded as [`DataQualityIssue::UnresolvedReference`]; the rest of
    /// the graph is still built.
    pub fn build(fabric: Fabric, entities: EntitySet) -> Self {
        let mut bindings = BTreeSet::new();
        let mut by_contract: BTreeMap<ContractKey, RoleSets<EpgKey>> = BTreeMap::new();
        let mut by_epg: BTreeMap<EpgKey, RoleSets<ContractKey>> = BTreeMap::new();
        let mut by_tenant: BTreeMap<String, TenantMembers> = BTreeMap::new();
        let mut issues = entities.issues.clone();

        for tenant in entities.tenants.keys() {
            by_tenant.entry(tenant.clone()).or_default();
        }
        for key in entities.vrfs.keys() {
            by_tenant
                .entry(key.tenant().to_string())
                .or_default()
                .vrfs
                .insert(key.clone());
        }
        for key in entities.contracts.keys() {
            by_tenant
                .entry(key.tenant().to_string())
                .or_default()
                .contracts
                .insert(key.clone());
            by_contract.entry(key.clone()).or_default();
        }

        let mut dropped = 0usize;
        for (epg_key, epg) in &entities.epgs {
            by_tenant
                .entry(epg_key.tenant().to_string())
                .or_default()
                .epgs
                .insert(epg_key.clone());
            let epg_index = by_epg.entry(epg_key.clone()).or_default();

            for role in Role::ALL {
                for contract in epg.contracts(role) {
                    if !entities.contracts.contains_key(contract) {
                        warn!(
                            "Dropping {} binding of EPG {} to unresolved contract {}",
                            role, epg_key, contract
                        );
                        dropped += 1;
                        issues.push(DataQualityIssue::UnresolvedReference {
                            epg: epg_key.clone(),
                            role,
                            reference: contract.to_string(),
                        });
                        continue;
                    }

                    bindings.insert(ContractBinding {
                        contract: contract.clone(),
                        epg: epg_key.clone(),
                        role,
                    });
                    epg_index.insert(role, contract.clone());
                    by_contract
                        .entry(contract.clone())
                        .or_default()
                        .insert(role, epg_key.clone());
                }
            }
        }

        // Interface references the normalizer could not follow count as
        // dropped bindings too.
        dropped += entities
            .issues
            .iter()
            .filter(|i| i.is_unresolved_reference())
            .count();

        issues.sort();
        issues.dedup();

        let report = BuildReport {
            tenants: entities.tenants.len(),
            vrfs: entities.vrfs.len(),
            contracts: entities.contracts.len(),
            epgs: entities.epgs.len(),
            subnets: entities.subnet_count(),
            bindings: bindings.len(),
            dropped_bindings: dropped,
            issues,
        };

        info!(
            "Built graph for fabric {}: {} tenants, {} contracts, {} EPGs, {} bindings ({} dropped, {} issues)",
            fabric.name,
            report.tenants,
            report.contracts,
            report.epgs,
            report.bindings,
            report.dropped_bindings,
            report.issues.len()
        );

        Self {
            fabric,
            entities,
            bindings,
            by_contract,
            by_epg,
            by_tenant,
            report,
        }
    }

    pub fn fabric(&self) -> &Fabric {
        &self.fabric
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Every edge, ordered by contract, EPG, then role
    pub fn bindings(&self) -> impl Iterator<Item = &ContractBinding> {
        self.bindings.iter()
    }

    /// Read-only view of the entities behind the graph
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    /// Query interface; the only entry point for report renderers
    pub fn query(&self) -> GraphQuery<'_> {
        GraphQuery::new(self)
    }
}
