// Copyright (c) 2025 - Cowboy AI, Inc.
//! Object Normalizer
//!
//! Pure transformation from raw fabric records to canonical entities:
//!
//! ```text
//! RawSnapshot ──normalize(filter)──> EntitySet
//! ```
//!
//! - System tenants are dropped first, and everything scoped to them with it.
//! - Records are keyed by identity; a repeated key overwrites the earlier
//!   record, so paginated responses that repeat objects are harmless.
//! - EPGs are classified internal (VRF) or external (L3Out). EPGs that are
//!   neither are reported as [`IncompleteReason::NoVrfOrL3Out`] and left out.
//! - Contract references become [`ContractKey`]s. A reference qualified with
//!   another tenant (`tenant/name`, a `brc-` DN, or a consumed contract
//!   interface) stays a reference to the contract's home tenant.
//!
//! Bare names follow the APIC lookup order: the EPG's own tenant first, then
//! `common`.
//!
//! A VRF owned by an excluded tenant (usually `common/default`) still
//! classifies an EPG as internal. The EPG keeps the [`VrfKey`] as a reference,
//! the same way it keeps references to contracts of excluded tenants.
//!
//! Issues raised while resolving an EPG belong to that EPG's record: when a
//! later record overwrites it, the earlier record's issues go with it.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::config::TenantFilter;
use crate::domain::{
    Cidr, Contract, ContractKey, ContractScope, Dn, Epg, EpgKey, EpgKind, Role, Subnet,
    SubnetScope, Tenant, Vrf, VrfKey,
};
use crate::errors::{DataQualityIssue, IncompleteReason};
use crate::raw::{RawEpg, RawSnapshot, RawSubnet};

/// Tenant consulted when a bare name is not found locally
pub const COMMON_TENANT: &str = "common";

/// Canonical entities of one fabric snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntitySet {
    pub(crate) tenants: BTreeMap<String, Tenant>,
    pub(crate) vrfs: BTreeMap<VrfKey, Vrf>,
    pub(crate) contracts: BTreeMap<ContractKey, Contract>,
    pub(crate) epgs: BTreeMap<EpgKey, Epg>,
    pub(crate) subnets: BTreeMap<EpgKey, BTreeMap<Cidr, Subnet>>,
    pub(crate) issues: Vec<DataQualityIssue>,
}

impl EntitySet {
    pub fn tenants(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.values()
    }

    pub fn tenant(&self, name: &str) -> Option<&Tenant> {
        self.tenants.get(name)
    }

    pub fn vrfs(&self) -> impl Iterator<Item = &Vrf> {
        self.vrfs.values()
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    pub fn contract(&self, key: &ContractKey) -> Option<&Contract> {
        self.contracts.get(key)
    }

    pub fn epgs(&self) -> impl Iterator<Item = &Epg> {
        self.epgs.values()
    }

    pub fn epg(&self, key: &EpgKey) -> Option<&Epg> {
        self.epgs.get(key)
    }

    /// Subnets of one EPG, ordered by address
    pub fn subnets_of(&self, epg: &EpgKey) -> impl Iterator<Item = &Subnet> {
        self.subnets.get(epg).into_iter().flat_map(|s| s.values())
    }

    pub fn subnets(&self) -> impl Iterator<Item = &Subnet> {
        self.subnets.values().flat_map(|s| s.values())
    }

    pub fn subnet_count(&self) -> usize {
        self.subnets.values().map(BTreeMap::len).sum()
    }

    /// Data-quality issues, sorted and deduplicated
    pub fn issues(&self) -> &[DataQualityIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

/// Normalize one fabric's raw records
pub fn normalize(raw: &RawSnapshot, filter: &TenantFilter) -> EntitySet {
    let mut set = EntitySet::default();
    let mut issues = Vec::new();

    for tenant in &raw.tenants {
        if filter.is_excluded(&tenant.name) {
            debug!("Excluding system tenant {}", tenant.name);
            continue;
        }
        set.tenants.insert(
            tenant.name.clone(),
            Tenant {
                name: tenant.name.clone(),
                description: non_blank(tenant.description.as_deref()),
            },
        );
    }

    for vrf in raw.vrfs.iter().filter(|v| set.tenants.contains_key(&v.tenant)) {
        let key = VrfKey::new(&vrf.tenant, &vrf.name);
        set.vrfs.insert(key.clone(), Vrf { key });
    }

    for contract in raw
        .contracts
        .iter()
        .filter(|c| set.tenants.contains_key(&c.tenant))
    {
        let key = ContractKey::new(&contract.tenant, &contract.name);
        let scope = contract
            .scope
            .as_deref()
            .and_then(ContractScope::from_apic)
            .unwrap_or_default();
        set.contracts.insert(
            key.clone(),
            Contract {
                key,
                scope,
                description: non_blank(contract.description.as_deref()),
            },
        );
    }

    let interfaces: BTreeMap<(String, String), Option<String>> = raw
        .contract_interfaces
        .iter()
        .filter(|i| set.tenants.contains_key(&i.tenant))
        .map(|i| ((i.tenant.clone(), i.name.clone()), i.contract.clone()))
        .collect();

    let raw_tenants: BTreeSet<&str> = raw.tenants.iter().map(|t| t.name.as_str()).collect();
    let excluded_vrfs: BTreeSet<VrfKey> = raw
        .vrfs
        .iter()
        .filter(|v| filter.is_excluded(&v.tenant) && raw_tenants.contains(v.tenant.as_str()))
        .map(|v| VrfKey::new(&v.tenant, &v.name))
        .collect();

    let resolver = Resolver {
        vrfs: &set.vrfs,
        excluded_vrfs: &excluded_vrfs,
        contracts: &set.contracts,
        interfaces: &interfaces,
    };

    let mut rejected: BTreeSet<EpgKey> = BTreeSet::new();
    let mut epg_issues: BTreeMap<EpgKey, Vec<DataQualityIssue>> = BTreeMap::new();
    for raw_epg in raw
        .epgs
        .iter()
        .filter(|e| set.tenants.contains_key(&e.tenant))
    {
        let key = EpgKey::new(&raw_epg.tenant, &raw_epg.name);
        let mut record_issues = Vec::new();
        match resolver.epg(raw_epg, &mut record_issues) {
            Ok(epg) => {
                rejected.remove(&key);
                set.epgs.insert(key.clone(), epg);
            }
            Err(reason) => {
                warn!("Excluding EPG {}: {}", key, reason);
                set.epgs.remove(&key);
                record_issues.push(DataQualityIssue::IncompleteEpg {
                    epg: key.clone(),
                    reason,
                });
                rejected.insert(key.clone());
            }
        }
        epg_issues.insert(key, record_issues);
    }
    issues.extend(epg_issues.into_values().flatten());

    for raw_subnet in raw
        .subnets
        .iter()
        .filter(|s| set.tenants.contains_key(&s.tenant))
    {
        let epg_key = EpgKey::new(&raw_subnet.tenant, &raw_subnet.epg);
        let Some(epg) = set.epgs.get(&epg_key) else {
            if !rejected.contains(&epg_key) {
                warn!(
                    "Subnet {} references unknown EPG {}",
                    raw_subnet.ip, epg_key
                );
                issues.push(DataQualityIssue::IncompleteEpg {
                    epg: epg_key,
                    reason: IncompleteReason::OrphanSubnet(raw_subnet.ip.clone()),
                });
            }
            continue;
        };

        let cidr = match Cidr::new(&raw_subnet.ip) {
            Ok(cidr) => cidr,
            Err(e) => {
                warn!("Skipping subnet {} on EPG {}: {}", raw_subnet.ip, epg_key, e);
                issues.push(DataQualityIssue::InvalidSubnet {
                    epg: epg_key,
                    ip: raw_subnet.ip.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let subnet = Subnet {
            epg: epg_key.clone(),
            cidr,
            scope: subnet_scope(epg, raw_subnet),
            description: non_blank(raw_subnet.description.as_deref()),
        };
        set.subnets.entry(epg_key).or_default().insert(cidr, subnet);
    }

    issues.sort();
    issues.dedup();
    set.issues = issues;

    debug!(
        "Normalized {} tenants, {} VRFs, {} contracts, {} EPGs, {} subnets ({} issues)",
        set.tenants.len(),
        set.vrfs.len(),
        set.contracts.len(),
        set.epgs.len(),
        set.subnet_count(),
        set.issues.len()
    );

    set
}

/// Reference lookups against the entities normalized so far
struct Resolver<'a> {
    vrfs: &'a BTreeMap<VrfKey, Vrf>,
    /// VRFs of excluded tenants, referenced but not kept
    excluded_vrfs: &'a BTreeSet<VrfKey>,
    contracts: &'a BTreeMap<ContractKey, Contract>,
    interfaces: &'a BTreeMap<(String, String), Option<String>>,
}

impl Resolver<'_> {
    fn epg(&self, raw: &RawEpg, issues: &mut Vec<DataQualityIssue>) -> Result<Epg, IncompleteReason> {
        let key = EpgKey::new(&raw.tenant, &raw.name);
        let l3out = non_blank(raw.l3out.as_deref());
        let vrf = non_blank(raw.vrf.as_deref());

        // An L3Out association wins: the VRF of an external EPG belongs to
        // its L3Out, not to the EPG.
        let kind = match (l3out, vrf) {
            (Some(l3out), _) => EpgKind::External { l3out },
            (None, Some(vrf)) => EpgKind::Internal {
                vrf: self
                    .vrf(&vrf, &raw.tenant)
                    .ok_or(IncompleteReason::UnresolvedVrf(vrf))?,
            },
            (None, None) => return Err(IncompleteReason::NoVrfOrL3Out),
        };

        let mut provided = BTreeSet::new();
        for reference in &raw.provided {
            self.collect_contract(&key, Role::Provider, reference, &mut provided, issues);
        }

        let mut consumed = BTreeSet::new();
        for reference in &raw.consumed {
            self.collect_contract(&key, Role::Consumer, reference, &mut consumed, issues);
        }
        for reference in &raw.consumed_interfaces {
            match self.interface(reference, &raw.tenant) {
                Some(contract) => {
                    consumed.insert(contract);
                }
                None => unresolved(&key, Role::Consumer, reference, issues),
            }
        }

        Ok(Epg {
            key,
            kind,
            application_profile: non_blank(raw.application_profile.as_deref()),
            description: non_blank(raw.description.as_deref()),
            provided,
            consumed,
        })
    }

    fn collect_contract(
        &self,
        epg: &EpgKey,
        role: Role,
        reference: &str,
        into: &mut BTreeSet<ContractKey>,
        issues: &mut Vec<DataQualityIssue>,
    ) {
        if reference.trim().is_empty() {
            return;
        }
        match self.contract(reference, epg.tenant()) {
            Some(key) => {
                into.insert(key);
            }
            None => unresolved(epg, role, reference, issues),
        }
    }

    /// Resolve a VRF reference; `None` unless the VRF is in the snapshot
    fn vrf(&self, reference: &str, tenant: &str) -> Option<VrfKey> {
        let key = if Dn::looks_like_dn(reference) {
            match Dn::parse(reference).ok()? {
                Dn::Vrf { tenant, name } => VrfKey::new(tenant, name),
                _ => return None,
            }
        } else {
            match split_qualified(reference)? {
                (Some(tenant), name) => VrfKey::new(tenant, name),
                (None, name) => {
                    return [tenant, COMMON_TENANT]
                        .into_iter()
                        .map(|t| VrfKey::new(t, name))
                        .find(|key| self.knows_vrf(key));
                }
            }
        };
        self.knows_vrf(&key).then_some(key)
    }

    fn knows_vrf(&self, key: &VrfKey) -> bool {
        self.vrfs.contains_key(key) || self.excluded_vrfs.contains(key)
    }

    /// Resolve a contract reference to a key in the contract's home tenant
    ///
    /// A well-formed reference to a contract missing from the snapshot still
    /// yields its key; the graph builder reports those. `None` means the
    /// reference could not be interpreted at all.
    fn contract(&self, reference: &str, tenant: &str) -> Option<ContractKey> {
        if Dn::looks_like_dn(reference) {
            return match Dn::parse(reference).ok()? {
                Dn::Contract { tenant, name } => Some(ContractKey::new(tenant, name)),
                Dn::ContractInterface { .. } => self.interface(reference, tenant),
                _ => None,
            };
        }
        match split_qualified(reference)? {
            (Some(tenant), name) => Some(ContractKey::new(tenant, name)),
            (None, name) => Some(
                self.first_present(self.contracts, tenant, name, |t, n| ContractKey::new(t, n))
                    .unwrap_or_else(|| ContractKey::new(tenant, name)),
            ),
        }
    }

    /// Follow a contract interface to the exported contract behind it
    fn interface(&self, reference: &str, tenant: &str) -> Option<ContractKey> {
        let (cif_tenant, cif_name) = if Dn::looks_like_dn(reference) {
            match Dn::parse(reference).ok()? {
                Dn::ContractInterface { tenant, name } => (tenant, name),
                _ => return None,
            }
        } else {
            match split_qualified(reference)? {
                (Some(t), name) => (t.to_string(), name.to_string()),
                (None, name) => (tenant.to_string(), name.to_string()),
            }
        };

        let target = self.interfaces.get(&(cif_tenant.clone(), cif_name))?.as_deref()?;
        if Dn::looks_like_dn(target) {
            match Dn::parse(target).ok()? {
                Dn::Contract { tenant, name } => Some(ContractKey::new(tenant, name)),
                _ => None,
            }
        } else {
            match split_qualified(target)? {
                (Some(t), name) => Some(ContractKey::new(t, name)),
                (None, name) => Some(ContractKey::new(cif_tenant, name)),
            }
        }
    }

    /// Own tenant first, then `common`
    fn first_present<T, V>(
        &self,
        map: &BTreeMap<T, V>,
        tenant: &str,
        name: &str,
        make: fn(&str, &str) -> T,
    ) -> Option<T>
    where
        T: Ord,
    {
        [tenant, COMMON_TENANT]
            .into_iter()
            .map(|t| make(t, name))
            .find(|key| map.contains_key(key))
    }
}

fn unresolved(epg: &EpgKey, role: Role, reference: &str, issues: &mut Vec<DataQualityIssue>) {
    warn!("EPG {} has an unresolvable {} reference {}", epg, role, reference);
    issues.push(DataQualityIssue::UnresolvedReference {
        epg: epg.clone(),
        role,
        reference: reference.to_string(),
    });
}

/// `name` or `tenant/name`; anything else is rejected
fn split_qualified(reference: &str) -> Option<(Option<&str>, &str)> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    match reference.split_once('/') {
        None => Some((None, reference)),
        Some((tenant, name)) if !tenant.is_empty() && !name.is_empty() && !name.contains('/') => {
            Some((Some(tenant), name))
        }
        Some(_) => None,
    }
}

fn subnet_scope(epg: &Epg, raw: &RawSubnet) -> SubnetScope {
    match &epg.kind {
        EpgKind::Internal { .. } => SubnetScope::Internal,
        EpgKind::External { .. } => {
            let exported = raw
                .scope
                .as_deref()
                .is_some_and(|scope| scope.split(',').any(|flag| flag.trim() == "export-rtctrl"));
            if exported {
                SubnetScope::Exported
            } else {
                SubnetScope::External
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
