// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Normalizer
//!
//! Normalization is a pure function of the snapshot's contents: record order
//! and repeated records must not change the entity set.

use aci_inventory::config::TenantFilter;
use aci_inventory::domain::{ContractKey, EpgKey, EpgKind, Role};
use aci_inventory::normalize;
use proptest::prelude::*;

use super::strategies::{raw_snapshot, snapshot_and_shuffle, TENANTS};

// ============================================================================
// Strategies
// ============================================================================

fn tenant_filter() -> impl Strategy<Value = TenantFilter> {
    prop_oneof![
        Just(TenantFilter::default()),
        Just(TenantFilter::none()),
        Just(TenantFilter::with_names(["mgmt"])),
        Just(TenantFilter::none().with_prefix("D")),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Record order is irrelevant
    #[test]
    fn prop_normalize_ignores_record_order(
        (snapshot, reordered) in snapshot_and_shuffle(),
        filter in tenant_filter(),
    ) {
        prop_assert_eq!(
            normalize(&snapshot, &filter),
            normalize(&reordered, &filter),
            "Reordered records must normalize identically"
        );
    }

    /// Property: Repeated records collapse
    ///
    /// Paginated responses may deliver an object twice.
    #[test]
    fn prop_normalize_ignores_repeated_records(
        snapshot in raw_snapshot(),
        filter in tenant_filter(),
    ) {
        let mut doubled = snapshot.clone();
        doubled.tenants.extend(snapshot.tenants.iter().cloned());
        doubled.vrfs.extend(snapshot.vrfs.iter().cloned());
        doubled.contracts.extend(snapshot.contracts.iter().cloned());
        doubled.epgs.extend(snapshot.epgs.iter().cloned());
        doubled.subnets.extend(snapshot.subnets.iter().cloned());

        prop_assert_eq!(normalize(&snapshot, &filter), normalize(&doubled, &filter));
    }

    /// Property: Normalization is deterministic
    #[test]
    fn prop_normalize_is_deterministic(snapshot in raw_snapshot(), filter in tenant_filter()) {
        prop_assert_eq!(normalize(&snapshot, &filter), normalize(&snapshot, &filter));
    }

    /// Property: Excluded tenants leave nothing behind
    #[test]
    fn prop_excluded_tenants_are_absent(snapshot in raw_snapshot(), filter in tenant_filter()) {
        let set = normalize(&snapshot, &filter);

        for tenant in TENANTS.iter().filter(|t| filter.is_excluded(t)) {
            prop_assert!(set.tenant(tenant).is_none());
            prop_assert!(set.vrfs().all(|v| v.key.tenant() != *tenant));
            prop_assert!(set.contracts().all(|c| c.tenant() != *tenant));
            prop_assert!(set.epgs().all(|e| e.tenant() != *tenant));
            prop_assert!(set.subnets().all(|s| s.epg.tenant() != *tenant));
        }
    }

    /// Property: Every entity belongs to a kept tenant
    #[test]
    fn prop_entities_are_tenant_scoped(snapshot in raw_snapshot(), filter in tenant_filter()) {
        let set = normalize(&snapshot, &filter);

        for vrf in set.vrfs() {
            prop_assert!(set.tenant(vrf.key.tenant()).is_some());
        }
        for contract in set.contracts() {
            prop_assert!(set.tenant(contract.tenant()).is_some());
        }
        for epg in set.epgs() {
            prop_assert!(set.tenant(epg.tenant()).is_some());
        }
    }

    /// Property: Internal EPGs point at VRFs that exist
    ///
    /// The VRF is either kept or owned by an excluded tenant of the snapshot.
    #[test]
    fn prop_internal_epgs_have_known_vrf(snapshot in raw_snapshot(), filter in tenant_filter()) {
        let set = normalize(&snapshot, &filter);
        let vrfs: Vec<_> = set.vrfs().map(|v| &v.key).collect();

        for epg in set.epgs() {
            if let EpgKind::Internal { vrf } = &epg.kind {
                let referenced = filter.is_excluded(vrf.tenant())
                    && snapshot.tenants.iter().any(|t| t.name == vrf.tenant())
                    && snapshot
                        .vrfs
                        .iter()
                        .any(|v| v.tenant == vrf.tenant() && v.name == vrf.name());
                prop_assert!(
                    vrfs.contains(&vrf) || referenced,
                    "EPG {} has unknown VRF {}",
                    epg.key,
                    vrf
                );
            }
        }
    }

    /// Property: Subnets only hang off kept EPGs
    #[test]
    fn prop_subnets_have_owner(snapshot in raw_snapshot(), filter in tenant_filter()) {
        let set = normalize(&snapshot, &filter);

        for subnet in set.subnets() {
            prop_assert!(set.epg(&subnet.epg).is_some());
        }
    }

    /// Property: Data-quality issues are sorted and unique
    #[test]
    fn prop_issues_sorted_and_unique(snapshot in raw_snapshot(), filter in tenant_filter()) {
        let set = normalize(&snapshot, &filter);
        let issues = set.issues();

        prop_assert!(issues.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Property: Bare contract names resolve in the own tenant first
    #[test]
    fn prop_bare_contract_prefers_own_tenant(snapshot in raw_snapshot()) {
        let filter = TenantFilter::none();
        let set = normalize(&snapshot, &filter);

        for raw in &snapshot.epgs {
            let Some(epg) = set.epg(&EpgKey::new(&raw.tenant, &raw.name)) else {
                continue;
            };
            for (references, role) in [(&raw.provided, Role::Provider), (&raw.consumed, Role::Consumer)] {
                for name in references.iter().filter(|r| !r.contains('/')) {
                    let own = ContractKey::new(&raw.tenant, name);
                    if set.contract(&own).is_some() {
                        prop_assert!(epg.contracts(role).contains(&own));
                    }
                }
            }
        }
    }
}
