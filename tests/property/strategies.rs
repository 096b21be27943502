// Copyright (c) 2025 - Cowboy AI, Inc.
//! Snapshot generators
//!
//! Names come from small pools so references collide often: bare names hit
//! the own tenant or `common`, qualified names cross tenants, and some
//! references point at nothing.

use proptest::prelude::*;
use std::collections::BTreeMap;

use aci_inventory::raw::{RawContract, RawEpg, RawSnapshot, RawSubnet, RawTenant, RawVrf};

pub const TENANTS: [&str; 5] = ["Prod", "Dev", "Shared", "common", "mgmt"];
const VRFS: [&str; 3] = ["V1", "V2", "V3"];
const CONTRACTS: [&str; 4] = ["web", "db", "dns", "any"];
const EPGS: [&str; 5] = ["App", "Web", "Db", "Ext", "Lab"];

fn tenant_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(&TENANTS[..])
}

/// `name`, `tenant/name` or a brc- DN
fn contract_reference() -> impl Strategy<Value = String> {
    let name = prop::sample::select(&CONTRACTS[..]);
    prop_oneof![
        name.clone().prop_map(str::to_string),
        (tenant_name(), name.clone()).prop_map(|(t, n)| format!("{}/{}", t, n)),
        (tenant_name(), name).prop_map(|(t, n)| format!("uni/tn-{}/brc-{}", t, n)),
    ]
}

fn vrf_reference() -> impl Strategy<Value = Option<String>> {
    let name = prop::sample::select(&VRFS[..]);
    prop_oneof![
        1 => Just(None),
        3 => name.clone().prop_map(|n| Some(n.to_string())),
        1 => (tenant_name(), name).prop_map(|(t, n)| Some(format!("{}/{}", t, n))),
    ]
}

fn raw_epg() -> impl Strategy<Value = RawEpg> {
    (
        tenant_name(),
        prop::sample::select(&EPGS[..]),
        vrf_reference(),
        prop::option::weighted(0.2, Just("WAN".to_string())),
        prop::collection::vec(contract_reference(), 0..3),
        prop::collection::vec(contract_reference(), 0..3),
    )
        .prop_map(|(tenant, name, vrf, l3out, provided, consumed)| RawEpg {
            tenant: tenant.to_string(),
            name: name.to_string(),
            vrf,
            l3out,
            provided,
            consumed,
            ..RawEpg::default()
        })
}

fn raw_subnet() -> impl Strategy<Value = RawSubnet> {
    (
        tenant_name(),
        prop::sample::select(&EPGS[..]),
        0u8..4,
        prop_oneof![Just(24u8), Just(16u8), Just(40u8)],
    )
        .prop_map(|(tenant, epg, octet, prefix)| RawSubnet {
            tenant: tenant.to_string(),
            epg: epg.to_string(),
            ip: format!("10.{}.0.0/{}", octet, prefix),
            description: None,
            scope: None,
        })
}

/// Snapshot whose records have unique identities
///
/// Repeated keys would make the outcome depend on record order, which is
/// the overwrite rule rather than a property.
pub fn raw_snapshot() -> impl Strategy<Value = RawSnapshot> {
    (
        prop::collection::btree_set(tenant_name(), 0..=TENANTS.len()),
        prop::collection::btree_set(
            (tenant_name(), prop::sample::select(&VRFS[..])),
            0..8,
        ),
        prop::collection::btree_set(
            (tenant_name(), prop::sample::select(&CONTRACTS[..])),
            0..10,
        ),
        prop::collection::vec(raw_epg(), 0..12),
        prop::collection::vec(raw_subnet(), 0..10),
    )
        .prop_map(|(tenants, vrfs, contracts, epgs, subnets)| {
            let epgs: BTreeMap<(String, String), RawEpg> = epgs
                .into_iter()
                .map(|e| ((e.tenant.clone(), e.name.clone()), e))
                .collect();
            let subnets: BTreeMap<(String, String, String), RawSubnet> = subnets
                .into_iter()
                .map(|s| ((s.tenant.clone(), s.epg.clone(), s.ip.clone()), s))
                .collect();

            RawSnapshot {
                tenants: tenants
                    .into_iter()
                    .map(|name| RawTenant {
                        name: name.to_string(),
                        description: None,
                    })
                    .collect(),
                vrfs: vrfs
                    .into_iter()
                    .map(|(tenant, name)| RawVrf {
                        tenant: tenant.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
                contracts: contracts
                    .into_iter()
                    .map(|(tenant, name)| RawContract {
                        tenant: tenant.to_string(),
                        name: name.to_string(),
                        scope: None,
                        description: None,
                    })
                    .collect(),
                contract_interfaces: Vec::new(),
                epgs: epgs.into_values().collect(),
                subnets: subnets.into_values().collect(),
            }
        })
}

/// The same snapshot with every record list reordered
pub fn shuffled(snapshot: RawSnapshot) -> impl Strategy<Value = RawSnapshot> {
    (
        Just(snapshot.tenants).prop_shuffle(),
        Just(snapshot.vrfs).prop_shuffle(),
        Just(snapshot.contracts).prop_shuffle(),
        Just(snapshot.epgs).prop_shuffle(),
        Just(snapshot.subnets).prop_shuffle(),
    )
        .prop_map(|(tenants, vrfs, contracts, epgs, subnets)| RawSnapshot {
            tenants,
            vrfs,
            contracts,
            contract_interfaces: Vec::new(),
            epgs,
            subnets,
        })
}

/// Snapshot paired with a reordering of itself
pub fn snapshot_and_shuffle() -> impl Strategy<Value = (RawSnapshot, RawSnapshot)> {
    raw_snapshot().prop_flat_map(|snapshot| (Just(snapshot.clone()), shuffled(snapshot)))
}
