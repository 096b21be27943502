// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Contract Graph
//!
//! Every binding must point at entities that exist, and the two query
//! directions (contract to EPGs, EPG to contracts) must agree.

use aci_inventory::config::TenantFilter;
use aci_inventory::domain::{Fabric, Role};
use aci_inventory::raw::{RawContract, RawEpg, RawSnapshot, RawTenant, RawVrf};
use aci_inventory::{normalize, Graph};
use proptest::prelude::*;

use super::strategies::raw_snapshot;

fn build(snapshot: &RawSnapshot) -> Graph {
    let entities = normalize(snapshot, &TenantFilter::with_names(["mgmt"]));
    Graph::build(Fabric::new("PROP", "https://apic.example.net"), entities)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Bindings reference existing EPGs and contracts
    #[test]
    fn prop_bindings_reference_entities(snapshot in raw_snapshot()) {
        let graph = build(&snapshot);
        let entities = graph.entities();

        for binding in graph.bindings() {
            prop_assert!(entities.epg(&binding.epg).is_some(), "Missing EPG {}", binding.epg);
            prop_assert!(
                entities.contract(&binding.contract).is_some(),
                "Missing contract {}",
                binding.contract
            );
        }
    }

    /// Property: Every declared relation is either bound or counted as dropped
    #[test]
    fn prop_declared_relations_are_accounted_for(snapshot in raw_snapshot()) {
        let graph = build(&snapshot);
        let entities = graph.entities();
        let report = graph.report();

        let declared: usize = entities
            .epgs()
            .map(|epg| epg.provided.len() + epg.consumed.len())
            .sum();
        let unresolved_at_normalize = entities
            .issues()
            .iter()
            .filter(|issue| issue.is_unresolved_reference())
            .count();

        prop_assert_eq!(report.bindings, graph.bindings().count());
        prop_assert_eq!(
            declared,
            report.bindings + report.dropped_bindings - unresolved_at_normalize
        );
    }

    /// Property: Contract detail and EPG relationships agree
    #[test]
    fn prop_query_directions_agree(snapshot in raw_snapshot()) {
        let graph = build(&snapshot);
        let query = graph.query();

        for binding in graph.bindings() {
            let detail = query
                .get_contract_detail(binding.contract.tenant(), binding.contract.name())
                .unwrap();
            let relationships = query
                .get_epg_relationships(binding.epg.tenant(), binding.epg.name())
                .unwrap();

            let (epgs, contracts) = match binding.role {
                Role::Provider => (&detail.providers, &relationships.provided),
                Role::Consumer => (&detail.consumers, &relationships.consumed),
            };
            prop_assert!(epgs.iter().any(|view| view.epg.key == binding.epg));
            prop_assert!(contracts.iter().any(|c| c.key == binding.contract));
        }
    }

    /// Property: Detail lists hold no EPG without a matching binding
    #[test]
    fn prop_contract_detail_has_no_extra_epgs(snapshot in raw_snapshot()) {
        let graph = build(&snapshot);
        let query = graph.query();

        for contract in query.list_contracts(None) {
            let detail = query
                .get_contract_detail(contract.tenant(), contract.name())
                .unwrap();
            for (views, role) in [(&detail.providers, Role::Provider), (&detail.consumers, Role::Consumer)] {
                for view in views {
                    let has_binding = graph.bindings().any(|b| {
                        b.role == role && b.contract == contract.key && b.epg == view.epg.key
                    });
                    prop_assert!(has_binding);
                }
            }
        }
    }

    /// Property: Providing and consuming the same contract yields two bindings
    #[test]
    fn prop_self_reference_binds_both_roles(
        tenant in "[A-Z][a-z]{2,8}",
        contract in "[a-z][a-z0-9-]{0,10}",
        epg in "[A-Z][A-Za-z]{0,8}-EPG",
    ) {
        let snapshot = RawSnapshot {
            tenants: vec![RawTenant { name: tenant.clone(), description: None }],
            vrfs: vec![RawVrf { tenant: tenant.clone(), name: "VRF".to_string() }],
            contracts: vec![RawContract {
                tenant: tenant.clone(),
                name: contract.clone(),
                scope: None,
                description: None,
            }],
            epgs: vec![RawEpg {
                tenant: tenant.clone(),
                name: epg.clone(),
                vrf: Some("VRF".to_string()),
                provided: vec![contract.clone()],
                consumed: vec![contract.clone()],
                ..RawEpg::default()
            }],
            ..RawSnapshot::default()
        };

        let graph = build(&snapshot);
        let roles: Vec<Role> = graph.bindings().map(|b| b.role).collect();
        prop_assert_eq!(roles.len(), 2);
        prop_assert!(roles.contains(&Role::Provider));
        prop_assert!(roles.contains(&Role::Consumer));

        let detail = graph.query().get_contract_detail(&tenant, &contract).unwrap();
        prop_assert_eq!(detail.providers.len(), 1);
        prop_assert_eq!(detail.consumers.len(), 1);
        prop_assert_eq!(&detail.providers[0].epg.key, &detail.consumers[0].epg.key);
    }
}
