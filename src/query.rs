// Copyright (c) 2025 - Cowboy AI, Inc.
//! Query Engine
//!
//! Read-only lookups over one built [`Graph`]. Results borrow from the graph
//! and come back in deterministic order: tenant name, then object name.
//!
//! A lookup that matches nothing returns [`QueryError::NotFound`]. That is a
//! normal outcome for a mistyped name, not a fault.

use serde::Serialize;

use crate::domain::{Contract, ContractKey, Epg, EpgKey, Subnet, Tenant, Vrf};
use crate::errors::{ObjectKind, QueryError, QueryResult};
use crate::graph::{BuildReport, Graph};

/// EPG together with its resolved subnets
#[derive(Debug, Clone, Serialize)]
pub struct EpgView<'g> {
    pub epg: &'g Epg,
    pub subnets: Vec<&'g Subnet>,
}

/// A contract and everything bound to it
#[derive(Debug, Clone, Serialize)]
pub struct ContractDetail<'g> {
    pub contract: &'g Contract,
    pub providers: Vec<EpgView<'g>>,
    pub consumers: Vec<EpgView<'g>>,
}

impl ContractDetail<'_> {
    pub fn is_unbound(&self) -> bool {
        self.providers.is_empty() && self.consumers.is_empty()
    }
}

/// Contracts an EPG provides and consumes
#[derive(Debug, Clone, Serialize)]
pub struct EpgRelationships<'g> {
    pub epg: &'g Epg,
    pub provided: Vec<&'g Contract>,
    pub consumed: Vec<&'g Contract>,
}

/// Tenant with the VRFs it owns
#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary<'g> {
    pub tenant: &'g Tenant,
    pub vrfs: Vec<&'g Vrf>,
    pub contract_count: usize,
    pub epg_count: usize,
}

/// Read-only query interface over one graph
#[derive(Debug, Clone, Copy)]
pub struct GraphQuery<'g> {
    graph: &'g Graph,
}

impl<'g> GraphQuery<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn fabric(&self) -> &'g str {
        &self.graph.fabric().name
    }

    pub fn build_report(&self) -> &'g BuildReport {
        self.graph.report()
    }

    /// Tenants in name order
    pub fn list_tenants(&self) -> Vec<TenantSummary<'g>> {
        let entities = &self.graph.entities;
        self.graph
            .by_tenant
            .iter()
            .filter_map(|(name, members)| {
                let tenant = entities.tenants.get(name)?;
                Some(TenantSummary {
                    tenant,
                    vrfs: members
                        .vrfs
                        .iter()
                        .filter_map(|key| entities.vrfs.get(key))
                        .collect(),
                    contract_count: members.contracts.len(),
                    epg_count: members.epgs.len(),
                })
            })
            .collect()
    }

    /// Contracts ordered by tenant, then name; `tenant` restricts to one
    /// home tenant
    pub fn list_contracts(&self, tenant: Option<&str>) -> Vec<&'g Contract> {
        let entities = &self.graph.entities;
        match tenant {
            Some(tenant) => self
                .graph
                .by_tenant
                .get(tenant)
                .map(|members| {
                    members
                        .contracts
                        .iter()
                        .filter_map(|key| entities.contracts.get(key))
                        .collect()
                })
                .unwrap_or_default(),
            None => entities.contracts.values().collect(),
        }
    }

    /// Contract with its providers and consumers, subnets resolved
    pub fn get_contract_detail(&self, tenant: &str, name: &str) -> QueryResult<ContractDetail<'g>> {
        let key = ContractKey::new(tenant, name);
        let contract = self
            .graph
            .entities
            .contracts
            .get(&key)
            .ok_or_else(|| QueryError::not_found(ObjectKind::Contract, tenant, name))?;

        let (providers, consumers) = match self.graph.by_contract.get(&key) {
            Some(sets) => (self.epg_views(&sets.providers), self.epg_views(&sets.consumers)),
            None => (Vec::new(), Vec::new()),
        };

        Ok(ContractDetail {
            contract,
            providers,
            consumers,
        })
    }

    /// Contracts an EPG provides and consumes, wherever they live
    pub fn get_epg_relationships(&self, tenant: &str, name: &str) -> QueryResult<EpgRelationships<'g>> {
        let key = EpgKey::new(tenant, name);
        let epg = self
            .graph
            .entities
            .epgs
            .get(&key)
            .ok_or_else(|| QueryError::not_found(ObjectKind::Epg, tenant, name))?;

        let (provided, consumed) = match self.graph.by_epg.get(&key) {
            Some(sets) => (self.contracts(&sets.providers), self.contracts(&sets.consumers)),
            None => (Vec::new(), Vec::new()),
        };

        Ok(EpgRelationships {
            epg,
            provided,
            consumed,
        })
    }

    /// EPGs of one tenant with their subnets
    pub fn list_epgs(&self, tenant: &str) -> QueryResult<Vec<EpgView<'g>>> {
        let members = self
            .graph
            .by_tenant
            .get(tenant)
            .ok_or_else(|| QueryError::not_found(ObjectKind::Tenant, tenant, tenant))?;
        Ok(self.epg_views(&members.epgs))
    }

    fn epg_views<'k>(&self, keys: impl IntoIterator<Item = &'k EpgKey>) -> Vec<EpgView<'g>> {
        let entities = &self.graph.entities;
        keys.into_iter()
            .filter_map(|key| {
                let epg = entities.epgs.get(key)?;
                Some(EpgView {
                    epg,
                    subnets: entities.subnets_of(key).collect(),
                })
            })
            .collect()
    }

    fn contracts<'k>(&self, keys: impl IntoIterator<Item = &'k ContractKey>) -> Vec<&'g Contract> {
        keys.into_iter()
            .filter_map(|key| self.graph.entities.contracts.get(key))
            .collect()
    }
}
