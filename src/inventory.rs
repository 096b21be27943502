// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-fabric inventory
//!
//! One independent [`Graph`] per fabric, keyed by fabric name. Entities are
//! never merged across fabrics; multi-fabric queries yield one outcome per
//! fabric, lazily, in fabric-name order.
//!
//! # Collection
//!
//! ```text
//! configs ──buffer_unordered(max)──> connect → login → collect → normalize → build
//!                                       │        │        │
//!                                       └────────┴────────┴──> FabricBuildFailure
//! ```
//!
//! A failed fabric is recorded and logged; the others proceed.

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::client::{collect_snapshot, ClientResult, FabricClient};
use crate::config::{FabricConfig, TenantFilter};
use crate::domain::Contract;
use crate::errors::{FabricBuildFailure, FabricResult, QueryError, QueryResult};
use crate::graph::Graph;
use crate::normalize::normalize;
use crate::query::{ContractDetail, EpgRelationships, GraphQuery, TenantSummary};

/// Which fabrics a query runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FabricSelector {
    All,
    One(String),
}

impl FromStr for FabricSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(FabricSelector::All)
        } else {
            Ok(FabricSelector::One(s.to_string()))
        }
    }
}

impl fmt::Display for FabricSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FabricSelector::All => f.write_str("all"),
            FabricSelector::One(name) => f.write_str(name),
        }
    }
}

/// Query result for one fabric
#[derive(Debug)]
pub struct FabricOutcome<'a, T> {
    pub fabric: &'a str,
    pub result: QueryResult<T>,
}

/// Per-fabric graphs and failures of one run
#[derive(Debug, Default)]
pub struct Inventory {
    fabrics: BTreeMap<String, FabricResult<Graph>>,
}

impl FromIterator<(String, FabricResult<Graph>)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, FabricResult<Graph>)>>(iter: I) -> Self {
        Self {
            fabrics: iter.into_iter().collect(),
        }
    }
}

impl Inventory {
    /// Fetch and build every configured fabric, at most `max_concurrent` at
    /// a time
    ///
    /// `connect` creates the client for one fabric; each fabric gets its own
    /// session. The whole fetch of a fabric, login included, runs under its
    /// `fetch_timeout`.
    pub async fn collect<C, F>(
        configs: &[FabricConfig],
        filter: &TenantFilter,
        max_concurrent: usize,
        connect: F,
    ) -> Self
    where
        C: FabricClient,
        F: Fn(&FabricConfig) -> ClientResult<C>,
    {
        info!(
            "Collecting {} fabrics ({} at a time)",
            configs.len(),
            max_concurrent.max(1)
        );

        let connect = &connect;
        let results: Vec<(String, FabricResult<Graph>)> = stream::iter(configs)
            .map(|config| async move {
                let result = build_fabric(config, filter, connect).await;
                if let Err(failure) = &result {
                    error!("{}", failure);
                }
                (config.name.clone(), result)
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        results.into_iter().collect()
    }

    pub fn fabric_names(&self) -> impl Iterator<Item = &str> {
        self.fabrics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fabrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fabrics.is_empty()
    }

    pub fn graph(&self, fabric: &str) -> QueryResult<&Graph> {
        match self.fabrics.get(fabric) {
            Some(Ok(graph)) => Ok(graph),
            Some(Err(failure)) => Err(unavailable(fabric, failure)),
            None => Err(QueryError::UnknownFabric(fabric.to_string())),
        }
    }

    /// Built graphs in fabric-name order
    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.fabrics.values().filter_map(|r| r.as_ref().ok())
    }

    /// Fabrics whose build failed
    pub fn failures(&self) -> impl Iterator<Item = &FabricBuildFailure> {
        self.fabrics.values().filter_map(|r| r.as_ref().err())
    }

    /// Fabrics matched by `selector`; an unknown single fabric is an error
    pub fn select<'a>(
        &'a self,
        selector: &FabricSelector,
    ) -> QueryResult<Box<dyn Iterator<Item = (&'a str, &'a FabricResult<Graph>)> + 'a>> {
        match selector {
            FabricSelector::All => Ok(Box::new(
                self.fabrics.iter().map(|(name, result)| (name.as_str(), result)),
            )),
            FabricSelector::One(name) => {
                let (name, result) = self
                    .fabrics
                    .get_key_value(name.as_str())
                    .ok_or_else(|| QueryError::UnknownFabric(name.clone()))?;
                Ok(Box::new(std::iter::once((name.as_str(), result))))
            }
        }
    }

    pub fn list_tenants<'a>(
        &'a self,
        selector: &FabricSelector,
    ) -> QueryResult<impl Iterator<Item = FabricOutcome<'a, Vec<TenantSummary<'a>>>> + 'a> {
        self.per_fabric(selector, |query| Ok(query.list_tenants()))
    }

    pub fn list_contracts<'a>(
        &'a self,
        selector: &FabricSelector,
        tenant: Option<&str>,
    ) -> QueryResult<impl Iterator<Item = FabricOutcome<'a, Vec<&'a Contract>>> + 'a> {
        let tenant = tenant.map(str::to_string);
        self.per_fabric(selector, move |query| Ok(query.list_contracts(tenant.as_deref())))
    }

    pub fn get_contract_detail<'a>(
        &'a self,
        selector: &FabricSelector,
        tenant: &str,
        name: &str,
    ) -> QueryResult<impl Iterator<Item = FabricOutcome<'a, ContractDetail<'a>>> + 'a> {
        let (tenant, name) = (tenant.to_string(), name.to_string());
        self.per_fabric(selector, move |query| query.get_contract_detail(&tenant, &name))
    }

    pub fn get_epg_relationships<'a>(
        &'a self,
        selector: &FabricSelector,
        tenant: &str,
        name: &str,
    ) -> QueryResult<impl Iterator<Item = FabricOutcome<'a, EpgRelationships<'a>>> + 'a> {
        let (tenant, name) = (tenant.to_string(), name.to_string());
        self.per_fabric(selector, move |query| query.get_epg_relationships(&tenant, &name))
    }

    fn per_fabric<'a, T, F>(
        &'a self,
        selector: &FabricSelector,
        run: F,
    ) -> QueryResult<impl Iterator<Item = FabricOutcome<'a, T>> + 'a>
    where
        T: 'a,
        F: Fn(GraphQuery<'a>) -> QueryResult<T> + 'a,
    {
        Ok(self.select(selector)?.map(move |(fabric, result)| FabricOutcome {
            fabric,
            result: match result {
                Ok(graph) => run(graph.query()),
                Err(failure) => Err(unavailable(fabric, failure)),
            },
        }))
    }
}

fn unavailable(fabric: &str, failure: &FabricBuildFailure) -> QueryError {
    QueryError::FabricUnavailable {
        fabric: fabric.to_string(),
        reason: failure.to_string(),
    }
}

/// connect → login → collect (under the fetch timeout) → normalize → build
async fn build_fabric<C, F>(
    config: &FabricConfig,
    filter: &TenantFilter,
    connect: &F,
) -> FabricResult<Graph>
where
    C: FabricClient,
    F: Fn(&FabricConfig) -> ClientResult<C>,
{
    let fabric = config.name.clone();
    let mut client = connect(config).map_err(|source| FabricBuildFailure::Connect {
        fabric: fabric.clone(),
        source,
    })?;

    let fetch = async {
        client
            .login()
            .await
            .map_err(|source| FabricBuildFailure::Login {
                fabric: fabric.clone(),
                source,
            })?;
        collect_snapshot(&client)
            .await
            .map_err(|source| FabricBuildFailure::Fetch {
                fabric: fabric.clone(),
                source,
            })
    };

    let raw = tokio::time::timeout(config.fetch_timeout(), fetch)
        .await
        .map_err(|_| FabricBuildFailure::Timeout {
            fabric: fabric.clone(),
            seconds: config.fetch_timeout_secs,
        })??;

    let entities = normalize(&raw, filter);
    Ok(Graph::build(config.fabric(), entities))
}
