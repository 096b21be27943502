// Copyright (c) 2025 - Cowboy AI, Inc.
//! ACI contract relationship inventory
//!
//! Read-only inventory of which EPGs provide and consume which contracts on
//! one or more Cisco ACI fabrics.
//!
//! ```text
//! FabricClient ─> RawSnapshot ─normalize─> EntitySet ─build─> Graph ─query─> report
//! ```
//!
//! - [`client`] - APIC session and paged snapshot collection
//! - [`normalize`] - raw records to canonical, tenant-scoped entities
//! - [`graph`] - provider/consumer bindings and indexes of one fabric
//! - [`query`] - read-only lookups over a graph
//! - [`inventory`] - per-fabric graphs and multi-fabric queries
//! - [`report`] - text rendering of query results

pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod inventory;
pub mod normalize;
pub mod query;
pub mod raw;
pub mod report;

// Re-export commonly used types
pub use client::{ClientError, ClientResult, CollectError, FabricClient};
pub use config::{ConfigError, FabricConfig, InventoryConfig, TenantFilter};
pub use errors::{DataQualityIssue, FabricBuildFailure, QueryError, QueryResult};
pub use graph::{BuildReport, Graph};
pub use inventory::{FabricOutcome, FabricSelector, Inventory};
pub use normalize::{normalize, EntitySet};
pub use query::{ContractDetail, EpgRelationships, GraphQuery};
pub use raw::RawSnapshot;
