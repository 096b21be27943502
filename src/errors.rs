// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory operations
//!
//! Problems in fabric data ([`DataQualityIssue`]) are values collected during
//! normalization and graph build; they never abort a build. Failures that do
//! abort are scoped to one fabric ([`FabricBuildFailure`]). Lookups that
//! match nothing return [`QueryError::NotFound`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::client::{ClientError, CollectError};
use crate::domain::{EpgKey, Role};

/// Why an EPG could not be placed in the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Error)]
pub enum IncompleteReason {
    /// Neither a VRF nor an L3Out association
    #[error("neither a VRF nor an L3Out is associated")]
    NoVrfOrL3Out,

    /// VRF reference that does not exist in the snapshot
    #[error("VRF {0} does not resolve")]
    UnresolvedVrf(String),

    /// Subnet whose owner EPG is not in the snapshot
    #[error("subnet {0} has no owning EPG in the snapshot")]
    OrphanSubnet(String),
}

/// Data-quality problem found while normalizing or building a fabric
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Error)]
pub enum DataQualityIssue {
    /// EPG (or subnet owner) that cannot be classified; excluded from the graph
    #[error("incomplete EPG {epg}: {reason}")]
    IncompleteEpg {
        epg: EpgKey,
        reason: IncompleteReason,
    },

    /// Binding naming a contract that is not in the snapshot; dropped
    #[error("EPG {epg} has an unresolved {role} reference to {reference}")]
    UnresolvedReference {
        epg: EpgKey,
        role: Role,
        reference: String,
    },

    /// Subnet address that does not parse; skipped
    #[error("invalid subnet {ip} on EPG {epg}: {reason}")]
    InvalidSubnet {
        epg: EpgKey,
        ip: String,
        reason: String,
    },
}

impl DataQualityIssue {
    pub fn is_unresolved_reference(&self) -> bool {
        matches!(self, DataQualityIssue::UnresolvedReference { .. })
    }

    pub fn is_incomplete_epg(&self) -> bool {
        matches!(self, DataQualityIssue::IncompleteEpg { .. })
    }
}

/// Failure that left one fabric without a usable graph
#[derive(Debug, Error)]
pub enum FabricBuildFailure {
    /// Client could not be constructed from the fabric config
    #[error("Failed to create client for fabric {fabric}: {source}")]
    Connect {
        fabric: String,
        #[source]
        source: ClientError,
    },

    /// Controller rejected or failed the login
    #[error("Login to fabric {fabric} failed: {source}")]
    Login {
        fabric: String,
        #[source]
        source: ClientError,
    },

    /// Fetching the snapshot failed
    #[error("Fetching fabric {fabric} failed: {source}")]
    Fetch {
        fabric: String,
        #[source]
        source: CollectError,
    },

    /// Fetch did not finish within the configured budget
    #[error("Fetching fabric {fabric} timed out after {seconds}s")]
    Timeout { fabric: String, seconds: u64 },
}

impl FabricBuildFailure {
    pub fn fabric(&self) -> &str {
        match self {
            FabricBuildFailure::Connect { fabric, .. }
            | FabricBuildFailure::Login { fabric, .. }
            | FabricBuildFailure::Fetch { fabric, .. }
            | FabricBuildFailure::Timeout { fabric, .. } => fabric,
        }
    }
}

/// Kind of object a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectKind {
    Tenant,
    Contract,
    Epg,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Tenant => f.write_str("tenant"),
            ObjectKind::Contract => f.write_str("contract"),
            ObjectKind::Epg => f.write_str("EPG"),
        }
    }
}

/// Lookup outcome other than a match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Nothing matched; an ordinary outcome for user-typed names
    #[error("{kind} {tenant}/{name} not found")]
    NotFound {
        kind: ObjectKind,
        tenant: String,
        name: String,
    },

    /// Fabric name not in the inventory
    #[error("Unknown fabric: {0}")]
    UnknownFabric(String),

    /// Fabric is known but its build failed
    #[error("Fabric {fabric} has no usable snapshot: {reason}")]
    FabricUnavailable { fabric: String, reason: String },
}

impl QueryError {
    pub fn not_found(kind: ObjectKind, tenant: &str, name: &str) -> Self {
        QueryError::NotFound {
            kind,
            tenant: tenant.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound { .. })
    }
}

/// Result type for graph lookups
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for a single fabric's pipeline
pub type FabricResult<T> = Result<T, FabricBuildFailure>;
