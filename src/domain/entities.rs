// Copyright (c) 2025 - Cowboy AI, Inc.
//! Canonical ACI entities
//!
//! These are the normalized objects a fabric snapshot is made of. They are
//! built once by the normalizer and never mutated afterwards.
//!
//! Cross-tenant references are always carried as keys. An EPG in tenant
//! `Web` consuming `common/shared-dns` stores the [`ContractKey`]
//! `common/shared-dns`; the contract itself lives only in its home tenant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::keys::ScopedName;
use super::network::Cidr;

pub type VrfKey = ScopedName<Vrf>;
pub type ContractKey = ScopedName<Contract>;
pub type EpgKey = ScopedName<Epg>;

/// A controller and the name it is known by in the run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fabric {
    pub name: String,
    pub endpoint: String,
}

impl Fabric {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Layer-3 routing domain (`fvCtx`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    pub key: VrfKey,
}

/// Contract visibility as configured on `vzBrCP`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContractScope {
    ApplicationProfile,
    #[default]
    Context,
    Tenant,
    Global,
}

impl ContractScope {
    /// Parse the APIC attribute value; unknown values yield `None`
    pub fn from_apic(value: &str) -> Option<Self> {
        match value {
            "application-profile" => Some(Self::ApplicationProfile),
            "context" => Some(Self::Context),
            "tenant" => Some(Self::Tenant),
            "global" => Some(Self::Global),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationProfile => "application-profile",
            Self::Context => "context",
            Self::Tenant => "tenant",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for ContractScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract in its home tenant (`vzBrCP`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub key: ContractKey,
    pub scope: ContractScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Contract {
    pub fn tenant(&self) -> &str {
        self.key.tenant()
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }
}

/// How an EPG attaches to the routed fabric
///
/// Internal EPGs sit in a VRF through their bridge domain. External EPGs
/// (`l3extInstP`) hang off an L3Out instead and carry no VRF of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EpgKind {
    Internal { vrf: VrfKey },
    External { l3out: String },
}

/// Endpoint group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epg {
    pub key: EpgKey,
    pub kind: EpgKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contracts this EPG provides, possibly owned by other tenants
    #[serde(default)]
    pub provided: BTreeSet<ContractKey>,
    /// Contracts this EPG consumes, possibly owned by other tenants
    #[serde(default)]
    pub consumed: BTreeSet<ContractKey>,
}

impl Epg {
    pub fn tenant(&self) -> &str {
        self.key.tenant()
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn is_external(&self) -> bool {
        matches!(self.kind, EpgKind::External { .. })
    }

    /// VRF membership; `None` for external EPGs
    pub fn vrf(&self) -> Option<&VrfKey> {
        match &self.kind {
            EpgKind::Internal { vrf } => Some(vrf),
            EpgKind::External { .. } => None,
        }
    }

    pub fn l3out(&self) -> Option<&str> {
        match &self.kind {
            EpgKind::External { l3out } => Some(l3out),
            EpgKind::Internal { .. } => None,
        }
    }

    /// Contracts declared for one role
    pub fn contracts(&self, role: Role) -> &BTreeSet<ContractKey> {
        match role {
            Role::Provider => &self.provided,
            Role::Consumer => &self.consumed,
        }
    }
}

/// Where a subnet is advertised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetScope {
    /// Bridge domain or EPG subnet of an internal EPG
    Internal,
    /// L3Out classification subnet
    External,
    /// L3Out subnet with `export-rtctrl`
    Exported,
}

impl SubnetScope {
    /// Short tag used in reports
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Internal => "int",
            Self::External => "ext",
            Self::Exported => "exp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub epg: EpgKey,
    pub cidr: Cidr,
    pub scope: SubnetScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Provider,
    Consumer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Provider, Role::Consumer];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Provider => f.write_str("provider"),
            Role::Consumer => f.write_str("consumer"),
        }
    }
}

/// Graph edge: one EPG holding one role on one contract
///
/// `epg.tenant()` and `contract.tenant()` differ for exported contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractBinding {
    pub contract: ContractKey,
    pub epg: EpgKey,
    pub role: Role,
}

impl ContractBinding {
    pub fn is_cross_tenant(&self) -> bool {
        self.contract.tenant() != self.epg.tenant()
    }
}
