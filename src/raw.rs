// Copyright (c) 2025 - Cowboy AI, Inc.
//! Raw fabric records
//!
//! Flat records as they come out of the collector, before normalization.
//! Fields are plain strings; references to other objects may be bare names,
//! `tenant/name` pairs or full APIC DNs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTenant {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVrf {
    pub tenant: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContract {
    pub tenant: String,
    pub name: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Contract interface (`vzCPIf`): a tenant-local alias of an exported contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContractInterface {
    pub tenant: String,
    pub name: String,
    /// Exported contract the interface points at
    #[serde(default)]
    pub contract: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEpg {
    pub tenant: String,
    pub name: String,
    #[serde(default)]
    pub application_profile: Option<String>,
    /// VRF resolved through the bridge domain; absent for external EPGs
    #[serde(default)]
    pub vrf: Option<String>,
    /// Owning L3Out for external EPGs
    #[serde(default)]
    pub l3out: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub provided: Vec<String>,
    #[serde(default)]
    pub consumed: Vec<String>,
    /// Consumed contract interfaces (`fvRsConsIf`)
    #[serde(default)]
    pub consumed_interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubnet {
    pub tenant: String,
    pub epg: String,
    pub ip: String,
    #[serde(default)]
    pub description: Option<String>,
    /// APIC scope flags, e.g. `import-security,export-rtctrl`
    #[serde(default)]
    pub scope: Option<String>,
}

/// Everything fetched from one fabric
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub tenants: Vec<RawTenant>,
    #[serde(default)]
    pub vrfs: Vec<RawVrf>,
    #[serde(default)]
    pub contracts: Vec<RawContract>,
    #[serde(default)]
    pub contract_interfaces: Vec<RawContractInterface>,
    #[serde(default)]
    pub epgs: Vec<RawEpg>,
    #[serde(default)]
    pub subnets: Vec<RawSubnet>,
}

impl RawSnapshot {
    pub fn record_count(&self) -> usize {
        self.tenants.len()
            + self.vrfs.len()
            + self.contracts.len()
            + self.contract_interfaces.len()
            + self.epgs.len()
            + self.subnets.len()
    }
}
