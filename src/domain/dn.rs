// Copyright (c) 2025 - Cowboy AI, Inc.
//! APIC Distinguished Names
//!
//! Every managed object on the controller is addressed by a DN built from
//! relative names (RNs) separated by `/`, e.g. `uni/tn-Prod/ap-App/epg-Web`.
//! Some RNs embed bracketed values containing `/` (`subnet-[10.0.0.1/24]`),
//! so splitting honours brackets.
//!
//! Only the object classes the inventory reads are recognised.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// DN parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnError {
    #[error("DN is not rooted at uni/: {0}")]
    NotUnderUni(String),

    #[error("Malformed DN: {0}")]
    Malformed(String),

    #[error("Unsupported DN: {0}")]
    Unsupported(String),
}

/// Parsed DN of an object the inventory cares about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dn {
    /// `uni/tn-{tenant}`
    Tenant { tenant: String },
    /// `uni/tn-{tenant}/ctx-{name}`
    Vrf { tenant: String, name: String },
    /// `uni/tn-{tenant}/BD-{name}`
    BridgeDomain { tenant: String, name: String },
    /// `uni/tn-{tenant}/brc-{name}`
    Contract { tenant: String, name: String },
    /// `uni/tn-{tenant}/cif-{name}`
    ContractInterface { tenant: String, name: String },
    /// `uni/tn-{tenant}/ap-{app_profile}/epg-{name}`
    Epg {
        tenant: String,
        app_profile: String,
        name: String,
    },
    /// `uni/tn-{tenant}/out-{l3out}/instP-{name}`
    ExternalEpg {
        tenant: String,
        l3out: String,
        name: String,
    },
}

impl Dn {
    pub fn parse(dn: &str) -> Result<Self, DnError> {
        let rns = split_rns(dn).ok_or_else(|| DnError::Malformed(dn.to_string()))?;

        let mut rns = rns.into_iter();
        if rns.next() != Some("uni") {
            return Err(DnError::NotUnderUni(dn.to_string()));
        }

        let tenant = rns
            .next()
            .and_then(|rn| rn.strip_prefix("tn-"))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DnError::Unsupported(dn.to_string()))?
            .to_string();

        let rest: Vec<&str> = rns.collect();
        let unsupported = || DnError::Unsupported(dn.to_string());

        let parsed = match rest.as_slice() {
            [] => Dn::Tenant { tenant },
            [rn] => {
                let (prefix, name) = rn.split_once('-').ok_or_else(unsupported)?;
                let name = non_empty(name).ok_or_else(unsupported)?;
                match prefix {
                    "ctx" => Dn::Vrf { tenant, name },
                    "BD" => Dn::BridgeDomain { tenant, name },
                    "brc" => Dn::Contract { tenant, name },
                    "cif" => Dn::ContractInterface { tenant, name },
                    _ => return Err(unsupported()),
                }
            }
            [parent, rn] => {
                let (parent_prefix, parent_name) =
                    parent.split_once('-').ok_or_else(unsupported)?;
                let (prefix, name) = rn.split_once('-').ok_or_else(unsupported)?;
                let parent_name = non_empty(parent_name).ok_or_else(unsupported)?;
                let name = non_empty(name).ok_or_else(unsupported)?;
                match (parent_prefix, prefix) {
                    ("ap", "epg") => Dn::Epg {
                        tenant,
                        app_profile: parent_name,
                        name,
                    },
                    ("out", "instP") => Dn::ExternalEpg {
                        tenant,
                        l3out: parent_name,
                        name,
                    },
                    _ => return Err(unsupported()),
                }
            }
            _ => return Err(unsupported()),
        };

        Ok(parsed)
    }

    /// Tenant segment shared by every recognised DN
    pub fn tenant(&self) -> &str {
        match self {
            Dn::Tenant { tenant }
            | Dn::Vrf { tenant, .. }
            | Dn::BridgeDomain { tenant, .. }
            | Dn::Contract { tenant, .. }
            | Dn::ContractInterface { tenant, .. }
            | Dn::Epg { tenant, .. }
            | Dn::ExternalEpg { tenant, .. } => tenant,
        }
    }

    /// Leaf object name (tenant name for tenant DNs)
    pub fn name(&self) -> &str {
        match self {
            Dn::Tenant { tenant } => tenant,
            Dn::Vrf { name, .. }
            | Dn::BridgeDomain { name, .. }
            | Dn::Contract { name, .. }
            | Dn::ContractInterface { name, .. }
            | Dn::Epg { name, .. }
            | Dn::ExternalEpg { name, .. } => name,
        }
    }

    pub fn looks_like_dn(value: &str) -> bool {
        value.starts_with("uni/")
    }
}

impl FromStr for Dn {
    type Err = DnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dn::Tenant { tenant } => write!(f, "uni/tn-{}", tenant),
            Dn::Vrf { tenant, name } => write!(f, "uni/tn-{}/ctx-{}", tenant, name),
            Dn::BridgeDomain { tenant, name } => write!(f, "uni/tn-{}/BD-{}", tenant, name),
            Dn::Contract { tenant, name } => write!(f, "uni/tn-{}/brc-{}", tenant, name),
            Dn::ContractInterface { tenant, name } => {
                write!(f, "uni/tn-{}/cif-{}", tenant, name)
            }
            Dn::Epg {
                tenant,
                app_profile,
                name,
            } => write!(f, "uni/tn-{}/ap-{}/epg-{}", tenant, app_profile, name),
            Dn::ExternalEpg {
                tenant,
                l3out,
                name,
            } => write!(f, "uni/tn-{}/out-{}/instP-{}", tenant, l3out, name),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a DN into RNs, ignoring `/` inside `[...]`
fn split_rns(dn: &str) -> Option<Vec<&str>> {
    let mut rns = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (idx, ch) in dn.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1)?,
            '/' if depth == 0 => {
                if idx == start {
                    return None;
                }
                rns.push(&dn[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || start >= dn.len() {
        return None;
    }
    rns.push(&dn[start..]);
    Some(rns)
}
