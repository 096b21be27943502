// Copyright (c) 2025 - Cowboy AI, Inc.
//! Snapshot collection
//!
//! Issues paged class queries through a [`FabricClient`] and decodes the
//! managed objects into a [`RawSnapshot`]. Decoding is pure: it works on
//! [`ManagedObject`] trees and never talks to the controller.
//!
//! Objects whose DN does not parse are skipped with a warning; only a
//! payload that is not a class-query response fails the fetch.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ClientError, FabricClient};
use crate::domain::Dn;
use crate::normalize::COMMON_TENANT;
use crate::raw::{
    RawContract, RawContractInterface, RawEpg, RawSnapshot, RawSubnet, RawTenant, RawVrf,
};

/// Objects requested per page
pub const PAGE_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Unexpected {class} payload: {reason}")]
    UnexpectedPayload { class: String, reason: String },
}

pub type CollectResult<T> = Result<T, CollectError>;

/// One APIC managed object with its returned children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedObject {
    pub class: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<ManagedObject>,
}

impl ManagedObject {
    /// Decode `{"<class>": {"attributes": {...}, "children": [...]}}`
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.len() != 1 {
            return None;
        }
        let (class, body) = object.iter().next()?;

        let attributes = body
            .get("attributes")
            .and_then(Value::as_object)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), v)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let children = body
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default();

        Some(Self {
            class: class.clone(),
            attributes,
            children,
        })
    }

    /// Attribute value, `None` when absent or empty
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn dn(&self) -> Option<Dn> {
        let raw = self.attr("dn")?;
        match Dn::parse(raw) {
            Ok(dn) => Some(dn),
            Err(e) => {
                warn!("Skipping {} with unparseable DN {}: {}", self.class, raw, e);
                None
            }
        }
    }

    pub fn children_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a ManagedObject> + 'a {
        self.children.iter().filter(move |child| child.class == class)
    }

    /// Relation target: `tDn` when present, else the named attribute
    fn target(&self, name_attr: &str) -> Option<String> {
        self.attr("tDn")
            .or_else(|| self.attr(name_attr))
            .map(str::to_string)
    }
}

/// Class query path for one page
pub fn class_query_path(class: &str, children: &[&str], page: usize) -> String {
    let mut path = format!("node/class/{}.json?page={}&page-size={}", class, page, PAGE_SIZE);
    if !children.is_empty() {
        path.push_str("&rsp-subtree=children&rsp-subtree-class=");
        path.push_str(&children.join(","));
    }
    path
}

/// Fetch every object of a class, following pages until `totalCount`
pub async fn fetch_class<C>(
    client: &C,
    class: &str,
    children: &[&str],
) -> CollectResult<Vec<ManagedObject>>
where
    C: FabricClient + ?Sized,
{
    let mut objects = Vec::new();
    let mut page = 0;

    loop {
        let body = client.get(&class_query_path(class, children, page)).await?;
        let imdata = body["imdata"]
            .as_array()
            .ok_or_else(|| CollectError::UnexpectedPayload {
                class: class.to_string(),
                reason: "missing imdata".to_string(),
            })?;

        for item in imdata {
            if let Some(text) = item["error"]["attributes"]["text"].as_str() {
                return Err(CollectError::UnexpectedPayload {
                    class: class.to_string(),
                    reason: text.to_string(),
                });
            }
            match ManagedObject::from_value(item) {
                Some(object) => objects.push(object),
                None => warn!("Skipping malformed {} object", class),
            }
        }

        let total = total_count(&body["totalCount"]);
        debug!(
            "Fetched {} page {} ({} of {:?})",
            class,
            page,
            objects.len(),
            total
        );

        match total {
            Some(total) if !imdata.is_empty() && objects.len() < total => page += 1,
            _ => break,
        }
    }

    Ok(objects)
}

/// `totalCount` arrives as a string on APIC, as a number elsewhere
fn total_count(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        _ => None,
    }
}

/// Fetch and decode a complete snapshot of one fabric
pub async fn collect_snapshot<C>(client: &C) -> CollectResult<RawSnapshot>
where
    C: FabricClient + ?Sized,
{
    info!("Collecting snapshot from {}", client.name());

    let tenants = fetch_class(client, "fvTenant", &[]).await?;
    let vrfs = fetch_class(client, "fvCtx", &[]).await?;
    let contracts = fetch_class(client, "vzBrCP", &[]).await?;
    let interfaces = fetch_class(client, "vzCPIf", &["vzRsIf"]).await?;
    let bridge_domains = fetch_class(client, "fvBD", &["fvRsCtx", "fvSubnet"]).await?;
    let epgs = fetch_class(
        client,
        "fvAEPg",
        &["fvRsBd", "fvRsProv", "fvRsCons", "fvRsConsIf", "fvSubnet"],
    )
    .await?;
    let external_epgs = fetch_class(
        client,
        "l3extInstP",
        &["l3extSubnet", "fvRsProv", "fvRsCons", "fvRsConsIf"],
    )
    .await?;

    let bridge_domains = decode_bridge_domains(&bridge_domains);
    let (mut raw_epgs, mut subnets) = decode_epgs(&epgs, &bridge_domains);
    let (ext_epgs, ext_subnets) = decode_external_epgs(&external_epgs);
    raw_epgs.extend(ext_epgs);
    subnets.extend(ext_subnets);

    let snapshot = RawSnapshot {
        tenants: decode_tenants(&tenants),
        vrfs: decode_vrfs(&vrfs),
        contracts: decode_contracts(&contracts),
        contract_interfaces: decode_contract_interfaces(&interfaces),
        epgs: raw_epgs,
        subnets,
    };

    info!(
        "Collected {} records from {}",
        snapshot.record_count(),
        client.name()
    );
    Ok(snapshot)
}

pub fn decode_tenants(objects: &[ManagedObject]) -> Vec<RawTenant> {
    objects
        .iter()
        .filter_map(|mo| {
            Some(RawTenant {
                name: mo.attr("name")?.to_string(),
                description: mo.attr("descr").map(str::to_string),
            })
        })
        .collect()
}

pub fn decode_vrfs(objects: &[ManagedObject]) -> Vec<RawVrf> {
    objects
        .iter()
        .filter_map(|mo| match mo.dn()? {
            Dn::Vrf { tenant, name } => Some(RawVrf { tenant, name }),
            _ => None,
        })
        .collect()
}

pub fn decode_contracts(objects: &[ManagedObject]) -> Vec<RawContract> {
    objects
        .iter()
        .filter_map(|mo| match mo.dn()? {
            Dn::Contract { tenant, name } => Some(RawContract {
                tenant,
                name,
                scope: mo.attr("scope").map(str::to_string),
                description: mo.attr("descr").map(str::to_string),
            }),
            _ => None,
        })
        .collect()
}

pub fn decode_contract_interfaces(objects: &[ManagedObject]) -> Vec<RawContractInterface> {
    objects
        .iter()
        .filter_map(|mo| match mo.dn()? {
            Dn::ContractInterface { tenant, name } => Some(RawContractInterface {
                tenant,
                name,
                contract: mo.children_of("vzRsIf").find_map(|rs| rs.attr("tDn").map(str::to_string)),
            }),
            _ => None,
        })
        .collect()
}

/// VRF and subnets carried by a bridge domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeDomain {
    pub vrf: Option<String>,
    pub subnets: Vec<SubnetRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRecord {
    pub ip: String,
    pub description: Option<String>,
    pub scope: Option<String>,
}

impl SubnetRecord {
    /// `fvSubnet` carries its text in `descr`
    fn internal(mo: &ManagedObject) -> Option<Self> {
        Self::with_description(mo, mo.attr("descr"))
    }

    /// `l3extSubnet` is labelled through `name`
    fn external(mo: &ManagedObject) -> Option<Self> {
        Self::with_description(mo, mo.attr("name").or_else(|| mo.attr("descr")))
    }

    fn with_description(mo: &ManagedObject, description: Option<&str>) -> Option<Self> {
        Some(Self {
            ip: mo.attr("ip")?.to_string(),
            description: description.map(str::to_string),
            scope: mo.attr("scope").map(str::to_string),
        })
    }

    fn owned_by(&self, tenant: &str, epg: &str) -> RawSubnet {
        RawSubnet {
            tenant: tenant.to_string(),
            epg: epg.to_string(),
            ip: self.ip.clone(),
            description: self.description.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Bridge domains keyed by (tenant, name)
pub fn decode_bridge_domains(objects: &[ManagedObject]) -> BTreeMap<(String, String), BridgeDomain> {
    objects
        .iter()
        .filter_map(|mo| match mo.dn()? {
            Dn::BridgeDomain { tenant, name } => {
                let bd = BridgeDomain {
                    vrf: mo.children_of("fvRsCtx").find_map(|rs| rs.target("tnFvCtxName")),
                    subnets: mo
                        .children_of("fvSubnet")
                        .filter_map(SubnetRecord::internal)
                        .collect(),
                };
                Some(((tenant, name), bd))
            }
            _ => None,
        })
        .collect()
}

/// Application EPGs; VRF and subnets come through the bridge domain
pub fn decode_epgs(
    objects: &[ManagedObject],
    bridge_domains: &BTreeMap<(String, String), BridgeDomain>,
) -> (Vec<RawEpg>, Vec<RawSubnet>) {
    let mut epgs = Vec::new();
    let mut subnets = Vec::new();

    for mo in objects {
        let Some(Dn::Epg {
            tenant,
            app_profile,
            name,
        }) = mo.dn()
        else {
            continue;
        };

        let bd = mo
            .children_of("fvRsBd")
            .find_map(|rs| bridge_domain(rs, &tenant, bridge_domains));
        if bd.is_none() {
            debug!("EPG {}/{} has no resolvable bridge domain", tenant, name);
        }

        if let Some(bd) = bd {
            subnets.extend(bd.subnets.iter().map(|s| s.owned_by(&tenant, &name)));
        }
        subnets.extend(
            mo.children_of("fvSubnet")
                .filter_map(SubnetRecord::internal)
                .map(|s| s.owned_by(&tenant, &name)),
        );

        let mut epg = contract_relations(mo, &tenant, &name);
        epg.application_profile = Some(app_profile);
        epg.vrf = bd.and_then(|bd| bd.vrf.clone());
        epgs.push(epg);
    }

    (epgs, subnets)
}

/// External EPGs of L3Outs with their `l3extSubnet` prefixes
pub fn decode_external_epgs(objects: &[ManagedObject]) -> (Vec<RawEpg>, Vec<RawSubnet>) {
    let mut epgs = Vec::new();
    let mut subnets = Vec::new();

    for mo in objects {
        let Some(Dn::ExternalEpg { tenant, l3out, name }) = mo.dn() else {
            continue;
        };

        subnets.extend(
            mo.children_of("l3extSubnet")
                .filter_map(SubnetRecord::external)
                .map(|s| s.owned_by(&tenant, &name)),
        );

        let mut epg = contract_relations(mo, &tenant, &name);
        epg.l3out = Some(l3out);
        epgs.push(epg);
    }

    (epgs, subnets)
}

fn contract_relations(mo: &ManagedObject, tenant: &str, name: &str) -> RawEpg {
    RawEpg {
        tenant: tenant.to_string(),
        name: name.to_string(),
        description: mo.attr("descr").map(str::to_string),
        provided: mo
            .children_of("fvRsProv")
            .filter_map(|rs| rs.target("tnVzBrCPName"))
            .collect(),
        consumed: mo
            .children_of("fvRsCons")
            .filter_map(|rs| rs.target("tnVzBrCPName"))
            .collect(),
        consumed_interfaces: mo
            .children_of("fvRsConsIf")
            .filter_map(|rs| rs.target("tnVzCPIfName"))
            .collect(),
        ..RawEpg::default()
    }
}

/// `fvRsBd` target: by DN, or by name in the EPG's tenant then `common`
fn bridge_domain<'a>(
    rs: &ManagedObject,
    tenant: &str,
    bridge_domains: &'a BTreeMap<(String, String), BridgeDomain>,
) -> Option<&'a BridgeDomain> {
    if let Some(tdn) = rs.attr("tDn") {
        return match Dn::parse(tdn).ok()? {
            Dn::BridgeDomain { tenant, name } => bridge_domains.get(&(tenant, name)),
            _ => None,
        };
    }
    let name = rs.attr("tnFvBDName")?;
    [tenant, COMMON_TENANT]
        .into_iter()
        .find_map(|t| bridge_domains.get(&(t.to_string(), name.to_string())))
}
