// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for aci-inventory
//!
//! Deterministic fabric data for scenario and inventory tests.
//!
//! # Design Principles
//! - All test data is deterministic (no `Local::now()`)
//! - The "Production" fabric is described twice: as raw records and as the
//!   APIC class-query payloads that decode into the same records
//! - [`MockApic`] serves those payloads in place of a controller

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use aci_inventory::client::{ClientError, ClientResult, FabricClient};
use aci_inventory::raw::{
    RawContract, RawContractInterface, RawEpg, RawSnapshot, RawSubnet, RawTenant, RawVrf,
};

pub const PRODUCTION: &str = "Production";
pub const SHARED: &str = "Shared";

/// Fixed report timestamp (2026-01-19 12:00:00)
pub fn fixed_generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 19)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("Invalid timestamp in test fixture")
}

// ============================================================================
// Raw records
// ============================================================================

pub fn tenant(name: &str) -> RawTenant {
    RawTenant {
        name: name.to_string(),
        description: None,
    }
}

pub fn vrf(tenant: &str, name: &str) -> RawVrf {
    RawVrf {
        tenant: tenant.to_string(),
        name: name.to_string(),
    }
}

pub fn contract(tenant: &str, name: &str, scope: &str) -> RawContract {
    RawContract {
        tenant: tenant.to_string(),
        name: name.to_string(),
        scope: Some(scope.to_string()),
        description: None,
    }
}

pub fn internal_epg(tenant: &str, name: &str, vrf: &str) -> RawEpg {
    RawEpg {
        tenant: tenant.to_string(),
        name: name.to_string(),
        vrf: Some(vrf.to_string()),
        ..RawEpg::default()
    }
}

pub fn external_epg(tenant: &str, name: &str, l3out: &str) -> RawEpg {
    RawEpg {
        tenant: tenant.to_string(),
        name: name.to_string(),
        l3out: Some(l3out.to_string()),
        ..RawEpg::default()
    }
}

pub fn subnet(tenant: &str, epg: &str, ip: &str) -> RawSubnet {
    RawSubnet {
        tenant: tenant.to_string(),
        epg: epg.to_string(),
        ip: ip.to_string(),
        description: None,
        scope: None,
    }
}

/// Production fabric as raw records
///
/// - `Production/Database-EPG` provides `Web-DB-Contract`
/// - `Production/Web-Server-EPG` consumes it, `Shared/DNS` through the
///   `Shared-DNS` interface, and `Internet-Access`
/// - `Production/Internet` (L3Out `WAN`) provides `Internet-Access`
/// - `Production/Orphan-EPG` has neither VRF nor L3Out
/// - `mgmt` and `common` are system tenants
pub fn production_snapshot() -> RawSnapshot {
    let mut database = internal_epg(PRODUCTION, "Database-EPG", "Production-VRF");
    database.application_profile = Some("Shop".to_string());
    database.provided = vec!["Web-DB-Contract".to_string()];

    let mut web = internal_epg(PRODUCTION, "Web-Server-EPG", "Production-VRF");
    web.application_profile = Some("Shop".to_string());
    web.consumed = vec![
        "Web-DB-Contract".to_string(),
        "Internet-Access".to_string(),
    ];
    web.consumed_interfaces = vec!["Shared-DNS".to_string()];

    let mut internet = external_epg(PRODUCTION, "Internet", "WAN");
    internet.provided = vec!["Internet-Access".to_string()];

    let mut orphan = internal_epg(PRODUCTION, "Orphan-EPG", "");
    orphan.application_profile = Some("Shop".to_string());
    orphan.vrf = None;

    let mut dns = internal_epg(SHARED, "DNS-EPG", "Shared-VRF");
    dns.application_profile = Some("Infra".to_string());
    dns.provided = vec!["DNS".to_string()];

    let mut mgmt = internal_epg("mgmt", "oob-EPG", "oob");
    mgmt.provided = vec!["mgmt-contract".to_string()];

    let mut default_route = subnet(PRODUCTION, "Internet", "0.0.0.0/0");
    default_route.scope = Some("import-security,export-rtctrl".to_string());
    default_route.description = Some("Default".to_string());

    let mut db_subnet = subnet(PRODUCTION, "Database-EPG", "10.1.100.0/24");
    db_subnet.description = Some("Database servers".to_string());

    RawSnapshot {
        tenants: vec![
            tenant(PRODUCTION),
            tenant(SHARED),
            tenant("common"),
            tenant("mgmt"),
        ],
        vrfs: vec![
            vrf(PRODUCTION, "Production-VRF"),
            vrf(SHARED, "Shared-VRF"),
            vrf("mgmt", "oob"),
        ],
        contracts: vec![
            contract(PRODUCTION, "Web-DB-Contract", "context"),
            contract(PRODUCTION, "Internet-Access", "context"),
            contract(SHARED, "DNS", "global"),
            contract("mgmt", "mgmt-contract", "context"),
        ],
        contract_interfaces: vec![RawContractInterface {
            tenant: PRODUCTION.to_string(),
            name: "Shared-DNS".to_string(),
            contract: Some("uni/tn-Shared/brc-DNS".to_string()),
        }],
        epgs: vec![database, web, internet, orphan, dns, mgmt],
        subnets: vec![
            db_subnet,
            subnet(PRODUCTION, "Web-Server-EPG", "10.1.200.0/24"),
            default_route,
            subnet(SHARED, "DNS-EPG", "10.9.0.0/24"),
        ],
    }
}

// ============================================================================
// APIC payloads
// ============================================================================

fn mo(class: &str, attributes: Value, children: Vec<Value>) -> Value {
    json!({ class: { "attributes": attributes, "children": children } })
}

fn rel(class: &str, attribute: &str, value: &str) -> Value {
    json!({ class: { "attributes": { attribute: value } } })
}

/// Production fabric as class-query objects, keyed by class
pub fn production_objects() -> HashMap<String, Vec<Value>> {
    let mut objects: HashMap<String, Vec<Value>> = HashMap::new();

    objects.insert(
        "fvTenant".into(),
        [PRODUCTION, SHARED, "common", "mgmt"]
            .iter()
            .map(|name| mo("fvTenant", json!({ "dn": format!("uni/tn-{}", name), "name": name }), vec![]))
            .collect(),
    );

    objects.insert(
        "fvCtx".into(),
        ["uni/tn-Production/ctx-Production-VRF", "uni/tn-Shared/ctx-Shared-VRF", "uni/tn-mgmt/ctx-oob"]
            .iter()
            .map(|dn| mo("fvCtx", json!({ "dn": dn }), vec![]))
            .collect(),
    );

    objects.insert(
        "vzBrCP".into(),
        vec![
            mo("vzBrCP", json!({ "dn": "uni/tn-Production/brc-Web-DB-Contract", "scope": "context" }), vec![]),
            mo("vzBrCP", json!({ "dn": "uni/tn-Production/brc-Internet-Access", "scope": "context" }), vec![]),
            mo("vzBrCP", json!({ "dn": "uni/tn-Shared/brc-DNS", "scope": "global" }), vec![]),
            mo("vzBrCP", json!({ "dn": "uni/tn-mgmt/brc-mgmt-contract", "scope": "context" }), vec![]),
        ],
    );

    objects.insert(
        "vzCPIf".into(),
        vec![mo(
            "vzCPIf",
            json!({ "dn": "uni/tn-Production/cif-Shared-DNS" }),
            vec![rel("vzRsIf", "tDn", "uni/tn-Shared/brc-DNS")],
        )],
    );

    objects.insert(
        "fvBD".into(),
        vec![
            mo(
                "fvBD",
                json!({ "dn": "uni/tn-Production/BD-DB-BD" }),
                vec![
                    rel("fvRsCtx", "tDn", "uni/tn-Production/ctx-Production-VRF"),
                    mo("fvSubnet", json!({ "ip": "10.1.100.0/24", "descr": "Database servers" }), vec![]),
                ],
            ),
            mo(
                "fvBD",
                json!({ "dn": "uni/tn-Production/BD-Web-BD" }),
                vec![
                    rel("fvRsCtx", "tnFvCtxName", "Production-VRF"),
                    mo("fvSubnet", json!({ "ip": "10.1.200.0/24" }), vec![]),
                ],
            ),
            mo(
                "fvBD",
                json!({ "dn": "uni/tn-Shared/BD-DNS-BD" }),
                vec![
                    rel("fvRsCtx", "tDn", "uni/tn-Shared/ctx-Shared-VRF"),
                    mo("fvSubnet", json!({ "ip": "10.9.0.0/24" }), vec![]),
                ],
            ),
        ],
    );

    objects.insert(
        "fvAEPg".into(),
        vec![
            mo(
                "fvAEPg",
                json!({ "dn": "uni/tn-Production/ap-Shop/epg-Database-EPG" }),
                vec![
                    rel("fvRsBd", "tnFvBDName", "DB-BD"),
                    rel("fvRsProv", "tnVzBrCPName", "Web-DB-Contract"),
                ],
            ),
            mo(
                "fvAEPg",
                json!({ "dn": "uni/tn-Production/ap-Shop/epg-Web-Server-EPG" }),
                vec![
                    rel("fvRsBd", "tDn", "uni/tn-Production/BD-Web-BD"),
                    rel("fvRsCons", "tnVzBrCPName", "Web-DB-Contract"),
                    rel("fvRsCons", "tDn", "uni/tn-Production/brc-Internet-Access"),
                    rel("fvRsConsIf", "tnVzCPIfName", "Shared-DNS"),
                ],
            ),
            mo(
                "fvAEPg",
                json!({ "dn": "uni/tn-Production/ap-Shop/epg-Orphan-EPG" }),
                vec![],
            ),
            mo(
                "fvAEPg",
                json!({ "dn": "uni/tn-Shared/ap-Infra/epg-DNS-EPG" }),
                vec![
                    rel("fvRsBd", "tnFvBDName", "DNS-BD"),
                    rel("fvRsProv", "tnVzBrCPName", "DNS"),
                ],
            ),
        ],
    );

    objects.insert(
        "l3extInstP".into(),
        vec![mo(
            "l3extInstP",
            json!({ "dn": "uni/tn-Production/out-WAN/instP-Internet" }),
            vec![
                mo(
                    "l3extSubnet",
                    json!({ "ip": "0.0.0.0/0", "name": "Default", "scope": "import-security,export-rtctrl" }),
                    vec![],
                ),
                rel("fvRsProv", "tnVzBrCPName", "Internet-Access"),
            ],
        )],
    );

    objects
}

// ============================================================================
// In-memory controller
// ============================================================================

/// Serves class queries from memory, `page_size` objects per page
pub struct MockApic {
    name: String,
    objects: HashMap<String, Vec<Value>>,
    page_size: usize,
    accept_login: bool,
    delay: Option<Duration>,
    logged_in: bool,
}

impl MockApic {
    pub fn new(name: &str, objects: HashMap<String, Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            objects,
            page_size: 2,
            accept_login: true,
            delay: None,
            logged_in: false,
        }
    }

    pub fn production(name: &str) -> Self {
        Self::new(name, production_objects())
    }

    pub fn rejecting_login(mut self) -> Self {
        self.accept_login = false;
        self
    }

    /// Every request sleeps this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn page(&self, path: &str) -> Option<Value> {
        let class = path.strip_prefix("node/class/")?.split(".json").next()?;
        let page: usize = path
            .split(['?', '&'])
            .find_map(|param| param.strip_prefix("page="))?
            .parse()
            .ok()?;

        let all = self.objects.get(class).cloned().unwrap_or_default();
        let items: Vec<Value> = all
            .iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();
        Some(json!({ "totalCount": all.len().to_string(), "imdata": items }))
    }
}

#[async_trait]
impl FabricClient for MockApic {
    async fn login(&mut self) -> ClientResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.accept_login {
            return Err(ClientError::Authentication(401));
        }
        self.logged_in = true;
        Ok(())
    }

    async fn get(&self, path: &str) -> ClientResult<Value> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.logged_in {
            return Err(ClientError::NotAuthenticated);
        }
        self.page(path).ok_or(ClientError::Status {
            status: 400,
            path: path.to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
