// Copyright (c) 2025 - Cowboy AI, Inc.
//! ACI Domain Model
//!
//! Canonical entities of a fabric snapshot and the value objects they are
//! built from.
//!
//! # Value Objects with Invariants
//!
//! - [`Cidr`] - IPv4/IPv6 subnet with mandatory prefix length
//! - [`Dn`] - APIC distinguished name of a tenant-scoped object
//! - [`ScopedName`] - `(tenant, name)` identity key, typed per entity
//!
//! # Entities
//!
//! - [`Tenant`], [`Vrf`], [`Contract`], [`Epg`], [`Subnet`]
//! - [`ContractBinding`] - the provider/consumer edge between an EPG and a
//!   contract

pub mod dn;
pub mod entities;
pub mod keys;
pub mod network;

pub use dn::{Dn, DnError};
pub use entities::{
    Contract, ContractBinding, ContractKey, ContractScope, Epg, EpgKey, EpgKind, Fabric, Role,
    Subnet, SubnetScope, Tenant, Vrf, VrfKey,
};
pub use keys::ScopedName;
pub use network::{Cidr, NetworkError};
