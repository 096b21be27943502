// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tenant-scoped identity keys

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identity of an object owned by a tenant: `(tenant, name)`.
///
/// The marker type ties a key to the entity kind it identifies, so a
/// [`ContractKey`](super::ContractKey) can't be used to look up an EPG.
/// Keys order by tenant, then name.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ScopedName<T> {
    tenant: String,
    name: String,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> ScopedName<T> {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// Owning tenant
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both parts match
    pub fn matches(&self, tenant: &str, name: &str) -> bool {
        self.tenant == tenant && self.name == name
    }
}

impl<T> Clone for ScopedName<T> {
    fn clone(&self) -> Self {
        Self::new(self.tenant.clone(), self.name.clone())
    }
}

impl<T> PartialEq for ScopedName<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tenant == other.tenant && self.name == other.name
    }
}

impl<T> Eq for ScopedName<T> {}

impl<T> PartialOrd for ScopedName<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScopedName<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tenant
            .cmp(&other.tenant)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl<T> Hash for ScopedName<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tenant.hash(state);
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for ScopedName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.name)
    }
}

impl<T> fmt::Display for ScopedName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.name)
    }
}
