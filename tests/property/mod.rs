// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `strategies` generates raw fabric snapshots
//! - `normalization` checks determinism of the normalizer
//! - `graph_integrity` checks bindings and query round trips

mod graph_integrity;
mod normalization;
mod strategies;
