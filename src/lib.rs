//! Recipe Share - recipe sharing backend
//!
//! Recipes carry a per-user rating ledger whose aggregate (average and
//! count) is recalculated on every rating write, plus view and favorite
//! counters. Listings are filtered, sorted and paginated through a
//! validated query plan.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
