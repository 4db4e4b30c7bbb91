//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validators (JWT, mock)
//! - `http` - axum REST API
//! - `memory` - In-process store for tests and local development
//! - `postgres` - PostgreSQL persistence

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
