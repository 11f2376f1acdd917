//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the persistence adapters behind the store traits.

pub mod store;
