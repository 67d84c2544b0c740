//! Cartwheel Core - Shared domain types library.
//!
//! This crate provides common types used across all Cartwheel components:
//! - `storefront` - Public-facing e-commerce service
//! - `cli` - Command-line tools for seeding the remote document store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, orders, and users as they flow between the
//!   bundled catalog, the remote document store, and the HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
