//! Cartwheel Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused (the seeding CLI links against it
//! for the bundled catalog and store client).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod genai;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
