//! Request-scoped models.

pub mod session;
