//! AI flows.
//!
//! A flow is a named, schema-typed wrapper around one hosted
//! generative-model invocation. Each flow owns its own failure policy:
//!
//! - [`assistant`] - shopping Q&A; bounded exponential-backoff retry on
//!   overload, degraded fallback answer on exhaustion, never errors
//! - [`try_on`] - virtual try-on image generation; precondition checks up
//!   front, one conditional text-only fallback, errors carry user-facing
//!   explanations
//! - [`recommendations`] - personalized recommendations; fixed-delay retry
//!   on an exact overload marker, re-throws everything else
//! - [`smart_cart`] - cart suggestions; single shot, caller degrades to an
//!   empty list

pub mod assistant;
pub mod recommendations;
pub mod smart_cart;
pub mod try_on;
