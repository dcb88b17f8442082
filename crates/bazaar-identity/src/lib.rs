//! Caller identity for the Bazaar service.
//!
//! Provides JWT claims, token validation, and the `Identity` extractor.

pub mod claims;
pub mod extract;
