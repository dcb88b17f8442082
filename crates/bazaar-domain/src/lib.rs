//! Domain logic shared across the Bazaar marketplace service.
//!
//! This crate contains only pure types and functions with no framework
//! dependencies. Import in `usecase/` and `domain/` layers; never in
//! `infra/` or `handlers/`.

pub mod pagination;
pub mod policy;
pub mod rating;
pub mod role;
