//! Database entities for the market service.

pub mod account_tokens;
pub mod listings;
pub mod reviews;
pub mod users;
