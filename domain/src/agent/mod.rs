//! Agent domain
//!
//! Roles, payload variants, results, and the deterministic fallbacks used
//! when remote reasoning cannot be trusted.

pub mod fallback;
pub mod payload;
pub mod result;
pub mod role;
