//! Caller-facing service layer.
//!
//! Pure functions over the storage collaborator: search endpoints returning
//! ordered verse pages with pagination metadata, previous/next navigation,
//! and per-version translation side-lists.

pub mod align;
pub mod lookup;

pub use lookup::{ListPage, LookupService, VersePage};
