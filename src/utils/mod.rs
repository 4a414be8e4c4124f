//! Small shared utilities.

pub mod ordered_set;

pub use ordered_set::OrderedSet;
