//! Report filters: the caller-facing filter and the scopes compiled from it

mod spec;
mod scope;

pub use spec::FilterSpec;
pub use scope::{CoarseScope, CompiledFilter, FilterScopes, FineScope, RecordPredicate};
