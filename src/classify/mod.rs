//! Account grouping and category classification
//!
//! Classification is a two-pass affair: records are first grouped by account, then
//! each group is inspected as a whole. Whether a TV line counts as "with copper"
//! depends on the other lines of the same account, so it cannot be expressed as a
//! per-record filter.

mod group;
mod category;

pub use group::{group_by_account, AccountGroup};
pub use category::{classify_group, Category, CategoryCounts};
