//! Query builder module

pub mod common;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

// Re-export types from submodules
pub use common::{on, IntoColumns, JoinOn, JoinType, QueryBuilder, SortDirection};
pub use delete::DeleteBuilder;
pub use insert::{InsertBuilder, InsertVerb};
pub use select::SelectBuilder;
pub use update::UpdateBuilder;
