//! Behavior plugins.
//!
//! A plugin is attached to the table once, where it may append columns to
//! the schema copy and contributes one fragment. Before every fetch the grid
//! threads a [`Query`] through each plugin's [`Plugin::apply`] in a fixed
//! order; later plugins overwrite keys set by earlier ones.

pub mod editing;
pub mod filtering;
pub mod pagination;
pub mod searching;
pub mod sorting;

pub use editing::Editing;
pub use filtering::Filtering;
pub use pagination::Pagination;
pub use pagination::PaginationConfig;
pub use searching::Searching;
pub use sorting::SortOrder;
pub use sorting::Sorting;

use crate::model::Query;
use crate::model::Schema;
use crate::table::Contribution;
use crate::view::Node;

pub trait Plugin: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extends `schema` and returns this plugin's fragment.
    fn attach(&mut self, schema: &mut Schema) -> Contribution;

    /// Adds this plugin's keys to `query`. The default contributes nothing.
    fn apply(&self, query: Query) -> Query {
        query
    }

    /// The plugin's fragment for its current state.
    fn view(&self, schema: &Schema) -> Node;
}
