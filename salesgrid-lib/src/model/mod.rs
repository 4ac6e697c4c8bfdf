//! Typed models

mod column;
mod index;
mod query;
mod record;
mod schema;

pub use column::*;
pub use index::*;
pub use query::*;
pub use record::*;
pub use schema::*;
