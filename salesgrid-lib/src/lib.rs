//! Sales records grid library
//!
//! A headless data grid over a sales records HTTP API: paginated, sortable,
//! filterable, searchable and editable. Behaviors are plugins composed into
//! a table of virtual view nodes; hosts render the nodes and forward user
//! intents to [`Grid`].

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod plugins;
pub mod response;
pub mod table;
pub mod util;
pub mod view;

mod client;
mod grid;

#[cfg(test)]
mod testing;

pub use client::*;
pub use grid::*;
pub use response::CacheStatus;
pub use response::Response;
