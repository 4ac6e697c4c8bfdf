//! The record API the grid consumes

mod source;

pub use source::*;
