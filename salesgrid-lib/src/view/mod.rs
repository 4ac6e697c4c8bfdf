//! Virtual view nodes.
//!
//! The grid never touches a real UI toolkit. Plugins and the table core
//! produce [`Node`] trees, and hosts render them however they like; the
//! [`to_text`] renderer is what the terminal host uses.

mod node;
mod text;

pub use node::*;
pub use text::*;
