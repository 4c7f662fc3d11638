//! Tolerant RFC 5545 text decoding.
//!
//! [`lexer`] unfolds physical lines, [`content_line`] splits one logical
//! line into name, parameters, and value, [`registry`] routes properties
//! to their decoders, and [`stack`] assembles components into a document.

pub mod content_line;
pub mod lexer;
pub mod registry;
pub(crate) mod stack;
pub mod values;

pub use stack::parse;
