//! Core types for the `jsonpath_rfc9535` crate
//!
//! This crate holds the AST (the [`spec`] module), the node/path types produced by evaluating
//! that AST against a [`serde_json::Value`], and the three-type function system used by filter
//! expressions. The built-in functions (`length`, `count`, `match`, `search`, `value`) are
//! always available here; the `jsonpath_rfc9535` crate's `functions` feature only gates whether
//! the `#[function]` attribute macro is available for registering additional custom functions.
//!
//! None of this is meant to be used directly; it is re-exported through `jsonpath_rfc9535`.
#![warn(clippy::all, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![deny(unreachable_pub)]

pub mod node;
pub mod path;
pub mod spec;
