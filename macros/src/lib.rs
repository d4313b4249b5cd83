//! Proc-macro support for `jsonpath_rfc9535`'s function extensions
//!
//! This crate is re-exported through `jsonpath_rfc9535` behind the `functions` feature; it is
//! not meant to be depended on directly.
#![warn(clippy::all)]

#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use jsonpath_rfc9535_core;
#[doc(hidden)]
pub use once_cell;

/// Define a custom JSONPath function extension
///
/// The annotated function's parameter and return types must each be one of
/// [`NodesType`][jsonpath_rfc9535_core::spec::functions::NodesType],
/// [`ValueType`][jsonpath_rfc9535_core::spec::functions::ValueType], or
/// [`LogicalType`][jsonpath_rfc9535_core::spec::functions::LogicalType]. By default the
/// function is registered under its Rust name; pass `name = "..."` to use a different name in
/// queries.
///
/// ```ignore
/// use jsonpath_rfc9535_macros::function;
/// use jsonpath_rfc9535_core::spec::functions::ValueType;
///
/// #[function]
/// fn is_even(v: ValueType) -> ValueType {
///     todo!()
/// }
/// ```
pub use jsonpath_rfc9535_macros_internal::function;
