//! Types representing the IETF JSONPath Standard
pub mod functions;
pub mod query;
pub mod segment;
pub mod selector;
