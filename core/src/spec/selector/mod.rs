//! Types representing the different selectors in JSONPath
pub mod filter;
pub mod index;
pub mod name;
pub mod slice;

use serde_json::Value;

use self::{filter::Filter, index::Index, name::Name, slice::Slice};
use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry};

use super::query::Queryable;

/// A JSONPath selector
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Selector {
    /// Select an object member by key
    Name(Name),
    /// Select all of a node's children
    ///
    /// For an object this yields each member value in insertion order; for an array it
    /// yields each element in index order.
    Wildcard,
    /// Select an array element by index
    Index(Index),
    /// Select a slice of an array
    ArraySlice(Slice),
    /// Select the children that satisfy a filter expression
    Filter(Filter),
}

impl Selector {
    /// Will the selector select at most a single node
    pub fn is_singular(&self) -> bool {
        matches!(self, Selector::Name(_) | Selector::Index(_))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "{name}"),
            Selector::Wildcard => write!(f, "*"),
            Selector::Index(index) => write!(f, "{index}"),
            Selector::ArraySlice(slice) => write!(f, "{slice}"),
            Selector::Filter(filter) => write!(f, "?{filter}"),
        }
    }
}

impl Queryable for Selector {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Selector", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, root: &'b Value, registry: &FunctionRegistry) -> Vec<&'b Value> {
        match self {
            Selector::Name(name) => name.query(current, root, registry),
            Selector::Wildcard => {
                let mut query = Vec::new();
                if let Some(list) = current.as_array() {
                    query.extend(list.iter());
                } else if let Some(obj) = current.as_object() {
                    query.extend(obj.values());
                }
                query
            }
            Selector::Index(index) => index.query(current, root, registry),
            Selector::ArraySlice(slice) => slice.query(current, root, registry),
            Selector::Filter(filter) => filter.query(current, root, registry),
        }
    }

    fn query_located<'b>(
        &self,
        current: &'b Value,
        root: &'b Value,
        registry: &FunctionRegistry,
        parent: NormalizedPath<'b>,
    ) -> Vec<LocatedNode<'b>> {
        match self {
            Selector::Name(name) => name.query_located(current, root, registry, parent),
            Selector::Wildcard => {
                let mut result = vec![];
                if let Some(list) = current.as_array() {
                    for (i, v) in list.iter().enumerate() {
                        result.push(LocatedNode {
                            loc: parent.clone_and_push(i),
                            node: v,
                        });
                    }
                } else if let Some(obj) = current.as_object() {
                    for (k, v) in obj {
                        result.push(LocatedNode {
                            loc: parent.clone_and_push(k),
                            node: v,
                        });
                    }
                }
                result
            }
            Selector::Index(index) => index.query_located(current, root, registry, parent),
            Selector::ArraySlice(slice) => slice.query_located(current, root, registry, parent),
            Selector::Filter(filter) => filter.query_located(current, root, registry, parent),
        }
    }
}
