//! Types representing queries in JSONPath
use serde_json::Value;

use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry};

use super::segment::QuerySegment;

mod sealed {
    use crate::spec::{
        segment::{QuerySegment, Segment},
        selector::{
            filter::{Filter, SingularQuery},
            index::Index,
            name::Name,
            slice::Slice,
            Selector,
        },
    };

    use super::Query;

    pub trait Sealed {}
    impl Sealed for Query {}
    impl Sealed for QuerySegment {}
    impl Sealed for Segment {}
    impl Sealed for Slice {}
    impl Sealed for Name {}
    impl Sealed for Selector {}
    impl Sealed for Index {}
    impl Sealed for Filter {}
    impl Sealed for SingularQuery {}
}

/// A type that can be evaluated against a JSON value, yielding the nodes it selects
///
/// The `registry` parameter carries the set of functions available to any filter selectors
/// nested within `self`; it is threaded through explicitly rather than resolved from a hidden
/// global so that callers can evaluate the same AST against different registries (e.g. in
/// tests that register functions scoped to a single query).
pub trait Queryable: sealed::Sealed {
    /// Query `self` using a current node, and the root node, returning borrowed values only
    fn query<'b>(&self, current: &'b Value, root: &'b Value, registry: &FunctionRegistry) -> Vec<&'b Value>;

    /// Query `self`, producing each matched node paired with its normalized path
    fn query_located<'b>(
        &self,
        current: &'b Value,
        root: &'b Value,
        registry: &FunctionRegistry,
        parent: NormalizedPath<'b>,
    ) -> Vec<LocatedNode<'b>>;
}

/// Represents a JSONPath expression
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Query {
    /// The kind of query, root (`$`), or current (`@`)
    pub kind: QueryKind,
    /// The segments constituting the query
    pub segments: Vec<QuerySegment>,
}

impl Query {
    /// Does this query select at most a single node, i.e., does it contain only Name and Index
    /// selectors with no Wildcard, Slice, Filter, or Descendant segments
    pub fn is_singular(&self) -> bool {
        for s in &self.segments {
            if s.is_descendent() {
                return false;
            }
            if !s.segment.is_singular() {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            QueryKind::Root => write!(f, "$")?,
            QueryKind::Current => write!(f, "@")?,
        }
        for s in &self.segments {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// The kind of query
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum QueryKind {
    /// A query against the root of a JSON document, i.e., one starting with `$`
    #[default]
    Root,
    /// A query against the current node within a filter expression, i.e., one starting with `@`
    Current,
}

impl Queryable for Query {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Main Query", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, root: &'b Value, registry: &FunctionRegistry) -> Vec<&'b Value> {
        let mut query = match self.kind {
            QueryKind::Root => vec![root],
            QueryKind::Current => vec![current],
        };
        for segment in &self.segments {
            let mut new_query = Vec::new();
            for q in &query {
                new_query.append(&mut segment.query(q, root, registry));
            }
            query = new_query;
        }
        query
    }

    fn query_located<'b>(
        &self,
        current: &'b Value,
        root: &'b Value,
        registry: &FunctionRegistry,
        parent: NormalizedPath<'b>,
    ) -> Vec<LocatedNode<'b>> {
        let (start, start_loc) = match self.kind {
            // An absolute query is always relative to the document root, regardless of where
            // the query itself appears (e.g. nested in a filter on some descendant node).
            QueryKind::Root => (root, NormalizedPath::default()),
            QueryKind::Current => (current, parent),
        };
        let mut query = vec![LocatedNode {
            loc: start_loc,
            node: start,
        }];
        for segment in &self.segments {
            let mut new_query = Vec::new();
            for located in &query {
                new_query.append(&mut segment.query_located(
                    located.node,
                    root,
                    registry,
                    located.loc.clone(),
                ));
            }
            query = new_query;
        }
        query
    }
}
