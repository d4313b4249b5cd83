//! Name selector for selecting object keys in JSONPath
use serde_json::Value;

use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry, spec::query::Queryable};

/// Select a single JSON object member by its exact key
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Name(pub String);

impl Name {
    /// Get as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{name}'", name = self.0)
    }
}

impl Queryable for Name {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Name", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, _root: &'b Value, _registry: &FunctionRegistry) -> Vec<&'b Value> {
        current
            .as_object()
            .and_then(|obj| obj.get(&self.0))
            .into_iter()
            .collect()
    }

    fn query_located<'b>(
        &self,
        current: &'b Value,
        _root: &'b Value,
        _registry: &FunctionRegistry,
        parent: NormalizedPath<'b>,
    ) -> Vec<LocatedNode<'b>> {
        current
            .as_object()
            .and_then(|obj| obj.get_key_value(&self.0))
            .map(|(k, v)| LocatedNode {
                loc: parent.clone_and_push(k),
                node: v,
            })
            .into_iter()
            .collect()
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
