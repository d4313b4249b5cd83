//! Index selectors in JSONPath
use serde_json::Value;

use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry, spec::query::Queryable};

/// Select an array element by its index
///
/// Negative indices count from the end of the array, per RFC 9535 section 2.3.3.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Index(pub isize);

impl Index {
    /// Normalize this index against an array of length `len`, returning `None` if it is out
    /// of bounds (RFC 9535 section 2.3.3: `i' = i >= 0 ? i : len + i`, valid iff `0 <= i' < len`)
    fn normalize(self, len: usize) -> Option<usize> {
        if self.0 >= 0 {
            let i = usize::try_from(self.0).ok()?;
            (i < len).then_some(i)
        } else {
            let offset = self.0.checked_abs().and_then(|i| usize::try_from(i).ok())?;
            len.checked_sub(offset)
        }
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{index}", index = self.0)
    }
}

impl Queryable for Index {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Index", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, _root: &'b Value, _registry: &FunctionRegistry) -> Vec<&'b Value> {
        let Some(list) = current.as_array() else {
            return vec![];
        };
        self.normalize(list.len())
            .and_then(|i| list.get(i))
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
        let Some(list) = current.as_array() else {
            return vec![];
        };
        self.normalize(list.len())
            .and_then(|i| list.get(i).map(|v| (i, v)))
            .map(|(i, v)| LocatedNode {
                loc: parent.clone_and_push(i),
                node: v,
            })
            .into_iter()
            .collect()
    }
}

impl From<isize> for Index {
    fn from(i: isize) -> Self {
        Self(i)
    }
}
