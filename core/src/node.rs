//! Types representing the results of a JSONPath query
use std::slice::Iter;

use serde::Serialize;
use serde_json::Value;

use crate::path::NormalizedPath;

/// A list of nodes resulting from a JSONPath query
///
/// Each node within the list is a borrowed reference to the node in the original
/// [`serde_json::Value`] that was queried.
#[derive(Debug, Default, Eq, PartialEq, Serialize, Clone)]
pub struct NodeList<'a>(pub(crate) Vec<&'a Value>);

impl<'a> NodeList<'a> {
    /// Extract _at most_ one node from a [`NodeList`]
    pub fn at_most_one(&self) -> Result<Option<&'a Value>, AtMostOneError> {
        if self.0.is_empty() {
            Ok(None)
        } else if self.0.len() > 1 {
            Err(AtMostOneError(self.0.len()))
        } else {
            Ok(self.0.first().copied())
        }
    }

    /// Extract _exactly_ one node from a [`NodeList`]
    pub fn exactly_one(&self) -> Result<&'a Value, ExactlyOneError> {
        if self.0.is_empty() {
            Err(ExactlyOneError::Empty)
        } else if self.0.len() > 1 {
            Err(ExactlyOneError::MoreThanOne(self.0.len()))
        } else {
            Ok(self.0.first().unwrap())
        }
    }

    /// Extract all nodes yielded by the query
    pub fn all(self) -> Vec<&'a Value> {
        self.0
    }

    /// Get the length of a [`NodeList`]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a [`NodeList`] is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over a [`NodeList`]
    pub fn iter(&self) -> Iter<'_, &Value> {
        self.0.iter()
    }

    /// Returns the first node in the [`NodeList`], or `None` if it is empty
    pub fn first(&self) -> Option<&'a Value> {
        self.0.first().copied()
    }

    /// Returns the last node in the [`NodeList`], or `None` if it is empty
    pub fn last(&self) -> Option<&'a Value> {
        self.0.last().copied()
    }

    /// Returns the node at the given index in the [`NodeList`], or `None` if out of bounds
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.0.get(index).copied()
    }

    /// Remove duplicate nodes (by reference identity), keeping the first occurrence of each
    pub fn dedup(self) -> Self {
        let mut seen: Vec<*const Value> = Vec::with_capacity(self.0.len());
        let mut out = Vec::with_capacity(self.0.len());
        for node in self.0 {
            let ptr = node as *const Value;
            if !seen.contains(&ptr) {
                seen.push(ptr);
                out.push(node);
            }
        }
        Self(out)
    }
}

/// Error produced when expecting no more than one node from a query
#[derive(Debug, thiserror::Error)]
#[error("nodelist expected to contain at most one entry, but instead contains {0} entries")]
pub struct AtMostOneError(pub usize);

/// Error produced when expecting exactly one node from a query
#[derive(Debug, thiserror::Error)]
pub enum ExactlyOneError {
    /// The query resulted in an empty [`NodeList`]
    #[error("nodelist expected to contain one entry, but is empty")]
    Empty,
    /// The query resulted in a [`NodeList`] containing more than one node
    #[error("nodelist expected to contain one entry, but instead contains {0} entries")]
    MoreThanOne(usize),
}

impl ExactlyOneError {
    /// Check that it is the `Empty` variant
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check that it is the `MoreThanOne` variant
    pub fn is_more_than_one(&self) -> bool {
        self.as_more_than_one().is_some()
    }

    /// Extract the number of nodes, if it was more than one, or `None` otherwise
    pub fn as_more_than_one(&self) -> Option<usize> {
        match self {
            ExactlyOneError::Empty => None,
            ExactlyOneError::MoreThanOne(u) => Some(*u),
        }
    }
}

impl<'a> From<Vec<&'a Value>> for NodeList<'a> {
    fn from(nodes: Vec<&'a Value>) -> Self {
        Self(nodes)
    }
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = &'a Value;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single node produced by a located query: its value paired with its [`NormalizedPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedNode<'a> {
    pub(crate) loc: NormalizedPath<'a>,
    pub(crate) node: &'a Value,
}

impl<'a> LocatedNode<'a> {
    /// The value at this node
    pub fn node(&self) -> &'a Value {
        self.node
    }

    /// The normalized path locating this node within the queried document
    pub fn location(&self) -> &NormalizedPath<'a> {
        &self.loc
    }

    /// Clone the normalized path locating this node
    pub fn to_location(&self) -> NormalizedPath<'a> {
        self.loc.clone()
    }
}

/// A list of (value, location) pairs produced by a located JSONPath query
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocatedNodeList<'a>(pub(crate) Vec<LocatedNode<'a>>);

impl<'a> LocatedNodeList<'a> {
    /// The number of located nodes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is this list empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the located nodes
    pub fn iter(&self) -> Iter<'_, LocatedNode<'a>> {
        self.0.iter()
    }

    /// Extract _at most_ one located node
    pub fn at_most_one(&self) -> Result<Option<&LocatedNode<'a>>, AtMostOneError> {
        if self.0.is_empty() {
            Ok(None)
        } else if self.0.len() > 1 {
            Err(AtMostOneError(self.0.len()))
        } else {
            Ok(self.0.first())
        }
    }

    /// Extract _exactly_ one located node
    pub fn exactly_one(&self) -> Result<&LocatedNode<'a>, ExactlyOneError> {
        if self.0.is_empty() {
            Err(ExactlyOneError::Empty)
        } else if self.0.len() > 1 {
            Err(ExactlyOneError::MoreThanOne(self.0.len()))
        } else {
            Ok(self.0.first().unwrap())
        }
    }

    /// Just the values of each located node, in order
    pub fn nodes(&self) -> Nodes<'_, 'a> {
        Nodes(self.0.iter())
    }

    /// Just the normalized paths of each located node, in order
    pub fn locations(&self) -> Locations<'_, 'a> {
        Locations(self.0.iter())
    }

    /// Remove duplicate nodes by normalized path, keeping the first occurrence of each
    ///
    /// Per RFC 9535, a nodelist may contain duplicate paths except after an explicit
    /// deduplication step; this is that step, and it is stable.
    pub fn dedup(self) -> Self {
        let mut seen: Vec<NormalizedPath<'a>> = Vec::with_capacity(self.0.len());
        let mut out = Vec::with_capacity(self.0.len());
        for located in self.0 {
            if !seen.contains(&located.loc) {
                seen.push(located.loc.clone());
                out.push(located);
            }
        }
        Self(out)
    }
}

impl<'a> IntoIterator for LocatedNodeList<'a> {
    type Item = LocatedNode<'a>;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> From<Vec<LocatedNode<'a>>> for LocatedNodeList<'a> {
    fn from(nodes: Vec<LocatedNode<'a>>) -> Self {
        Self(nodes)
    }
}

/// Iterator over just the values of a [`LocatedNodeList`], produced by [`LocatedNodeList::nodes`]
pub struct Nodes<'a, 'b>(Iter<'a, LocatedNode<'b>>);

impl<'a, 'b> Iterator for Nodes<'a, 'b> {
    type Item = &'b Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(LocatedNode::node)
    }
}

/// Iterator over just the locations of a [`LocatedNodeList`], produced by [`LocatedNodeList::locations`]
pub struct Locations<'a, 'b>(Iter<'a, LocatedNode<'b>>);

impl<'a, 'b> Iterator for Locations<'a, 'b> {
    type Item = &'a NormalizedPath<'b>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(LocatedNode::location)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeList;
    use serde_json::{json, to_value};
    use jsonpath_rfc9535::JsonPath;

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<NodeList>();
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<NodeList>();
    }

    #[test]
    fn test_serialize() {
        let v = json!([1, 2, 3, 4]);
        let q = JsonPath::parse("$.*").expect("valid query").query(&v);
        assert_eq!(to_value(q).expect("serialize"), v);
    }
}
