//! Slice selectors for selecting array slices in JSONPath
use serde_json::Value;

use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry, spec::query::Queryable};

/// A slice selector, `[start:end:step]`
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct Slice {
    /// The start of the slice
    ///
    /// Negative values are relative to the end of the array being sliced.
    pub start: Option<isize>,
    /// The end of the slice (exclusive)
    ///
    /// Negative values are relative to the end of the array being sliced.
    pub end: Option<isize>,
    /// The step of the slice
    ///
    /// A negative step walks the array in reverse; a step of zero selects nothing.
    pub step: Option<isize>,
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        write!(f, ":")?;
        if let Some(step) = self.step {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl Slice {
    /// An empty slice, `[::]`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start of the slice
    pub fn with_start(mut self, start: isize) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end of the slice
    pub fn with_end(mut self, end: isize) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the step of the slice
    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Compute the sequence of array indices selected by this slice against an array of
    /// length `len`, in visitation order, per RFC 9535 section 2.3.4.2.
    fn indices(&self, len: isize) -> Vec<usize> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return vec![];
        }
        let mut out = Vec::new();
        if step > 0 {
            let start_default = self.start.unwrap_or(0);
            let end_default = self.end.unwrap_or(len);
            let start = normalize_slice_index(start_default, len).max(0);
            let end = normalize_slice_index(end_default, len).max(0);
            let lower = start.min(len);
            let upper = end.min(len);
            let mut i = lower;
            while i < upper {
                out.push(i as usize);
                i += step;
            }
        } else {
            let start_default = self.start.unwrap_or(len - 1);
            let end_default = self.end.unwrap_or(-len - 1);
            let start = normalize_slice_index(start_default, len).max(-1);
            let end = normalize_slice_index(end_default, len).max(-1);
            let lower = end.min(len - 1);
            let upper = start.min(len - 1);
            let mut i = upper;
            while lower < i {
                out.push(i as usize);
                i += step;
            }
        }
        out
    }
}

impl Queryable for Slice {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Slice", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, _root: &'b Value, _registry: &FunctionRegistry) -> Vec<&'b Value> {
        let Some(list) = current.as_array() else {
            return vec![];
        };
        let Ok(len) = isize::try_from(list.len()) else {
            return vec![];
        };
        self.indices(len)
            .into_iter()
            .filter_map(|i| list.get(i))
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
        let Ok(len) = isize::try_from(list.len()) else {
            return vec![];
        };
        self.indices(len)
            .into_iter()
            .filter_map(|i| list.get(i).map(|v| (i, v)))
            .map(|(i, v)| LocatedNode {
                loc: parent.clone_and_push(i),
                node: v,
            })
            .collect()
    }
}

/// Normalize a (possibly negative) slice bound against an array length, per RFC 9535
/// section 2.3.4.2: `v' = v >= 0 ? v : len + v`.
fn normalize_slice_index(index: isize, len: isize) -> isize {
    if index >= 0 {
        index
    } else {
        index.checked_abs().map_or(isize::MIN, |i| len.saturating_sub(i))
    }
}

#[cfg(test)]
mod tests {
    use super::Slice;
    use serde_json::json;
    use crate::{node::LocatedNode, path::NormalizedPath, spec::functions::FunctionRegistry, spec::query::Queryable};

    fn idx(v: &Value, slice: &Slice) -> Vec<usize> {
        let registry = FunctionRegistry::new();
        slice
            .query_located(v, v, &registry, NormalizedPath::default())
            .into_iter()
            .map(|LocatedNode { loc, .. }| match loc.last() {
                Some(crate::path::PathElement::Index(i)) => *i,
                _ => panic!("expected index path element"),
            })
            .collect()
    }
    use serde_json::Value;

    #[test]
    fn default_slice_is_identity() {
        let v = json!(["a", "b", "c"]);
        assert_eq!(idx(&v, &Slice::new()), vec![0, 1, 2]);
    }

    #[test]
    fn negative_step_reverses() {
        let v = json!(["a", "b", "c", "d", "e"]);
        assert_eq!(idx(&v, &Slice::new().with_step(-1)), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn zero_step_selects_nothing() {
        let v = json!(["a", "b", "c"]);
        assert!(idx(&v, &Slice::new().with_step(0)).is_empty());
    }

    #[test]
    fn out_of_range_bounds_clamp() {
        let v = json!(["a", "b", "c"]);
        assert_eq!(idx(&v, &Slice::new().with_start(-100).with_end(100)), vec![0, 1, 2]);
    }
}
