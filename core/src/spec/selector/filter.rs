//! Types representing filter selectors in JSONPath
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::{
    node::LocatedNode,
    path::NormalizedPath,
    spec::{
        functions::{FunctionExpr, FunctionRegistry},
        query::{Query, QueryKind, Queryable},
        segment::{QuerySegment, Segment},
        selector::Selector,
    },
};

/// The filter selector, `?<logical-or-expr>`
#[derive(Debug, PartialEq, Clone)]
pub struct Filter(pub LogicalOrExpr);

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Queryable for Filter {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Filter", level = "trace", parent = None, ret))]
    fn query<'b>(&self, current: &'b Value, root: &'b Value, registry: &FunctionRegistry) -> Vec<&'b Value> {
        let mut query = Vec::new();
        if let Some(list) = current.as_array() {
            for v in list {
                if self.0.test(v, root, registry) {
                    query.push(v);
                }
            }
        } else if let Some(obj) = current.as_object() {
            for v in obj.values() {
                if self.0.test(v, root, registry) {
                    query.push(v);
                }
            }
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
        let mut result = Vec::new();
        if let Some(list) = current.as_array() {
            for (i, v) in list.iter().enumerate() {
                if self.0.test(v, root, registry) {
                    result.push(LocatedNode {
                        loc: parent.clone_and_push(i),
                        node: v,
                    });
                }
            }
        } else if let Some(obj) = current.as_object() {
            for (k, v) in obj {
                if self.0.test(v, root, registry) {
                    result.push(LocatedNode {
                        loc: parent.clone_and_push(k),
                        node: v,
                    });
                }
            }
        }
        result
    }
}

/// Tests an expression against a candidate node, producing a boolean result
pub trait TestFilter {
    /// Does `self` hold when evaluated with `current` as the current node and `root` as the
    /// root of the document
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool;
}

/// A disjunction of [`LogicalAndExpr`]s, joined by `||`
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalOrExpr(pub Vec<LogicalAndExpr>);

impl fmt::Display for LogicalOrExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " || ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl TestFilter for LogicalOrExpr {
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool {
        self.0.iter().any(|e| e.test(current, root, registry))
    }
}

/// A conjunction of [`BasicExpr`]s, joined by `&&`
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalAndExpr(pub Vec<BasicExpr>);

impl fmt::Display for LogicalAndExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl TestFilter for LogicalAndExpr {
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool {
        self.0.iter().all(|e| e.test(current, root, registry))
    }
}

/// The smallest unit of a filter expression
#[derive(Debug, PartialEq, Clone)]
pub enum BasicExpr {
    /// A parenthesized expression, `(<logical-or-expr>)`
    Paren(LogicalOrExpr),
    /// A negated, parenthesized expression, `!(<logical-or-expr>)`
    NotParen(LogicalOrExpr),
    /// A comparison between two [`Comparable`]s
    Relation(ComparisonExpr),
    /// An existence test on a filter-query, e.g. `@.foo`
    Exist(ExistExpr),
    /// A negated existence test, `!@.foo`
    NotExist(ExistExpr),
    /// A function call used directly as a boolean test
    FuncExpr(FunctionExpr),
    /// A negated function call
    NotFuncExpr(FunctionExpr),
}

impl fmt::Display for BasicExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicExpr::Paren(e) => write!(f, "({e})"),
            BasicExpr::NotParen(e) => write!(f, "!({e})"),
            BasicExpr::Relation(c) => write!(f, "{c}"),
            BasicExpr::Exist(e) => write!(f, "{e}"),
            BasicExpr::NotExist(e) => write!(f, "!{e}"),
            BasicExpr::FuncExpr(func) => write!(f, "{func}"),
            BasicExpr::NotFuncExpr(func) => write!(f, "!{func}"),
        }
    }
}

impl TestFilter for BasicExpr {
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool {
        match self {
            BasicExpr::Paren(e) => e.test(current, root, registry),
            BasicExpr::NotParen(e) => !e.test(current, root, registry),
            BasicExpr::Relation(c) => c.test(current, root, registry),
            BasicExpr::Exist(e) => e.test(current, root, registry),
            BasicExpr::NotExist(e) => !e.test(current, root, registry),
            BasicExpr::FuncExpr(func) => func.evaluate(current, root, registry).as_logical(),
            BasicExpr::NotFuncExpr(func) => !func.evaluate(current, root, registry).as_logical(),
        }
    }
}

/// An existence test on a query, e.g. `@.foo` or `$.bar`
#[derive(Debug, PartialEq, Clone)]
pub struct ExistExpr(pub Query);

impl fmt::Display for ExistExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TestFilter for ExistExpr {
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool {
        !self.0.query(current, root, registry).is_empty()
    }
}

/// A comparison between two [`Comparable`]s, e.g. `@.price < 10`
#[derive(Debug, PartialEq, Clone)]
pub struct ComparisonExpr {
    /// The left-hand side of the comparison
    pub left: Comparable,
    /// The comparison operator
    pub op: ComparisonOperator,
    /// The right-hand side of the comparison
    pub right: Comparable,
}

impl fmt::Display for ComparisonExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

impl TestFilter for ComparisonExpr {
    fn test(&self, current: &Value, root: &Value, registry: &FunctionRegistry) -> bool {
        let left = self.left.evaluate(current, root, registry);
        let right = self.right.evaluate(current, root, registry);
        match self.op {
            ComparisonOperator::EqualTo => values_equal_opt(left.as_deref(), right.as_deref()),
            ComparisonOperator::NotEqualTo => !values_equal_opt(left.as_deref(), right.as_deref()),
            ComparisonOperator::LessThan => value_less_than_opt(left.as_deref(), right.as_deref()),
            ComparisonOperator::GreaterThan => value_less_than_opt(right.as_deref(), left.as_deref()),
            ComparisonOperator::LessThanEqualTo => {
                values_equal_opt(left.as_deref(), right.as_deref())
                    || value_less_than_opt(left.as_deref(), right.as_deref())
            }
            ComparisonOperator::GreaterThanEqualTo => {
                values_equal_opt(left.as_deref(), right.as_deref())
                    || value_less_than_opt(right.as_deref(), left.as_deref())
            }
        }
    }
}

/// The comparison operators defined by RFC 9535 section 2.3.5.1
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ComparisonOperator {
    /// `==`
    EqualTo,
    /// `!=`
    NotEqualTo,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanEqualTo,
    /// `>=`
    GreaterThanEqualTo,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOperator::EqualTo => "==",
            ComparisonOperator::NotEqualTo => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThanEqualTo => "<=",
            ComparisonOperator::GreaterThanEqualTo => ">=",
        };
        write!(f, "{s}")
    }
}

/// One side of a [`ComparisonExpr`]
#[derive(Debug, PartialEq, Clone)]
pub enum Comparable {
    /// A literal value
    Literal(Literal),
    /// A singular query, producing at most one value
    SingularQuery(SingularQuery),
    /// A function call returning `ValueType`
    FunctionExpr(FunctionExpr),
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparable::Literal(l) => write!(f, "{l}"),
            Comparable::SingularQuery(q) => write!(f, "{q}"),
            Comparable::FunctionExpr(func) => write!(f, "{func}"),
        }
    }
}

impl Comparable {
    /// Evaluate this comparable to a value, or `None` to represent `Nothing`
    pub fn evaluate<'b>(&self, current: &'b Value, root: &'b Value, registry: &FunctionRegistry) -> Option<ValueOrOwned<'b>> {
        match self {
            Comparable::Literal(l) => Some(ValueOrOwned::Owned(l.to_value())),
            Comparable::SingularQuery(q) => q.eval_query(current, root).map(ValueOrOwned::Borrowed),
            Comparable::FunctionExpr(func) => match func.evaluate(current, root, registry) {
                crate::spec::functions::JsonPathType::Value(Some(v)) => Some(ValueOrOwned::Owned(v.into_owned())),
                _ => None,
            },
        }
    }
}

/// Either a borrowed document value or an owned one produced by a literal or a function call
#[derive(Debug, Clone)]
pub enum ValueOrOwned<'b> {
    /// A value borrowed from the document being queried
    Borrowed(&'b Value),
    /// An owned value, produced by evaluating a literal or a function call
    Owned(Value),
}

impl<'b> std::ops::Deref for ValueOrOwned<'b> {
    type Target = Value;

    fn deref(&self) -> &Value {
        match self {
            ValueOrOwned::Borrowed(v) => v,
            ValueOrOwned::Owned(v) => v,
        }
    }
}

/// A literal value appearing in a filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer literal
    Int(i64),
    /// A floating point literal
    Float(f64),
    /// A string literal
    String(String),
    /// A boolean literal
    Bool(bool),
    /// The `null` literal
    Null,
}

impl Literal {
    /// Produce the [`Value`] this literal denotes
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(i) => Value::Number((*i).into()),
            Literal::Float(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "\"{s}\""),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// A single segment of a [`SingularQuery`]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SingularQuerySegment {
    /// A name selector
    Name(String),
    /// An index selector
    Index(isize),
}

impl fmt::Display for SingularQuerySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingularQuerySegment::Name(n) => write!(f, "['{n}']"),
            SingularQuerySegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl TryFrom<Selector> for SingularQuerySegment {
    type Error = NonSingularQueryError;

    fn try_from(selector: Selector) -> Result<Self, Self::Error> {
        match selector {
            Selector::Name(n) => Ok(SingularQuerySegment::Name(n.0)),
            Selector::Index(i) => Ok(SingularQuerySegment::Index(i.0)),
            _ => Err(NonSingularQueryError),
        }
    }
}

impl TryFrom<QuerySegment> for SingularQuerySegment {
    type Error = NonSingularQueryError;

    fn try_from(segment: QuerySegment) -> Result<Self, Self::Error> {
        if segment.is_descendent() {
            return Err(NonSingularQueryError);
        }
        match segment.segment {
            Segment::DotName(name) => Ok(SingularQuerySegment::Name(name)),
            Segment::LongHand(mut selectors) if selectors.len() == 1 => {
                selectors.pop().expect("checked len == 1").try_into()
            }
            _ => Err(NonSingularQueryError),
        }
    }
}

/// A query that is guaranteed to select at most one node
///
/// Produced by converting a parsed [`Query`] via [`TryFrom`]; only name and index segments,
/// with no wildcard, slice, filter, or descendant segments, are allowed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SingularQuery {
    /// The kind of query, root (`$`) or current (`@`)
    pub kind: QueryKind,
    /// The segments of the query
    pub segments: Vec<SingularQuerySegment>,
}

impl fmt::Display for SingularQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

impl TryFrom<Query> for SingularQuery {
    type Error = NonSingularQueryError;

    fn try_from(query: Query) -> Result<Self, Self::Error> {
        let segments = query
            .segments
            .into_iter()
            .map(SingularQuerySegment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SingularQuery {
            kind: query.kind,
            segments,
        })
    }
}

impl SingularQuery {
    /// Evaluate this query against a document, producing the single node it selects, if any
    pub fn eval_query<'b>(&self, current: &'b Value, root: &'b Value) -> Option<&'b Value> {
        let mut cur = match self.kind {
            QueryKind::Root => root,
            QueryKind::Current => current,
        };
        for segment in &self.segments {
            cur = match segment {
                SingularQuerySegment::Name(name) => cur.as_object()?.get(name.as_str())?,
                SingularQuerySegment::Index(i) => {
                    let arr = cur.as_array()?;
                    arr.get(normalize_singular_index(*i, arr.len())?)?
                }
            };
        }
        Some(cur)
    }

    fn eval_query_located<'b>(
        &self,
        current: &'b Value,
        root: &'b Value,
        parent: NormalizedPath<'b>,
    ) -> Option<LocatedNode<'b>> {
        let (mut cur, mut loc) = match self.kind {
            QueryKind::Root => (root, NormalizedPath::default()),
            QueryKind::Current => (current, parent),
        };
        for segment in &self.segments {
            match segment {
                SingularQuerySegment::Name(name) => {
                    let (k, v) = cur.as_object()?.get_key_value(name.as_str())?;
                    loc = loc.clone_and_push(k);
                    cur = v;
                }
                SingularQuerySegment::Index(i) => {
                    let arr = cur.as_array()?;
                    let idx = normalize_singular_index(*i, arr.len())?;
                    cur = arr.get(idx)?;
                    loc = loc.clone_and_push(idx);
                }
            }
        }
        Some(LocatedNode { loc, node: cur })
    }
}

impl Queryable for SingularQuery {
    fn query<'b>(&self, current: &'b Value, root: &'b Value, _registry: &FunctionRegistry) -> Vec<&'b Value> {
        self.eval_query(current, root).into_iter().collect()
    }

    fn query_located<'b>(
        &self,
        current: &'b Value,
        root: &'b Value,
        _registry: &FunctionRegistry,
        parent: NormalizedPath<'b>,
    ) -> Vec<LocatedNode<'b>> {
        self.eval_query_located(current, root, parent).into_iter().collect()
    }
}

/// Normalize a (possibly negative) singular-query index against an array length
fn normalize_singular_index(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let i = usize::try_from(index).ok()?;
        (i < len).then_some(i)
    } else {
        let offset = index.checked_abs().and_then(|i| usize::try_from(i).ok())?;
        len.checked_sub(offset)
    }
}

/// A [`Query`] was not a singular query (it contained a wildcard, slice, filter, or
/// descendant segment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("query is not a singular query")]
pub struct NonSingularQueryError;

/// Deep-equality for two optional values, where `None` represents `Nothing`
///
/// Per RFC 9535 Table 11, `Nothing == Nothing` is `true`, and `Nothing` compares unequal to
/// every other value.
fn values_equal_opt(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

/// Less-than for two optional values; `Nothing` on either side is never less than anything
fn value_less_than_opt(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(a), Some(b)) => value_less_than(a, b),
        _ => false,
    }
}

/// Deep structural equality of two JSON values, per RFC 9535 section 2.3.5.2
///
/// Arrays are equal iff they have the same length and their elements are equal pairwise, in
/// order; objects are equal iff they have the same set of member names and equal values for
/// each (order does not matter).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => objects_equal(a, b),
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    a.as_f64() == b.as_f64()
}

fn objects_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, other)))
}

/// Less-than for two JSON values, per RFC 9535 Table 11
///
/// Only numbers and strings support ordering; every other pair of types (including two
/// arrays or two objects) is never less-than, regardless of content.
fn value_less_than(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        (Value::String(a), Value::String(b)) => a < b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_arrays_are_deep_compared() {
        assert!(values_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!([1, 2, 3]), &json!([1, 2, 4])));
    }

    #[test]
    fn equal_objects_ignore_key_order() {
        assert!(values_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
    }

    #[test]
    fn numbers_compare_across_representations() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(value_less_than(&json!(1), &json!(2)));
        assert!(!value_less_than(&json!(2), &json!(1)));
    }

    #[test]
    fn arrays_are_never_less_than() {
        assert!(!value_less_than(&json!([1]), &json!([1, 2])));
    }

    #[test]
    fn nothing_equals_only_nothing() {
        assert!(values_equal_opt(None, None));
        assert!(!values_equal_opt(None, Some(&json!(null))));
        assert!(!value_less_than_opt(None, Some(&json!(1))));
    }

    #[test]
    fn singular_query_segment_rejects_wildcard() {
        let err = SingularQuerySegment::try_from(Selector::Wildcard);
        assert!(err.is_err());
    }
}
