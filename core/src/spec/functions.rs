//! Function extensions: the three-type system (RFC 9535 section 2.4) and the five
//! built-in functions (`length`, `count`, `match`, `search`, `value`)
use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::node::NodeList;
use crate::spec::{
    query::{Query, Queryable},
    selector::filter::{Literal, LogicalOrExpr, SingularQuery, TestFilter},
};

/// The kinds of the JSONPath function-extension type system
///
/// [`JsonPathTypeKind::Node`] and [`JsonPathTypeKind::Value`] both surface as `ValueType` to a
/// function's declared signature; they are kept distinct here because they convert differently:
/// a singular query (`Node`) is still a query and can fill a `NodesType` parameter, while a
/// literal (`Value`) cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonPathTypeKind {
    /// A (possibly empty, possibly multi-element) sequence of nodes, produced by a non-singular
    /// filter-query
    Nodes,
    /// A singular query's result: at most one node, usable as either a nodelist or a value
    Node,
    /// A single JSON value, or the special `Nothing` value representing absence
    Value,
    /// A boolean used in a logical context
    Logical,
}

impl JsonPathTypeKind {
    /// Can a value of kind `self` be used where a value of kind `target` is expected
    pub fn converts_to(self, target: JsonPathTypeKind) -> bool {
        matches!(
            (self, target),
            (JsonPathTypeKind::Nodes, JsonPathTypeKind::Nodes | JsonPathTypeKind::Logical)
                | (
                    JsonPathTypeKind::Node,
                    JsonPathTypeKind::Nodes | JsonPathTypeKind::Node | JsonPathTypeKind::Value
                )
                | (JsonPathTypeKind::Value, JsonPathTypeKind::Node | JsonPathTypeKind::Value)
                | (JsonPathTypeKind::Logical, JsonPathTypeKind::Logical)
        )
    }
}

impl fmt::Display for JsonPathTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonPathTypeKind::Nodes => write!(f, "NodesType"),
            JsonPathTypeKind::Node | JsonPathTypeKind::Value => write!(f, "ValueType"),
            JsonPathTypeKind::Logical => write!(f, "LogicalType"),
        }
    }
}

/// A runtime value belonging to one of the three function-extension types
#[derive(Debug, Clone)]
pub enum JsonPathType<'a> {
    /// A nodelist, as produced by a filter-query argument
    Nodes(NodeList<'a>),
    /// A single value, or `None` to represent `Nothing`
    Value(Option<Cow<'a, Value>>),
    /// A boolean
    Logical(bool),
}

impl<'a> JsonPathType<'a> {
    /// The kind of this value
    pub fn kind(&self) -> JsonPathTypeKind {
        match self {
            JsonPathType::Nodes(_) => JsonPathTypeKind::Nodes,
            JsonPathType::Value(_) => JsonPathTypeKind::Value,
            JsonPathType::Logical(_) => JsonPathTypeKind::Logical,
        }
    }

    /// Convert this value to a boolean for use in a logical context
    ///
    /// A [`JsonPathType::Nodes`] converts via the existence test: `true` iff non-empty. A
    /// [`JsonPathType::Value`] has no logical conversion and always tests `false`.
    pub fn as_logical(&self) -> bool {
        match self {
            JsonPathType::Nodes(nodes) => !nodes.is_empty(),
            JsonPathType::Logical(b) => *b,
            JsonPathType::Value(_) => false,
        }
    }
}

/// Marker wrapper for a function parameter or return value of type `NodesType`
pub struct NodesType<'a>(pub NodeList<'a>);

impl<'a> NodesType<'a> {
    /// The static kind tag for this type, used by generated validators
    pub fn json_path_type() -> JsonPathTypeKind {
        JsonPathTypeKind::Nodes
    }
}

impl<'a> TryFrom<JsonPathType<'a>> for NodesType<'a> {
    type Error = ConversionError;

    fn try_from(value: JsonPathType<'a>) -> Result<Self, Self::Error> {
        match value {
            JsonPathType::Nodes(n) => Ok(NodesType(n)),
            other => Err(ConversionError(other.kind(), JsonPathTypeKind::Nodes)),
        }
    }
}

impl<'a> From<NodesType<'a>> for JsonPathType<'a> {
    fn from(value: NodesType<'a>) -> Self {
        JsonPathType::Nodes(value.0)
    }
}

/// Marker wrapper for a function parameter or return value of type `ValueType`
pub struct ValueType<'a>(pub Option<Cow<'a, Value>>);

impl<'a> ValueType<'a> {
    /// The static kind tag for this type, used by generated validators
    pub fn json_path_type() -> JsonPathTypeKind {
        JsonPathTypeKind::Value
    }

    /// Is this the special `Nothing` value
    pub fn is_nothing(&self) -> bool {
        self.0.is_none()
    }
}

impl<'a> TryFrom<JsonPathType<'a>> for ValueType<'a> {
    type Error = ConversionError;

    fn try_from(value: JsonPathType<'a>) -> Result<Self, Self::Error> {
        match value {
            JsonPathType::Value(v) => Ok(ValueType(v)),
            other => Err(ConversionError(other.kind(), JsonPathTypeKind::Value)),
        }
    }
}

impl<'a> From<ValueType<'a>> for JsonPathType<'a> {
    fn from(value: ValueType<'a>) -> Self {
        JsonPathType::Value(value.0)
    }
}

/// Marker wrapper for a function parameter or return value of type `LogicalType`
#[derive(Debug, Clone, Copy)]
pub struct LogicalType(pub bool);

impl LogicalType {
    /// The static kind tag for this type, used by generated validators
    pub fn json_path_type() -> JsonPathTypeKind {
        JsonPathTypeKind::Logical
    }
}

impl<'a> TryFrom<JsonPathType<'a>> for LogicalType {
    type Error = ConversionError;

    fn try_from(value: JsonPathType<'a>) -> Result<Self, Self::Error> {
        Ok(LogicalType(value.as_logical()))
    }
}

impl<'a> From<LogicalType> for JsonPathType<'a> {
    fn from(value: LogicalType) -> Self {
        JsonPathType::Logical(value.0)
    }
}

/// A value of one kind was used where a value of another kind was required
#[derive(Debug, thiserror::Error)]
#[error("cannot convert a value of type {0} to a value of type {1}")]
pub struct ConversionError(pub JsonPathTypeKind, pub JsonPathTypeKind);

/// A validator checks a function call's arguments against the function's declared signature,
/// without evaluating them against any particular document
pub type Validator =
    Box<dyn Fn(&[FunctionExprArg], &FunctionRegistry) -> Result<(), FunctionValidationError> + Sync + Send>;

/// An evaluator carries out a function call against a particular document
pub type Evaluator = Box<dyn for<'a> Fn(VecDeque<JsonPathType<'a>>) -> JsonPathType<'a> + Sync + Send>;

/// A registered JSONPath function extension
pub struct Function {
    /// The function's name, as it appears in a query
    pub name: &'static str,
    /// The type this function returns
    pub result_type: JsonPathTypeKind,
    /// Checks arguments against this function's declared parameter types
    pub validator: &'static Lazy<Validator>,
    /// Evaluates this function against its (already-evaluated) arguments
    pub evaluator: &'static Lazy<Evaluator>,
}

impl Function {
    /// Declare a new function extension, to be registered via [`inventory::submit!`]
    pub const fn new(
        name: &'static str,
        result_type: JsonPathTypeKind,
        evaluator: &'static Lazy<Evaluator>,
        validator: &'static Lazy<Validator>,
    ) -> Self {
        Self {
            name,
            result_type,
            validator,
            evaluator,
        }
    }
}

inventory::collect!(Function);

/// The set of function extensions available to a query
///
/// Built by default from every [`Function`] registered via [`inventory::submit!`] (including
/// the five RFC 9535 built-ins below and any defined with `#[function]`), but callers may also
/// build an empty registry with [`FunctionRegistry::new`] and add to it explicitly, so that a
/// query's available functions are never resolved from implicit, process-wide state.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, &'static Function>,
}

impl FunctionRegistry {
    /// An empty registry, with no functions available
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// A registry populated with every function registered via [`inventory::submit!`]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for function in inventory::iter::<Function> {
            registry.functions.insert(function.name, function);
        }
        registry
    }

    /// Add or replace a function in this registry
    pub fn register(&mut self, function: &'static Function) {
        self.functions.insert(function.name, function);
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&'static Function> {
        self.functions.get(name).copied()
    }
}

/// A function call, as it appears in a filter expression, e.g. `length(@.name)`
#[derive(Debug, Clone)]
pub struct FunctionExpr {
    /// The function's name
    pub name: String,
    /// The function's arguments
    pub args: Vec<FunctionExprArg>,
    /// The function's declared return type, resolved when the expression was parsed
    pub return_type: JsonPathTypeKind,
}

impl fmt::Display for FunctionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for FunctionExpr {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}
impl Eq for FunctionExpr {}

impl FunctionExpr {
    /// Validate a function call's name and arguments against `registry`, resolving the
    /// function's declared return type in the process
    pub fn validate(
        name: &str,
        args: &[FunctionExprArg],
        registry: &FunctionRegistry,
    ) -> Result<JsonPathTypeKind, FunctionValidationError> {
        let function = registry
            .get(name)
            .ok_or_else(|| FunctionValidationError::Undefined(name.to_owned()))?;
        (function.validator)(args, registry)?;
        Ok(function.result_type)
    }

    /// Evaluate this function call against a document
    pub fn evaluate<'a>(&self, current: &'a Value, root: &'a Value, registry: &FunctionRegistry) -> JsonPathType<'a> {
        let Some(function) = registry.get(self.name.as_str()) else {
            return JsonPathType::Logical(false);
        };
        let args: VecDeque<JsonPathType<'a>> = self
            .args
            .iter()
            .map(|a| a.evaluate(current, root, registry))
            .collect();
        (function.evaluator)(args)
    }
}

/// A single argument to a function call
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionExprArg {
    /// A literal value
    Literal(Literal),
    /// A singular query, producing at most one value
    SingularQuery(SingularQuery),
    /// A filter-query, producing a nodelist
    FilterQuery(Query),
    /// A nested logical expression (a test-expression or comparison)
    LogicalExpr(LogicalOrExpr),
    /// A nested function call
    FunctionExpr(FunctionExpr),
}

impl fmt::Display for FunctionExprArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionExprArg::Literal(l) => write!(f, "{l}"),
            FunctionExprArg::SingularQuery(q) => write!(f, "{q}"),
            FunctionExprArg::FilterQuery(q) => write!(f, "{q}"),
            FunctionExprArg::LogicalExpr(l) => write!(f, "{l}"),
            FunctionExprArg::FunctionExpr(func) => write!(f, "{func}"),
        }
    }
}

impl FunctionExprArg {
    /// The static type kind this argument will produce, resolved without evaluating it
    /// against any particular document
    pub fn as_type_kind(&self, registry: &FunctionRegistry) -> Result<JsonPathTypeKind, FunctionValidationError> {
        match self {
            FunctionExprArg::Literal(_) => Ok(JsonPathTypeKind::Value),
            FunctionExprArg::SingularQuery(_) => Ok(JsonPathTypeKind::Node),
            FunctionExprArg::FilterQuery(_) => Ok(JsonPathTypeKind::Nodes),
            FunctionExprArg::LogicalExpr(_) => Ok(JsonPathTypeKind::Logical),
            FunctionExprArg::FunctionExpr(func) => {
                let _ = FunctionExpr::validate(&func.name, &func.args, registry)?;
                Ok(func.return_type)
            }
        }
    }

    /// Evaluate this argument against a document
    pub fn evaluate<'a>(&self, current: &'a Value, root: &'a Value, registry: &FunctionRegistry) -> JsonPathType<'a> {
        match self {
            FunctionExprArg::Literal(l) => JsonPathType::Value(Some(Cow::Owned(l.to_value()))),
            FunctionExprArg::SingularQuery(q) => JsonPathType::Value(q.eval_query(current, root).map(Cow::Borrowed)),
            FunctionExprArg::FilterQuery(q) => JsonPathType::Nodes(q.query(current, root, registry).into()),
            FunctionExprArg::LogicalExpr(l) => JsonPathType::Logical(l.test(current, root, registry)),
            FunctionExprArg::FunctionExpr(func) => func.evaluate(current, root, registry),
        }
    }
}

/// An error produced while validating a function call's arguments against its declared
/// signature
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunctionValidationError {
    /// The function name is not registered
    #[error("function '{0}' is not defined")]
    Undefined(String),
    /// The wrong number of arguments were supplied
    #[error("function '{name}' expects {expected} argument(s), but {received} were supplied")]
    NumberOfArgsMismatch {
        /// The function's name
        name: String,
        /// The expected number of arguments
        expected: usize,
        /// The number of arguments actually supplied
        received: usize,
    },
    /// An argument's type does not match the declared parameter type
    #[error("function '{name}' expects {expected} in position {position}, but received {received}")]
    MismatchTypeKind {
        /// The function's name
        name: String,
        /// The expected type
        expected: JsonPathTypeKind,
        /// The type actually supplied
        received: JsonPathTypeKind,
        /// The zero-based position of the mismatched argument
        position: usize,
    },
    /// A function used in a context requiring a different return type
    #[error("function '{0}' does not return the type required by its context")]
    IncorrectFunctionReturnType(String),
}

macro_rules! builtin {
    ($const_validator:ident, $const_evaluator:ident, $name:literal, $result:expr, |$args:ident, $registry:ident| $validate:block, |$values:ident| $eval:block) => {
        static $const_validator: Lazy<Validator> = Lazy::new(|| {
            Box::new(
                |$args: &[FunctionExprArg], $registry: &FunctionRegistry| -> Result<(), FunctionValidationError> {
                    $validate
                },
            )
        });
        static $const_evaluator: Lazy<Evaluator> = Lazy::new(|| {
            Box::new(|mut $values: VecDeque<JsonPathType<'_>>| -> JsonPathType<'_> { $eval })
        });
        inventory::submit! { Function::new($name, $result, &$const_evaluator, &$const_validator) }
    };
}

fn expect_args(
    name: &'static str,
    args: &[FunctionExprArg],
    expected: usize,
    registry: &FunctionRegistry,
    kinds: &[JsonPathTypeKind],
) -> Result<(), FunctionValidationError> {
    if args.len() != expected {
        return Err(FunctionValidationError::NumberOfArgsMismatch {
            name: name.to_owned(),
            expected,
            received: args.len(),
        });
    }
    for (position, (arg, &expected_kind)) in args.iter().zip(kinds).enumerate() {
        let actual = arg.as_type_kind(registry)?;
        if !actual.converts_to(expected_kind) {
            return Err(FunctionValidationError::MismatchTypeKind {
                name: name.to_owned(),
                expected: expected_kind,
                received: actual,
                position,
            });
        }
    }
    Ok(())
}

builtin!(
    LENGTH_VALIDATOR,
    LENGTH_EVALUATOR,
    "length",
    JsonPathTypeKind::Value,
    |args, registry| { expect_args("length", args, 1, registry, &[JsonPathTypeKind::Value]) },
    |values| {
        let Some(JsonPathType::Value(Some(value))) = values.pop_front() else {
            return JsonPathType::Value(None);
        };
        let len = match value.as_ref() {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        };
        JsonPathType::Value(len.map(|l| Cow::Owned(Value::from(l))))
    }
);

builtin!(
    COUNT_VALIDATOR,
    COUNT_EVALUATOR,
    "count",
    JsonPathTypeKind::Value,
    |args, registry| { expect_args("count", args, 1, registry, &[JsonPathTypeKind::Nodes]) },
    |values| {
        let Some(JsonPathType::Nodes(nodes)) = values.pop_front() else {
            return JsonPathType::Value(Some(Cow::Owned(Value::from(0))));
        };
        JsonPathType::Value(Some(Cow::Owned(Value::from(nodes.len()))))
    }
);

builtin!(
    VALUE_VALIDATOR,
    VALUE_EVALUATOR,
    "value",
    JsonPathTypeKind::Value,
    |args, registry| { expect_args("value", args, 1, registry, &[JsonPathTypeKind::Nodes]) },
    |values| {
        let Some(JsonPathType::Nodes(nodes)) = values.pop_front() else {
            return JsonPathType::Value(None);
        };
        match nodes.at_most_one() {
            Ok(Some(v)) => JsonPathType::Value(Some(Cow::Borrowed(v))),
            _ => JsonPathType::Value(None),
        }
    }
);

builtin!(
    MATCH_VALIDATOR,
    MATCH_EVALUATOR,
    "match",
    JsonPathTypeKind::Logical,
    |args, registry| {
        expect_args(
            "match",
            args,
            2,
            registry,
            &[JsonPathTypeKind::Value, JsonPathTypeKind::Value],
        )
    },
    |values| {
        let subject = values.pop_front();
        let pattern = values.pop_front();
        JsonPathType::Logical(regex_test(subject, pattern, true))
    }
);

builtin!(
    SEARCH_VALIDATOR,
    SEARCH_EVALUATOR,
    "search",
    JsonPathTypeKind::Logical,
    |args, registry| {
        expect_args(
            "search",
            args,
            2,
            registry,
            &[JsonPathTypeKind::Value, JsonPathTypeKind::Value],
        )
    },
    |values| {
        let subject = values.pop_front();
        let pattern = values.pop_front();
        JsonPathType::Logical(regex_test(subject, pattern, false))
    }
);

/// Evaluate `match`/`search` against their (already-evaluated) arguments
///
/// A non-string subject or pattern, or an invalid pattern, produces `false` rather than an
/// error: RFC 9535 section 2.4.8 treats a function that cannot otherwise be evaluated as
/// simply not matching, rather than aborting the whole query.
fn regex_test(subject: Option<JsonPathType<'_>>, pattern: Option<JsonPathType<'_>>, anchored: bool) -> bool {
    let Some(JsonPathType::Value(Some(subject))) = subject else {
        return false;
    };
    let Some(JsonPathType::Value(Some(pattern))) = pattern else {
        return false;
    };
    let (Some(subject), Some(pattern)) = (subject.as_str(), pattern.as_str()) else {
        return false;
    };
    let pattern = if anchored {
        format!("^(?:{pattern})$")
    } else {
        pattern.to_owned()
    };
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(subject),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_are_registered() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["length", "count", "match", "search", "value"] {
            assert!(registry.get(name).is_some(), "{name} should be registered");
        }
    }

    #[test]
    fn length_of_string_counts_chars() {
        let registry = FunctionRegistry::with_builtins();
        let f = registry.get("length").unwrap();
        let args = VecDeque::from([JsonPathType::Value(Some(Cow::Owned(json!("abc"))))]);
        match (f.evaluator)(args) {
            JsonPathType::Value(Some(v)) => assert_eq!(*v, json!(3)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn length_of_number_is_nothing() {
        let registry = FunctionRegistry::with_builtins();
        let f = registry.get("length").unwrap();
        let args = VecDeque::from([JsonPathType::Value(Some(Cow::Owned(json!(5))))]);
        match (f.evaluator)(args) {
            JsonPathType::Value(None) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn count_of_empty_nodelist_is_zero() {
        let registry = FunctionRegistry::with_builtins();
        let f = registry.get("count").unwrap();
        let args = VecDeque::from([JsonPathType::Nodes(NodeList::from(vec![]))]);
        match (f.evaluator)(args) {
            JsonPathType::Value(Some(v)) => assert_eq!(*v, json!(0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn match_is_anchored() {
        assert!(regex_test(
            Some(JsonPathType::Value(Some(Cow::Owned(json!("abc"))))),
            Some(JsonPathType::Value(Some(Cow::Owned(json!("a.c"))))),
            true
        ));
        assert!(!regex_test(
            Some(JsonPathType::Value(Some(Cow::Owned(json!("xabcx"))))),
            Some(JsonPathType::Value(Some(Cow::Owned(json!("abc"))))),
            true
        ));
    }

    #[test]
    fn search_is_unanchored() {
        assert!(regex_test(
            Some(JsonPathType::Value(Some(Cow::Owned(json!("xabcx"))))),
            Some(JsonPathType::Value(Some(Cow::Owned(json!("abc"))))),
            false
        ));
    }
}
