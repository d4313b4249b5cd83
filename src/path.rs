use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{de::Visitor, Deserialize, Serialize};
use serde_json::Value;
use jsonpath_rfc9535_core::{
    node::{LocatedNodeList, NodeList},
    path::NormalizedPath,
    spec::functions::FunctionRegistry,
    spec::query::{Query, Queryable},
};

use crate::{parser::parse_query_main, ParseError};

static DEFAULT_REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::with_builtins);

/// A parsed JSON Path query string
///
/// This type represents a valid, parsed JSON Path query string. Please refer to
/// [RFC 9535][rfc9535] for the details on what constitutes a valid JSON Path query.
///
/// # Usage
///
/// A `JsonPath` can be parsed directly from an `&str` using the [`parse`][JsonPath::parse] method:
/// ```rust
/// # use jsonpath_rfc9535::JsonPath;
/// # fn main() {
/// let path = JsonPath::parse("$.foo.*").expect("valid JSON Path");
/// # }
/// ```
/// It can then be used to query [`serde_json::Value`]'s with the [`query`][JsonPath::query] method:
/// ```rust
/// # use serde_json::json;
/// # use jsonpath_rfc9535::JsonPath;
/// # fn main() {
/// # let path = JsonPath::parse("$.foo.*").expect("valid JSON Path");
/// let value = json!({"foo": [1, 2, 3, 4]});
/// let nodes = path.query(&value);
/// assert_eq!(nodes.all(), vec![1, 2, 3, 4]);
/// # }
/// ```
///
/// [rfc9535]: https://www.rfc-editor.org/rfc/rfc9535.html
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct JsonPath(Query);

impl JsonPath {
    /// Create a [`JsonPath`] by parsing a valid JSON Path query string
    ///
    /// # Example
    /// ```rust
    /// # use jsonpath_rfc9535::JsonPath;
    /// # fn main() {
    /// let path = JsonPath::parse("$.foo[1:10:2].baz").expect("valid JSON Path");
    /// # }
    /// ```
    pub fn parse(path_str: &str) -> Result<Self, ParseError> {
        let (_, path) = parse_query_main(path_str).map_err(|err| match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => (path_str, e),
            nom::Err::Incomplete(_) => unreachable!("we do not use streaming parsers"),
        })?;
        Ok(Self(path))
    }

    /// Query a [`serde_json::Value`] using this [`JsonPath`]
    ///
    /// Any function calls in filter selectors are resolved against the built-in functions
    /// (`length`, `count`, `match`, `search`, `value`) together with any functions registered
    /// via the [`function`][crate::function] attribute macro. Use
    /// [`query_with_registry`][JsonPath::query_with_registry] to evaluate against a different,
    /// explicitly-constructed set of functions.
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonpath_rfc9535::JsonPath;
    /// # fn main() -> Result<(), jsonpath_rfc9535::ParseError> {
    /// let path = JsonPath::parse("$.foo[::2]")?;
    /// let value = json!({"foo": [1, 2, 3, 4]});
    /// let nodes = path.query(&value);
    /// assert_eq!(nodes.all(), vec![1, 3]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn query<'b>(&self, value: &'b Value) -> NodeList<'b> {
        self.query_with_registry(value, &DEFAULT_REGISTRY)
    }

    /// Query a [`serde_json::Value`], resolving function calls against `registry` instead of
    /// the default set of built-in and `#[function]`-registered functions
    pub fn query_with_registry<'b>(&self, value: &'b Value, registry: &FunctionRegistry) -> NodeList<'b> {
        self.0.query(value, value, registry).into()
    }

    /// Query a [`serde_json::Value`], producing each matched node paired with its
    /// [normalized path][NormalizedPath]
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use jsonpath_rfc9535::JsonPath;
    /// # fn main() -> Result<(), jsonpath_rfc9535::ParseError> {
    /// let path = JsonPath::parse("$.foo[::2]")?;
    /// let value = json!({"foo": [1, 2, 3, 4]});
    /// let nodes = path.query_located(&value);
    /// assert_eq!(nodes.locations().map(ToString::to_string).collect::<Vec<_>>(), vec!["$['foo'][0]", "$['foo'][2]"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn query_located<'b>(&self, value: &'b Value) -> LocatedNodeList<'b> {
        self.query_located_with_registry(value, &DEFAULT_REGISTRY)
    }

    /// Query a [`serde_json::Value`] for located nodes, resolving function calls against
    /// `registry` instead of the default set of functions
    pub fn query_located_with_registry<'b>(
        &self,
        value: &'b Value,
        registry: &FunctionRegistry,
    ) -> LocatedNodeList<'b> {
        self.0
            .query_located(value, value, registry, NormalizedPath::default())
            .into()
    }
}

impl FromStr for JsonPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{path}", path = self.0)
    }
}

impl Serialize for JsonPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct JsonPathVisitor;

        impl<'de> Visitor<'de> for JsonPathVisitor {
            type Value = JsonPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a string representing a JSON Path query")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                JsonPath::parse(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(JsonPathVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json, to_value};

    use crate::JsonPath;

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<JsonPath>();
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<JsonPath>();
    }

    #[test]
    fn serde_round_trip() {
        let j1 = json!("$.foo['bar'][1:10][?@.baz > 10 && @.foo.bar < 20]");
        let p1 = from_value::<JsonPath>(j1).expect("deserializes");
        let p2 = to_value(&p1)
            .and_then(from_value::<JsonPath>)
            .expect("round trip");
        assert_eq!(p1, p2);
    }

    #[test]
    fn query_uses_builtin_functions() {
        let path = JsonPath::parse("$[?length(@.name) > 3]").expect("valid JSON Path");
        let value = json!([{"name": "Alice"}, {"name": "Bob"}]);
        let nodes = path.query(&value);
        assert_eq!(nodes.len(), 1);
    }
}
