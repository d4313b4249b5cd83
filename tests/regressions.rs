use serde_json::json;
use jsonpath_rfc9535::JsonPath;
#[cfg(feature = "trace")]
use test_log::test;

// A filter comparing the current node against a literal must not match when the node
// is absent from a sibling that lacks the compared field.
#[test]
fn comparison_false_when_property_absent() {
    let value = json!({"a": 1, "b": 2});
    let path = JsonPath::parse("$[?(@.a == 2)]").expect("parses JSONPath");
    assert!(path.query(&value).is_empty());
}

// A singular query is still a query: it must be usable anywhere a NodesType argument is
// expected, not just a ValueType argument.
#[test]
fn singular_query_satisfies_nodes_type_argument() {
    let value = json!([{"a": 1}, {"a": 2}, {}]);

    let path = JsonPath::parse("$[?count(@.a) == 1]").expect("parses JSONPath");
    assert_eq!(2, path.query(&value).len());

    let path = JsonPath::parse("$[?value(@.a) == 1]").expect("parses JSONPath");
    assert_eq!(1, path.query(&value).len());
}
