use std::borrow::Cow;

use serde_json::json;
use jsonpath_rfc9535::JsonPath;
use jsonpath_rfc9535::functions::{NodesType, ValueType};
#[cfg(feature = "trace")]
use test_log::test;

#[jsonpath_rfc9535::function]
fn first(nodes: NodesType) -> ValueType {
    match nodes.0.all().into_iter().next() {
        Some(v) => ValueType(Some(Cow::Borrowed(v))),
        None => ValueType(None),
    }
}

#[test]
fn first_function() {
    let value = json!([
        {
            "books": [
                {
                    "author": "Alexandre Dumas",
                    "title": "The Three Musketeers"
                },
                {
                    "author": "William Schirer",
                    "title": "The Rise and Fall of the Third Reich"
                }
            ]
        },
        {
            "books": [
                {
                    "author": "Charles Dickens",
                    "title": "Great Expectations"
                },
                {
                    "author": "Fyodor Dostoevsky",
                    "title": "The Brothers Karamazov"
                }
            ]
        }
    ]);
    let path = JsonPath::parse("$[?first(@.books.*.author) == 'Alexandre Dumas']").unwrap();
    let node = path.query(&value).exactly_one().unwrap();
    println!("{node:#?}");
    assert_eq!(
        "The Rise and Fall of the Third Reich",
        node.pointer("/books/1/title").unwrap().as_str().unwrap(),
    );
}
