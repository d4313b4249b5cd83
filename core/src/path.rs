//! Normalized paths: the canonical `$['name'][0]` string form of a node's location
use serde::Serialize;

/// A normalized path, as described by RFC 9535 section 2.7
///
/// A [`NormalizedPath`] is built up one step at a time as a query descends into a
/// [`serde_json::Value`], and borrows its name steps from the original document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedPath<'a>(Vec<PathElement<'a>>);

impl<'a> NormalizedPath<'a> {
    pub(crate) fn push<T: Into<PathElement<'a>>>(&mut self, elem: T) {
        self.0.push(elem.into())
    }

    pub(crate) fn clone_and_push<T: Into<PathElement<'a>>>(&self, elem: T) -> Self {
        let mut new_path = self.clone();
        new_path.push(elem);
        new_path
    }

    /// Render this path as a JSON Pointer (RFC 6901)
    ///
    /// Escapes `~` as `~0` and `/` as `~1` in each name step.
    pub fn as_json_pointer(&self) -> String {
        self.0.iter().fold(String::new(), |mut acc, elem| {
            acc.push('/');
            acc.push_str(&elem.as_json_pointer());
            acc
        })
    }

    /// The number of steps in this path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is this the root path, i.e., does it have no steps
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the steps of this path, from the root
    pub fn iter(&self) -> std::slice::Iter<'_, PathElement<'a>> {
        self.0.iter()
    }

    /// Get the first step in this path, if any
    pub fn first(&self) -> Option<&PathElement<'a>> {
        self.0.first()
    }

    /// Get the last step in this path, if any
    pub fn last(&self) -> Option<&PathElement<'a>> {
        self.0.last()
    }

    /// Get the step at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<&PathElement<'a>> {
        self.0.get(index)
    }
}

impl<'a> std::fmt::Display for NormalizedPath<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for elem in &self.0 {
            write!(f, "{elem}")?;
        }
        Ok(())
    }
}

impl<'a> Serialize for NormalizedPath<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A single step of a [`NormalizedPath`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElement<'a> {
    /// An object member name
    Name(&'a str),
    /// An array index
    Index(usize),
}

impl<'a> PathElement<'a> {
    fn as_json_pointer(&self) -> String {
        match self {
            PathElement::Name(s) => s.replace('~', "~0").replace('/', "~1"),
            PathElement::Index(i) => i.to_string(),
        }
    }
}

impl<'a> std::fmt::Display for PathElement<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathElement::Name(name) => write!(f, "[{}]", escape_name(name)),
            PathElement::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl<'a> PartialEq<str> for PathElement<'a> {
    fn eq(&self, other: &str) -> bool {
        matches!(self, PathElement::Name(s) if *s == other)
    }
}

impl<'a> PartialEq<&str> for PathElement<'a> {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, PathElement::Name(s) if s == other)
    }
}

impl<'a> PartialEq<usize> for PathElement<'a> {
    fn eq(&self, other: &usize) -> bool {
        matches!(self, PathElement::Index(i) if i == other)
    }
}

impl<'a> From<&'a String> for PathElement<'a> {
    fn from(s: &'a String) -> Self {
        Self::Name(s.as_str())
    }
}

impl<'a> From<&'a str> for PathElement<'a> {
    fn from(s: &'a str) -> Self {
        Self::Name(s)
    }
}

impl<'a> From<usize> for PathElement<'a> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Escape a member name per the normalized path rules in RFC 9535 section 2.7
///
/// Single quotes and backslashes are escaped, the well-known C0 control escapes
/// (`\b \t \n \f \r`) are used where applicable, and all other control characters
/// are escaped as `\u` followed by four lowercase hex digits.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('\'');
    for c in name.chars() {
        match c {
            '\u{08}' => out.push_str("\\b"),
            '\u{09}' => out.push_str("\\t"),
            '\u{0A}' => out.push_str("\\n"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{0D}' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\u{00}'..='\u{1F}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::{NormalizedPath, PathElement};

    #[test]
    fn normalized_path_to_json_pointer() {
        let mut np = NormalizedPath::default();
        np.push("foo");
        np.push(42usize);
        np.push("bar");
        assert_eq!(np.as_json_pointer(), "/foo/42/bar");
    }

    #[test]
    fn normalized_path_to_json_pointer_with_escapes() {
        let mut np = NormalizedPath::default();
        np.push("foo~bar");
        np.push(42usize);
        np.push("baz/bop");
        assert_eq!(np.as_json_pointer(), "/foo~0bar/42/baz~1bop");
    }

    #[test]
    fn normalized_path_display() {
        let mut np = NormalizedPath::default();
        np.push("foo");
        np.push(1usize);
        assert_eq!(np.to_string(), "$['foo'][1]");
    }

    #[test]
    fn normalized_path_display_escapes_control_chars() {
        let mut np = NormalizedPath::default();
        np.push("a\nb");
        assert_eq!(np.to_string(), "$['a\\nb']");
        assert!(matches!(np.first(), Some(PathElement::Name(_))));
    }
}
