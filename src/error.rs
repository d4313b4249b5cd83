use nom::error::VerboseError;

/// An error produced when parsing a JSON Path query string
#[derive(Debug, thiserror::Error)]
#[error("{}", message)]
pub struct ParseError {
    position: usize,
    message: Box<str>,
}

impl ParseError {
    /// The byte offset into the original query string where parsing failed
    pub fn position(&self) -> usize {
        self.position
    }

    /// A human readable description of the parse failure
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<'a> From<(&'a str, VerboseError<&'a str>)> for ParseError {
    fn from((input, err): (&'a str, VerboseError<&'a str>)) -> Self {
        let position = err
            .errors
            .first()
            .map(|(rest, _)| input.len() - rest.len())
            .unwrap_or(0);
        let message = nom::error::convert_error(input, err).into_boxed_str();
        Self { position, message }
    }
}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ParseError>();
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<ParseError>();
    }

    #[test]
    fn reports_position_of_failure() {
        let err = crate::JsonPath::parse("$.a['b']tail").unwrap_err();
        assert_eq!(err.position(), 8);
    }
}
