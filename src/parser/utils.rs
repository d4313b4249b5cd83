use nom::error::{ContextError, ParseError};
use nom::{IResult, Parser};

/// Prevent a `cut` parser from poisoning an alt branch
pub(crate) fn uncut<I, O, E: ParseError<I>, F: Parser<I, O, E>>(
    mut parser: F,
) -> impl FnMut(I) -> IResult<I, O, E> {
    move |input: I| match parser.parse(input) {
        Err(nom::Err::Failure(e)) => Err(nom::Err::Error(e)),
        rest => rest,
    }
}

/// A fixed, static error message usable as nom parser context
pub(crate) trait StaticMessage {
    /// The message to attach to a [`nom::Err::Failure`]
    fn as_static_str(&self) -> &'static str;
}

/// Turn a recoverable parser error into a [`nom::Err::Failure`] carrying a fixed message
///
/// Used once a delimiter is known to be missing deep enough into a construct (e.g. past the
/// opening quote of a string literal) that backtracking to try a sibling `alt` branch would
/// only produce a worse error.
pub(crate) fn cut_with<I, O, E, F, G, M>(
    mut parser: F,
    to_message: G,
) -> impl FnMut(I) -> IResult<I, O, E>
where
    I: Clone,
    E: ParseError<I> + ContextError<I>,
    F: Parser<I, O, E>,
    G: Fn(I) -> M,
    M: StaticMessage,
{
    move |input: I| match parser.parse(input.clone()) {
        Err(nom::Err::Error(e)) => {
            let ctx = to_message(input.clone()).as_static_str();
            Err(nom::Err::Failure(E::add_context(input, ctx, e)))
        }
        other => other,
    }
}
