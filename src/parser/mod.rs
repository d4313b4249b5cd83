use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::error::VerboseError;
use nom::{branch::alt, combinator::map, multi::many0, sequence::preceded, IResult};

use jsonpath_rfc9535_core::spec::query::{Query, QueryKind};
use jsonpath_rfc9535_core::spec::segment::QuerySegment;

use self::segment::parse_segment;

pub mod primitive;
pub mod segment;
pub mod selector;
pub(crate) mod utils;

pub(crate) type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_query_segments(input: &str) -> PResult<Vec<QuerySegment>> {
    many0(parse_segment)(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_root_query(input: &str) -> PResult<Query> {
    map(preceded(char('$'), parse_query_segments), |segments| {
        Query {
            kind: QueryKind::Root,
            segments,
        }
    })(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_current_query(input: &str) -> PResult<Query> {
    map(preceded(char('@'), parse_query_segments), |segments| {
        Query {
            kind: QueryKind::Current,
            segments,
        }
    })(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_query(input: &str) -> PResult<Query> {
    alt((parse_root_query, parse_current_query))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub fn parse_query_main(input: &str) -> PResult<Query> {
    all_consuming(parse_root_query)(input)
}

#[cfg(test)]
mod tests {
    use jsonpath_rfc9535_core::spec::{
        query::QueryKind,
        segment::Segment,
        selector::{name::Name, Selector},
    };

    use super::{parse_query, parse_query_main};

    #[test]
    fn root_query() {
        {
            let (_, p) = parse_query("$").unwrap();
            assert!(matches!(p.kind, QueryKind::Root));
        }
        {
            let (_, p) = parse_query("$.name").unwrap();
            assert_eq!(p.segments[0].segment.as_dot_name().unwrap(), "name");
        }
        {
            let (_, p) = parse_query("$.names['first_name']..*").unwrap();
            assert_eq!(p.segments[0].segment.as_dot_name().unwrap(), "names");
            let clh = p.segments[1].segment.as_long_hand().unwrap();
            assert!(matches!(&clh[0], Selector::Name(Name(s)) if s == "first_name"));
            assert!(matches!(p.segments[2].segment, Segment::Wildcard));
        }
    }

    #[test]
    fn current_query() {
        {
            let (_, p) = parse_query("@").unwrap();
            assert!(matches!(p.kind, QueryKind::Current));
        }
    }

    #[test]
    fn no_tail() {
        assert!(parse_query_main("$.a['b']tail").is_err());
    }
}
