use nom::character::complete::char;
use nom::combinator::{cut, map_res};
use nom::multi::separated_list0;
use nom::sequence::{preceded, terminated};
use nom::{
    branch::alt,
    character::complete::{multispace0, satisfy},
    combinator::map,
    multi::fold_many1,
    sequence::{delimited, pair},
};

use once_cell::sync::Lazy;

pub use jsonpath_rfc9535_core::spec::functions::JsonPathTypeKind;
use jsonpath_rfc9535_core::spec::functions::{FunctionExpr, FunctionExprArg, FunctionRegistry};

use crate::parser::{parse_query, PResult};

use super::filter::{parse_literal, parse_logical_or_expr, parse_singular_path};

static FUNCTION_REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::with_builtins);

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name_first(input: &str) -> PResult<char> {
    satisfy(|c| c.is_ascii_lowercase())(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name_char(input: &str) -> PResult<char> {
    alt((
        parse_function_name_first,
        char('_'),
        satisfy(|c| c.is_ascii_digit()),
    ))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name(input: &str) -> PResult<String> {
    map(
        pair(
            parse_function_name_first,
            fold_many1(
                parse_function_name_char,
                String::new,
                |mut string, fragment| {
                    string.push(fragment);
                    string
                },
            ),
        ),
        |(first, rest)| format!("{first}{rest}"),
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_argument(input: &str) -> PResult<FunctionExprArg> {
    alt((
        map(parse_literal, FunctionExprArg::Literal),
        map(parse_singular_path, FunctionExprArg::SingularQuery),
        map(parse_query, FunctionExprArg::FilterQuery),
        map(parse_function_expr, FunctionExprArg::FunctionExpr),
        map(parse_logical_or_expr, FunctionExprArg::LogicalExpr),
    ))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_function_expr(input: &str) -> PResult<FunctionExpr> {
    cut(map_res(
        pair(
            parse_function_name,
            delimited(
                terminated(char('('), multispace0),
                separated_list0(
                    delimited(multispace0, char(','), multispace0),
                    parse_function_argument,
                ),
                preceded(multispace0, char(')')),
            ),
        ),
        |(name, args)| {
            let return_type = FunctionExpr::validate(&name, &args, &FUNCTION_REGISTRY)?;
            Ok(FunctionExpr {
                name,
                args,
                return_type,
            })
        },
    ))(input)
}
