//! Tokenizer and recursive-descent parser.
//!
//! The surface syntax has only two kinds of token: a parenthesis, which is
//! always a token of its own, and any maximal run of other non-whitespace
//! characters. Every non-paren token becomes an atom: an integer if it
//! parses as one, else a float, else a symbol.

use std::collections::VecDeque;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::one_of,
    combinator::recognize,
    multi::many0,
    sequence::{preceded, terminated},
};
use tracing::trace;

use crate::ast::{Expr, FloatType, IntType};
use crate::{Error, ParseErrorKind};

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace).parse(input)
}

/// A single `(` or `)`
fn paren(input: &str) -> IResult<&str, &str> {
    recognize(one_of("()")).parse(input)
}

/// A maximal run of characters that are neither whitespace nor parens
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_delimiter(c)).parse(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(whitespace, alt((paren, word))).parse(input)
}

/// Split source text into tokens. Empty or blank input yields no tokens.
pub fn tokenize(input: &str) -> Result<Vec<String>, Error> {
    match terminated(many0(token), whitespace).parse(input) {
        Ok(("", tokens)) => Ok(tokens.into_iter().map(str::to_owned).collect()),
        Ok((remaining, _)) => Err(Error::syntax(
            ParseErrorKind::Lexical,
            "cannot tokenize input",
            remaining.chars().next().map(String::from),
        )),
        Err(e) => Err(Error::syntax(
            ParseErrorKind::Lexical,
            format!("cannot tokenize input: {e}"),
            None,
        )),
    }
}

/// Classify a non-paren token. The order matters: `3` is an integer,
/// `3.0` a float and anything else, including `+`, a symbol.
pub fn atom(token: &str) -> Expr {
    if let Ok(n) = token.parse::<IntType>() {
        Expr::Integer(n)
    } else if let Ok(x) = token.parse::<FloatType>() {
        Expr::Float(x)
    } else {
        Expr::Symbol(token.to_owned())
    }
}

fn unexpected_eof(message: &str) -> Error {
    Error::syntax(ParseErrorKind::UnexpectedEof, message, None)
}

/// Read one expression from the front of `tokens`, leaving any tokens
/// after it in place.
pub fn read_from_tokens(tokens: &mut VecDeque<String>) -> Result<Expr, Error> {
    let Some(token) = tokens.pop_front() else {
        return Err(unexpected_eof("unexpected end of input"));
    };

    match token.as_str() {
        "(" => {
            let mut elements = Vec::new();
            loop {
                match tokens.front().map(String::as_str) {
                    Some(")") => {
                        tokens.pop_front();
                        return Ok(Expr::list(elements));
                    }
                    Some(_) => elements.push(read_from_tokens(tokens)?),
                    None => return Err(unexpected_eof("unexpected end of input: unclosed '('")),
                }
            }
        }
        ")" => Err(Error::syntax(
            ParseErrorKind::UnexpectedCloseParen,
            "unexpected close paren",
            None,
        )),
        _ => Ok(atom(&token)),
    }
}

/// Parse exactly one expression. Extra tokens after it are an error.
pub fn parse(input: &str) -> Result<Expr, Error> {
    let mut tokens: VecDeque<String> = tokenize(input)?.into();
    trace!(tokens = tokens.len(), "parse");
    let expr = read_from_tokens(&mut tokens)?;

    match tokens.front().map(String::as_str) {
        None => Ok(expr),
        Some(")") => Err(Error::syntax(
            ParseErrorKind::UnexpectedCloseParen,
            "unexpected close paren",
            None,
        )),
        Some(extra) => Err(Error::syntax(
            ParseErrorKind::TrailingContent,
            "unexpected input after expression",
            Some(extra.to_owned()),
        )),
    }
}

/// Parse every top-level expression in `input`, in order.
/// Blank input yields an empty program.
pub fn parse_program(input: &str) -> Result<Vec<Expr>, Error> {
    let mut tokens: VecDeque<String> = tokenize(input)?.into();
    let mut program = Vec::new();
    while !tokens.is_empty() {
        program.push(read_from_tokens(&mut tokens)?);
    }
    Ok(program)
}
