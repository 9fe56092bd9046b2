// ABOUTME: Reader — turns Lisp source text into a Value tree (§4.C). Token
// shapes (number, symbol) are recognized with nom; the list/string/quote
// structure is driven by a small hand-rolled descent so that unmatched-paren
// and unterminated-list/string failures can report an exact byte position.

use nom::{
    character::complete::{char, digit0, digit1, multispace0},
    combinator::opt,
    sequence::pair,
    IResult, Parser,
};

use crate::error::{ParseError, ParseErrorKind};
use crate::value::Value;

fn skip_ws(input: &str) -> &str {
    multispace0::<_, nom::error::Error<&str>>(input)
        .map(|(rest, _)| rest)
        .unwrap_or(input)
}

fn pos(original: &str, remaining: &str) -> usize {
    original.len() - remaining.len()
}

/// Recognizes `(digit|"-"digit) digit* ("." digit*)?` and returns the
/// matched span. Does not itself decide whether the span should be read as
/// a number versus the prefix of a longer symbol — see `parse_atom`.
fn number_token(input: &str) -> IResult<&str, &str> {
    nom::combinator::recognize(pair(
        opt(char('-')),
        pair(digit1, opt(pair(char('.'), digit0))),
    ))
    .parse(input)
}

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '\'' && c != '"'
}

fn symbol_token(input: &str) -> IResult<&str, &str> {
    nom::bytes::complete::take_while1(is_symbol_char).parse(input)
}

/// `expr := quotes (atom|list)`, `quotes := "'"*`. Leading `'` characters
/// accumulate into the produced value's quote level rather than desugaring
/// to a `(quote ...)` combination — see the `quote` special form for the
/// counterpart that lets code construct the same thing at runtime.
fn parse_expr<'a>(original: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    let input = skip_ws(input);
    let (input, level) = parse_quotes(input);
    match input.chars().next() {
        None => Err(ParseError::new(
            pos(original, input),
            ParseErrorKind::EmptyInput,
        )),
        Some(')') => Err(ParseError::new(
            pos(original, input),
            ParseErrorKind::UnmatchedParen,
        )),
        Some('(') => {
            let (rest, value) = parse_list(original, input)?;
            Ok((rest, value.quoted(level)))
        }
        Some(_) => {
            let (rest, value) = parse_atom(original, input)?;
            Ok((rest, value.quoted(level)))
        }
    }
}

fn parse_quotes(mut input: &str) -> (&str, u32) {
    let mut level = 0u32;
    while let Ok((rest, _)) = char::<_, nom::error::Error<&str>>('\'').parse(input) {
        level += 1;
        input = rest;
    }
    (input, level)
}

/// `list := "(" expr* ")"`; `()` reads as Nil. Built with `Value::cons`
/// directly (not `Value::list_owned`) so the resulting chain keeps quote
/// level 0 — a reader list is a combination to be evaluated, not data that
/// should self-quote on a later re-`eval`.
fn parse_list<'a>(original: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    let (mut rest, _) = char::<_, nom::error::Error<&str>>('(')
        .parse(input)
        .expect("caller confirmed a leading '('");
    let mut items = Vec::new();
    loop {
        rest = skip_ws(rest);
        match rest.chars().next() {
            None => {
                return Err(ParseError::new(
                    pos(original, rest),
                    ParseErrorKind::UnterminatedList,
                ))
            }
            Some(')') => {
                rest = &rest[1..];
                break;
            }
            Some(_) => {
                let (next, item) = parse_expr(original, rest)?;
                items.push(item);
                rest = next;
            }
        }
    }
    let mut list = Value::nil();
    for item in items.into_iter().rev() {
        list = Value::cons(item, list)
            .map_err(|e| ParseError::new(pos(original, rest), ParseErrorKind::Malformed(e.to_string())))?;
    }
    Ok((rest, list))
}

/// `atom := number|string|symbol`.
fn parse_atom<'a>(original: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    if input.starts_with('"') {
        return parse_string(original, input);
    }

    if let Ok((rest, token)) = number_token(input) {
        let at_boundary = rest.chars().next().is_none_or(|c| !is_symbol_char(c));
        if at_boundary {
            let n: f64 = token
                .parse()
                .expect("number_token only matches valid float syntax");
            return Ok((rest, Value::number(n)));
        }
    }

    if let Ok((rest, token)) = symbol_token(input) {
        let value = Value::symbol(token)
            .map_err(|e| ParseError::new(pos(original, input), ParseErrorKind::Malformed(e.to_string())))?;
        return Ok((rest, value));
    }

    Err(ParseError::new(
        pos(original, input),
        ParseErrorKind::Malformed(format!(
            "unexpected character {:?}",
            input.chars().next().unwrap()
        )),
    ))
}

/// `string := "\"" (escape|any-but-quote)* "\""`, `escape := "\\" any` —
/// the escaped character is taken verbatim (a literal `n`, not a newline),
/// so `\"` and `\\` are the only escapes that round-trip through the
/// printer; anything else just drops the backslash.
fn parse_string<'a>(original: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    let mut chars = input.char_indices();
    chars.next(); // opening quote, confirmed by the caller
    let mut result = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(ParseError::new(
                    original.len(),
                    ParseErrorKind::UnterminatedString,
                ))
            }
            Some((idx, '"')) => {
                let end = idx + 1;
                let value = Value::string(result).map_err(|e| {
                    ParseError::new(pos(original, &input[end..]), ParseErrorKind::Malformed(e.to_string()))
                })?;
                return Ok((&input[end..], value));
            }
            Some((_, '\\')) => match chars.next() {
                None => {
                    return Err(ParseError::new(
                        original.len(),
                        ParseErrorKind::UnterminatedString,
                    ))
                }
                Some((_, escaped)) => result.push(escaped),
            },
            Some((_, c)) => result.push(c),
        }
    }
}

/// Reads one top-level expression from the front of `input`, returning it
/// together with whatever text follows. Used by `parse` (which additionally
/// demands the remainder be blank) and by callers that run a whole file of
/// back-to-back top-level forms one at a time.
pub fn parse_one(input: &str) -> Result<(&str, Value), ParseError> {
    if skip_ws(input).is_empty() {
        return Err(ParseError::new(input.len(), ParseErrorKind::EmptyInput));
    }
    parse_expr(input, input)
}

/// Reads exactly one top-level expression from `input`. Trailing
/// whitespace after the expression is allowed; trailing non-whitespace
/// (including a second top-level form) is a parse error — the reader
/// reads one form at a time, the same way the evaluator consumes it.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let (rest, value) = parse_one(input)?;
    let rest = skip_ws(rest);
    if !rest.is_empty() {
        return Err(ParseError::new(
            pos(input, rest),
            ParseErrorKind::Malformed(format!(
                "unexpected trailing input: {:?}",
                rest.chars().take(20).collect::<String>()
            )),
        ));
    }
    Ok(value)
}
