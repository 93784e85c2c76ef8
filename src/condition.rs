//! Visibility-condition mini-language: nom-based parser and evaluator.
//!
//! The grammar is intentionally closed: literals, bare/dotted identifiers,
//! `==` / `!=`, and `&&` / `||` (AND binds tighter than OR). No parentheses,
//! no negation, no arithmetic. Anything outside the grammar fails the parse,
//! and [`evaluate`] treats a failed parse as `false`: hiding a field is the
//! safe default, exposing one is not.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{map, opt, recognize},
    error::VerboseError,
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    Finish, IResult,
};
use serde_json::Value;
use thiserror::Error;

use crate::value_path::{comparison_string, is_truthy, lookup_path};

/// Parser error type with context information
pub type NomParseError<'a> = VerboseError<&'a str>;
pub type ParseResult<'a, T> = IResult<&'a str, T, NomParseError<'a>>;

/// A condition failed to parse under the closed grammar.
///
/// [`evaluate`] swallows this (fail-closed); the authoring validator
/// surfaces it as a warning via [`parse_condition`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid condition expression '{expression}': {message}")]
pub struct ConditionParseError {
    pub expression: String,
    pub message: String,
}

/// Comparison and logical operators of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    And,
    Or,
}

/// Literal operand values.
#[derive(Debug, Clone, PartialEq)]
pub enum CondLiteral {
    Bool(bool),
    Number(f64),
    Str(String),
}

/// Parsed condition AST.
#[derive(Debug, Clone, PartialEq)]
pub enum CondExpr {
    Literal(CondLiteral),
    /// Bare or dotted identifier, resolved against the data context.
    Ident(String),
    Binary {
        op: BinaryOp,
        lhs: Box<CondExpr>,
        rhs: Box<CondExpr>,
    },
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a complete condition expression.
///
/// The whole input must be consumed: trailing junk, parentheses, arithmetic
/// and any other out-of-grammar syntax are parse errors, not extensions.
pub fn parse_condition(input: &str) -> Result<CondExpr, ConditionParseError> {
    let result = preceded(multispace0, or_expr)(input).finish();
    match result {
        Ok((remaining, expr)) if remaining.trim().is_empty() => Ok(expr),
        Ok((remaining, _)) => Err(ConditionParseError {
            expression: input.to_string(),
            message: format!("unexpected trailing input '{}'", remaining.trim()),
        }),
        Err(e) => Err(ConditionParseError {
            expression: input.to_string(),
            message: format!("syntax error: {:?}", e.errors.first().map(|(_, k)| k)),
        }),
    }
}

/// or := and ("||" and)*
fn or_expr(input: &str) -> ParseResult<'_, CondExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(
        delimited(multispace0, tag("||"), multispace0),
        and_expr,
    ))(input)?;
    Ok((input, fold_binary(first, rest, BinaryOp::Or)))
}

/// and := comparison ("&&" comparison)*
fn and_expr(input: &str) -> ParseResult<'_, CondExpr> {
    let (input, first) = comparison(input)?;
    let (input, rest) = many0(preceded(
        delimited(multispace0, tag("&&"), multispace0),
        comparison,
    ))(input)?;
    Ok((input, fold_binary(first, rest, BinaryOp::And)))
}

fn fold_binary(first: CondExpr, rest: Vec<CondExpr>, op: BinaryOp) -> CondExpr {
    rest.into_iter().fold(first, |lhs, rhs| CondExpr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

/// comparison := operand (("==" | "!=") operand)?
fn comparison(input: &str) -> ParseResult<'_, CondExpr> {
    let (input, lhs) = operand(input)?;
    let (input, tail) = opt(pair(
        delimited(multispace0, alt((tag("=="), tag("!="))), multispace0),
        operand,
    ))(input)?;
    let expr = match tail {
        Some((op_text, rhs)) => CondExpr::Binary {
            op: if op_text == "==" {
                BinaryOp::Eq
            } else {
                BinaryOp::Ne
            },
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        None => lhs,
    };
    Ok((input, expr))
}

/// operand := string | number | word (true/false/identifier)
fn operand(input: &str) -> ParseResult<'_, CondExpr> {
    alt((
        map(string_literal, |s| CondExpr::Literal(CondLiteral::Str(s))),
        map(number_literal, |n| {
            CondExpr::Literal(CondLiteral::Number(n))
        }),
        map(word, classify_word),
    ))(input)
}

fn classify_word(word: &str) -> CondExpr {
    match word {
        "true" => CondExpr::Literal(CondLiteral::Bool(true)),
        "false" => CondExpr::Literal(CondLiteral::Bool(false)),
        other => CondExpr::Ident(other.to_string()),
    }
}

/// Single- or double-quoted string; no escape sequences in the grammar.
fn string_literal(input: &str) -> ParseResult<'_, String> {
    alt((
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
    ))(input)
    .map(|(rest, s)| (rest, s.to_string()))
}

fn number_literal(input: &str) -> ParseResult<'_, f64> {
    let (input, num_str) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(preceded(char('.'), digit1)),
    )))(input)?;
    let num = num_str.parse::<f64>().map_err(|_| {
        nom::Err::Error(VerboseError {
            errors: vec![(input, nom::error::VerboseErrorKind::Context("number"))],
        })
    })?;
    Ok((input, num))
}

/// Bare word or dotted path: `status`, `user.role`.
fn word(input: &str) -> ParseResult<'_, &str> {
    recognize(separated_list1(char('.'), ident_part))(input)
}

fn ident_part(input: &str) -> ParseResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// An operand resolved against the data context. Missing identifiers are
/// distinct from JSON null: they stringify to `"undefined"` in comparisons.
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Missing,
    Val(Value),
}

impl Resolved {
    fn comparison_string(&self) -> String {
        match self {
            Resolved::Missing => "undefined".to_string(),
            Resolved::Val(v) => comparison_string(v),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Resolved::Missing => false,
            Resolved::Val(v) => is_truthy(v),
        }
    }
}

/// Evaluate a condition expression against a data context.
///
/// Total: never panics and never errors. A malformed expression evaluates
/// to `false` (fail-closed), and that is a tested policy, not an accident.
/// Equality stringifies both sides, so `accommodation == true` matches both
/// boolean `true` and the string `"true"` — schema corpora write both forms.
pub fn evaluate(expression: &str, data: &Value) -> bool {
    match parse_condition(expression) {
        Ok(ast) => eval_expr(&ast, data).truthy(),
        Err(err) => {
            tracing::warn!(expression, error = %err, "condition failed to parse, evaluating to false");
            false
        }
    }
}

/// Evaluate an already-parsed condition AST.
pub fn evaluate_ast(ast: &CondExpr, data: &Value) -> bool {
    eval_expr(ast, data).truthy()
}

fn eval_expr(expr: &CondExpr, data: &Value) -> Resolved {
    match expr {
        CondExpr::Literal(lit) => Resolved::Val(literal_value(lit)),
        CondExpr::Ident(path) => match lookup_path(data, path) {
            Some(v) => Resolved::Val(v.clone()),
            None => Resolved::Missing,
        },
        CondExpr::Binary { op, lhs, rhs } => {
            let l = eval_expr(lhs, data);
            let r = eval_expr(rhs, data);
            let result = match op {
                BinaryOp::Eq => l.comparison_string() == r.comparison_string(),
                BinaryOp::Ne => l.comparison_string() != r.comparison_string(),
                BinaryOp::And => l.truthy() && r.truthy(),
                BinaryOp::Or => l.truthy() || r.truthy(),
            };
            Resolved::Val(Value::Bool(result))
        }
    }
}

fn literal_value(lit: &CondLiteral) -> Value {
    match lit {
        CondLiteral::Bool(b) => Value::Bool(*b),
        CondLiteral::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CondLiteral::Str(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_on_strings() {
        let data = json!({"a": "x", "b": "y"});
        assert!(evaluate("a == \"x\"", &data));
        assert!(!evaluate("a == \"y\"", &data));
        assert!(evaluate("a != \"y\"", &data));
        assert!(evaluate("a == 'x'", &data));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let data = json!({"a": "x", "b": "z", "c": "w"});
        // c == "w" || a == "x" && b == "y"  =>  true || (true && false)
        assert!(evaluate("c == \"w\" || a == \"x\" && b == \"y\"", &data));
        assert!(!evaluate("a == \"x\" && b == \"y\"", &data));
        assert!(evaluate("a == \"x\" && b == \"z\"", &data));
        assert!(evaluate("a == \"q\" || b == \"z\"", &data));
    }

    #[test]
    fn boolean_string_coercion() {
        let data = json!({"accommodation": true, "flag": "true"});
        assert!(evaluate("accommodation == true", &data));
        assert!(evaluate("accommodation == \"true\"", &data));
        assert!(evaluate("flag == true", &data));
        assert!(!evaluate("accommodation == false", &data));
    }

    #[test]
    fn numeric_coercion() {
        let data = json!({"count": 5});
        assert!(evaluate("count == 5", &data));
        assert!(evaluate("count == \"5\"", &data));
        assert!(!evaluate("count == 6", &data));
    }

    #[test]
    fn missing_identifiers_are_undefined() {
        let data = json!({"a": "x"});
        assert!(!evaluate("missing == \"x\"", &data));
        assert!(evaluate("missing != \"x\"", &data));
        assert!(!evaluate("missing", &data));
    }

    #[test]
    fn dotted_paths() {
        let data = json!({"user": {"role": "admin"}});
        assert!(evaluate("user.role == \"admin\"", &data));
        assert!(!evaluate("user.role == \"guest\"", &data));
        assert!(!evaluate("user.missing == \"admin\"", &data));
    }

    #[test]
    fn bare_operands_use_truthiness() {
        assert!(evaluate("true", &json!({})));
        assert!(!evaluate("false", &json!({})));
        assert!(evaluate("flag", &json!({"flag": true})));
        assert!(!evaluate("flag", &json!({"flag": false})));
        assert!(!evaluate("flag", &json!({"flag": ""})));
        assert!(evaluate("flag", &json!({"flag": "yes"})));
    }

    #[test]
    fn out_of_grammar_fails_closed() {
        let data = json!({"a": 1, "b": 2});
        assert!(!evaluate("(a == 1)", &data));
        assert!(!evaluate("a + b == 3", &data));
        assert!(!evaluate("!a", &data));
        assert!(!evaluate("a == 1 extra", &data));
        assert!(!evaluate("", &data));
        assert!(!evaluate("a ==", &data));
        assert!(!evaluate("&& a", &data));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let data = json!({"ticketType": "student"});
        let expr = "ticketType == \"student\"";
        let first = evaluate(expr, &data);
        for _ in 0..10 {
            assert_eq!(evaluate(expr, &data), first);
        }
    }

    #[test]
    fn parse_condition_reports_errors_for_lint() {
        assert!(parse_condition("a == \"x\"").is_ok());
        let err = parse_condition("(a)").unwrap_err();
        assert_eq!(err.expression, "(a)");
    }

    #[test]
    fn null_values_compare_as_null_string() {
        let data = json!({"a": null});
        assert!(evaluate("a == \"null\"", &data));
        assert!(!evaluate("a", &data));
    }
}
