//! Query string parsing
//!
//! Turns a filter expression like `stars > 10 and language == 'Python'`
//! into a [`QueryNode`] tree. The grammar is fixed: `not ` prefixes,
//! ` and `/` or ` combinators split outside quotes, and leaf conditions
//! use one of the comparison operators below. Syntax errors surface here
//! and only here; evaluation never fails.

use serde_json::{Number, Value};
use thiserror::Error;

use crate::query::types::{CompareOp, QueryNode};
use crate::search::hierarchy::is_hierarchical_pattern;

/// Operators in detection priority order. The order is load-bearing:
/// several spellings are substrings of others (`=` inside `==`, `>`
/// inside `>=`), so the first operator found in THIS order wins, not the
/// leftmost occurrence in the text.
const OPERATORS: [(&str, CompareOp); 10] = [
    ("~=", CompareOp::Fuzzy),
    ("=~", CompareOp::Regex),
    ("==", CompareOp::Eq),
    ("!=", CompareOp::Ne),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    (" contains ", CompareOp::Contains),
    (" in ", CompareOp::In),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty query")]
    Empty,
    #[error("Missing operand for '{operator}'")]
    MissingOperand { operator: String },
}

impl QueryNode {
    /// Parse a query string into an expression tree
    ///
    /// # Errors
    /// Returns `ParseError::Empty` for blank input and
    /// `ParseError::MissingOperand` when an operator is present with an
    /// empty side.
    ///
    /// # Examples
    /// ```
    /// use reposcope::query::QueryNode;
    ///
    /// let query = QueryNode::parse("stars > 10 and language == 'Python'").unwrap();
    /// let same = QueryNode::parse("stars > 10 and language == 'Python'").unwrap();
    /// assert_eq!(query, same);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let text = strip_enclosing_parens(text).trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some(rest) = text.strip_prefix("not ") {
            return Ok(Self::Not(Box::new(Self::parse(rest)?)));
        }

        let and_parts = split_outside_quotes(text, " and ");
        if and_parts.len() > 1 {
            return Ok(Self::And(parse_parts(and_parts, "and")?));
        }

        let or_parts = split_outside_quotes(text, " or ");
        if or_parts.len() > 1 {
            return Ok(Self::Or(parse_parts(or_parts, "or")?));
        }

        parse_condition(text)
    }
}

impl TryFrom<&str> for QueryNode {
    type Error = ParseError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

fn parse_parts(parts: Vec<&str>, operator: &str) -> Result<Vec<QueryNode>, ParseError> {
    parts
        .into_iter()
        .map(|part| {
            if part.trim().is_empty() {
                Err(ParseError::MissingOperand {
                    operator: operator.to_string(),
                })
            } else {
                QueryNode::parse(part)
            }
        })
        .collect()
}

/// Split on every occurrence of `delimiter` that sits outside single or
/// double quotes
fn split_outside_quotes<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut start = 0;
    let mut i = 0;

    while let Some(c) = text[i..].chars().next() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            _ => {}
        }
        if !in_single && !in_double && text[i..].starts_with(delimiter) {
            parts.push(&text[start..i]);
            i += delimiter.len();
            start = i;
            continue;
        }
        i += c.len_utf8();
    }
    parts.push(&text[start..]);
    parts
}

/// Strip one layer of parentheses when they enclose the whole text
fn strip_enclosing_parens(text: &str) -> &str {
    if !text.starts_with('(') || !text.ends_with(')') {
        return text;
    }

    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return if i == text.len() - 1 {
                        &text[1..text.len() - 1]
                    } else {
                        text
                    };
                }
            }
            _ => {}
        }
    }
    text
}

fn parse_condition(text: &str) -> Result<QueryNode, ParseError> {
    for (token, op) in OPERATORS {
        let Some(index) = text.find(token) else {
            continue;
        };

        let left_raw = text[..index].trim();
        let right_raw = text[index + token.len()..].trim();
        if left_raw.is_empty() || right_raw.is_empty() {
            return Err(ParseError::MissingOperand {
                operator: token.trim().to_string(),
            });
        }

        let (left, left_quoted) = strip_quotes(left_raw);
        let (right, _) = strip_quotes(right_raw);

        // "'term' in field" reads more naturally than "field contains
        // 'term'"; normalize it to the contains form.
        let (field, op, raw_value) = if left_quoted && op == CompareOp::In {
            (right, CompareOp::Contains, left)
        } else {
            (left, op, right)
        };

        let value = infer_value(raw_value);

        let op = match &value {
            Value::String(s) if field == "tags" && is_hierarchical_pattern(s) => CompareOp::Matches,
            _ => op,
        };

        return Ok(QueryNode::condition(field, op, value));
    }

    let (stripped, was_quoted) = strip_quotes(text);
    if !was_quoted && !stripped.contains(' ') {
        // Bare field name: a truthiness probe on that field
        return Ok(QueryNode::condition(
            stripped,
            CompareOp::Eq,
            Value::Bool(true),
        ));
    }

    Ok(QueryNode::SimpleSearch(stripped.to_string()))
}

/// Strip one pair of matching enclosing quotes, reporting whether any
/// were present
fn strip_quotes(text: &str) -> (&str, bool) {
    let bytes = text.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        (&text[1..text.len() - 1], true)
    } else {
        (text, false)
    }
}

/// Infer the type of a raw value token
///
/// `none`/`null` (any case) become null, `true`/`false` become booleans,
/// numeric tokens become numbers (a `.` selects floating point),
/// `[...]` becomes a list of recursively inferred elements, and anything
/// else stays a string.
fn infer_value(raw: &str) -> Value {
    let lowered = raw.to_lowercase();
    if lowered == "none" || lowered == "null" {
        return Value::Null;
    }
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if raw.contains('.')
        && let Ok(f) = raw.parse::<f64>()
        && let Some(n) = Number::from_f64(f)
    {
        return Value::Number(n);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let inner = &raw[1..raw.len() - 1];
        if inner.trim().is_empty() {
            return Value::Array(Vec::new());
        }
        let items = inner
            .split(',')
            .map(|item| infer_value(strip_quotes(item.trim()).0))
            .collect();
        return Value::Array(items);
    }
    Value::String(raw.to_string())
}
