//! Query expression tree types
//!
//! A parsed query is an immutable tree of boolean combinators over leaf
//! conditions. The same tree can be evaluated against any number of
//! records with any threshold.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a leaf condition
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    /// `==` - equality, case-insensitive for strings
    Eq,
    /// `!=` - negated equality
    Ne,
    /// `~=` - full-string fuzzy similarity against the threshold
    Fuzzy,
    /// `=~` - case-insensitive regular expression match
    Regex,
    /// `>` - numeric greater-than
    Gt,
    /// `<` - numeric less-than
    Lt,
    /// `>=` - numeric greater-or-equal
    Ge,
    /// `<=` - numeric less-or-equal
    Le,
    /// `contains` - membership with fuzzy and hierarchical fallbacks
    Contains,
    /// `in` - `contains` with the operand roles reversed
    In,
    /// Hierarchical tag match; has no source spelling, the parser forces
    /// it for wildcard patterns against the `tags` field
    Matches,
}

impl CompareOp {
    /// The operator's spelling in query text, including the mandatory
    /// surrounding spaces for the word operators
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Fuzzy => "~=",
            Self::Regex => "=~",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Contains => " contains ",
            Self::In => " in ",
            Self::Matches => " matches ",
        }
    }
}

/// One node of a parsed query expression
///
/// Produced by [`QueryNode::parse`](crate::query::QueryNode::parse) and
/// never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum QueryNode {
    /// All children must match
    And(Vec<QueryNode>),
    /// At least one child must match
    Or(Vec<QueryNode>),
    /// The child must not match
    Not(Box<QueryNode>),
    /// A field/operator/value comparison
    Condition {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// A bare term searched across every key and leaf of the record
    SimpleSearch(String),
}

impl QueryNode {
    /// Convenience constructor for a condition node
    #[must_use]
    pub fn condition(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self::Condition {
            field: field.into(),
            op,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_op_tokens_round_trip_spellings() {
        assert_eq!(CompareOp::Fuzzy.token(), "~=");
        assert_eq!(CompareOp::Regex.token(), "=~");
        assert_eq!(CompareOp::Contains.token(), " contains ");
        assert_eq!(CompareOp::In.token(), " in ");
    }

    #[test]
    fn test_condition_constructor() {
        let node = QueryNode::condition("language", CompareOp::Eq, json!("Python"));
        assert_eq!(
            node,
            QueryNode::Condition {
                field: "language".to_string(),
                op: CompareOp::Eq,
                value: json!("Python"),
            }
        );
    }
}
