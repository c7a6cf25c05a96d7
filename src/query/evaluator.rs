//! Query evaluation against metadata records
//!
//! Evaluation is a pure function of the expression tree, one record and
//! a similarity threshold. It never fails: unresolved fields, numeric
//! coercion failures, invalid regular expressions and type mismatches
//! all evaluate to `false` instead of raising.

use regex::RegexBuilder;
use serde_json::Value;

use crate::metadata::{MetadataRecord, scalar_text};
use crate::query::types::{CompareOp, QueryNode};
use crate::search::fuzzy;
use crate::search::hierarchy::{is_hierarchical_pattern, tag_matches};

/// Similarity cutoff applied when the caller does not pick one
pub const DEFAULT_THRESHOLD: u32 = 80;

/// Evaluates parsed queries at a fixed similarity threshold
#[derive(Clone, Copy, Debug)]
pub struct QueryEvaluator {
    threshold: u32,
}

impl Default for QueryEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl QueryEvaluator {
    #[must_use]
    pub const fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Decide whether a record matches the query
    #[must_use]
    pub fn matches(&self, node: &QueryNode, record: &MetadataRecord) -> bool {
        match node {
            QueryNode::And(children) => children.iter().all(|child| self.matches(child, record)),
            QueryNode::Or(children) => children.iter().any(|child| self.matches(child, record)),
            QueryNode::Not(child) => !self.matches(child, record),
            QueryNode::SimpleSearch(term) => self.simple_search(term, record),
            QueryNode::Condition { field, op, value } => self.condition(field, *op, value, record),
        }
    }

    /// Fuzzy full-text probe over every key and scalar leaf
    fn simple_search(&self, term: &str, record: &MetadataRecord) -> bool {
        record
            .text_fragments()
            .iter()
            .any(|fragment| fuzzy::similarity(fragment, term) >= self.threshold)
    }

    fn condition(&self, field: &str, op: CompareOp, value: &Value, record: &MetadataRecord) -> bool {
        let actual = record.resolve(field);

        // Bare-field truthiness probe: when the field cannot be resolved
        // at all, fall back to searching the field name across the record.
        if actual.is_none() && op == CompareOp::Eq && *value == Value::Bool(true) {
            return self.simple_search(field, record);
        }

        match op {
            CompareOp::Eq => equals(actual, value),
            CompareOp::Ne => !equals(actual, value),
            CompareOp::Fuzzy => self.check_fuzzy(actual, value),
            CompareOp::Regex => check_regex(actual, value),
            CompareOp::Contains => {
                actual.is_some_and(|container| self.check_contains(container, value))
            }
            CompareOp::In => actual.is_some_and(|item| self.check_contains(value, item)),
            CompareOp::Matches => actual.is_some_and(|actual| check_matches(actual, value)),
            CompareOp::Gt => check_ordering(actual, value, |a, b| a > b),
            CompareOp::Lt => check_ordering(actual, value, |a, b| a < b),
            CompareOp::Ge => check_ordering(actual, value, |a, b| a >= b),
            CompareOp::Le => check_ordering(actual, value, |a, b| a <= b),
        }
    }

    fn check_fuzzy(&self, actual: Option<&Value>, expected: &Value) -> bool {
        let Some(actual_text) = actual.and_then(scalar_text) else {
            return false;
        };
        let Some(expected_text) = scalar_text(expected) else {
            return false;
        };
        fuzzy::similarity(&actual_text, &expected_text) >= self.threshold
    }

    /// Membership check with three tiers for list containers: exact
    /// string-form equality, hierarchical wildcard matching, then
    /// per-element partial similarity. Scalar containers go straight to
    /// partial similarity.
    fn check_contains(&self, container: &Value, item: &Value) -> bool {
        let Some(item_text) = scalar_text(item) else {
            return false;
        };

        match container {
            Value::Array(elements) => {
                let texts: Vec<String> =
                    elements.iter().filter_map(scalar_text).collect();
                if texts.iter().any(|text| *text == item_text) {
                    return true;
                }
                if is_hierarchical_pattern(&item_text) {
                    return texts.iter().any(|text| tag_matches(text, &item_text));
                }
                texts
                    .iter()
                    .any(|text| fuzzy::partial_similarity(text, &item_text) >= self.threshold)
            }
            _ => scalar_text(container).is_some_and(|text| {
                fuzzy::partial_similarity(&text, &item_text) >= self.threshold
            }),
        }
    }
}

/// Evaluate with an explicit threshold, without building an evaluator
#[must_use]
pub fn evaluate(node: &QueryNode, record: &MetadataRecord, threshold: u32) -> bool {
    QueryEvaluator::new(threshold).matches(node, record)
}

/// Equality with the documented string/number special cases: a string
/// expectation compares lowercased string forms (unless the actual is a
/// boolean), numbers compare as floats across int/float representations,
/// and null equals only null.
fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    let actual = actual.unwrap_or(&Value::Null);

    if let Value::String(expected_text) = expected
        && !matches!(actual, Value::Bool(_))
    {
        return scalar_text(actual)
            .is_some_and(|text| text.to_lowercase() == expected_text.to_lowercase());
    }

    if let (Value::Number(a), Value::Number(b)) = (actual, expected) {
        return match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
    }

    actual == expected
}

fn check_regex(actual: Option<&Value>, pattern: &Value) -> bool {
    let Some(subject) = actual.and_then(scalar_text) else {
        return false;
    };
    let Some(pattern) = scalar_text(pattern) else {
        return false;
    };

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(&subject),
        Err(_) => false,
    }
}

fn check_matches(actual: &Value, pattern: &Value) -> bool {
    let Some(pattern) = scalar_text(pattern) else {
        return false;
    };

    match actual {
        Value::Array(elements) => elements
            .iter()
            .filter_map(scalar_text)
            .any(|tag| tag_matches(&tag, &pattern)),
        _ => scalar_text(actual).is_some_and(|tag| tag_matches(&tag, &pattern)),
    }
}

fn check_ordering(
    actual: Option<&Value>,
    expected: &Value,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    match (actual.and_then(coerce_f64), coerce_f64(expected)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Numbers and numeric strings coerce; everything else fails
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryNode;
    use serde_json::json;

    fn record(value: Value) -> MetadataRecord {
        MetadataRecord::from(value)
    }

    fn eval(query: &str, value: Value) -> bool {
        let node = QueryNode::parse(query).unwrap();
        QueryEvaluator::default().matches(&node, &record(value))
    }

    #[test]
    fn test_equality_case_insensitive_strings() {
        assert!(eval("language == 'Python'", json!({"language": "Python"})));
        assert!(eval("language == 'Python'", json!({"language": "python"})));
        assert!(!eval("language == 'Python'", json!({"language": "JavaScript"})));
    }

    #[test]
    fn test_equality_numbers_across_representations() {
        assert!(eval("stars == 5", json!({"stars": 5})));
        assert!(eval("stars == 5", json!({"stars": 5.0})));
        assert!(!eval("stars == 5", json!({"stars": 6})));
    }

    #[test]
    fn test_equality_null_only_null() {
        assert!(eval("description == none", json!({"description": null})));
        assert!(eval("description == none", json!({})));
        assert!(!eval("description == none", json!({"description": "text"})));
    }

    #[test]
    fn test_inequality() {
        assert!(eval("language != 'Python'", json!({"language": "Rust"})));
        assert!(!eval("language != 'Python'", json!({"language": "python"})));
    }

    #[test]
    fn test_and_or_combination() {
        let r = json!({"stars": 42, "language": "Python"});
        assert!(eval("stars > 10 and language == 'Python'", r.clone()));
        assert!(!eval(
            "stars > 10 and language == 'Python'",
            json!({"stars": 3, "language": "Python"})
        ));
        assert!(eval("stars > 100 or language == 'Python'", r));
    }

    #[test]
    fn test_and_is_conjunction_of_parts() {
        let both = QueryNode::parse("stars > 10 and language == 'Python'").unwrap();
        let left = QueryNode::parse("stars > 10").unwrap();
        let right = QueryNode::parse("language == 'Python'").unwrap();
        let evaluator = QueryEvaluator::default();

        for r in [
            json!({"stars": 42, "language": "Python"}),
            json!({"stars": 3, "language": "Python"}),
            json!({"stars": 42, "language": "Rust"}),
            json!({}),
        ] {
            let record = record(r);
            assert_eq!(
                evaluator.matches(&both, &record),
                evaluator.matches(&left, &record) && evaluator.matches(&right, &record)
            );
        }
    }

    #[test]
    fn test_not_negates() {
        let r = json!({"archived": true});
        let node = QueryNode::parse("not archived").unwrap();
        let inner = QueryNode::parse("archived").unwrap();
        let evaluator = QueryEvaluator::default();
        assert_eq!(
            evaluator.matches(&node, &record(r.clone())),
            !evaluator.matches(&inner, &record(r))
        );
    }

    #[test]
    fn test_fuzzy_operator() {
        assert!(eval("language ~= 'Pyton'", json!({"language": "Python"})));
        assert!(!eval("language ~= 'Haskell'", json!({"language": "Python"})));
    }

    #[test]
    fn test_regex_operator() {
        assert!(eval("name =~ '^repo-.*'", json!({"name": "repo-tools"})));
        assert!(eval("name =~ 'TOOLS'", json!({"name": "repo-tools"})));
        assert!(!eval("name =~ '^other'", json!({"name": "repo-tools"})));
    }

    #[test]
    fn test_regex_invalid_pattern_is_false() {
        assert!(!eval("name =~ '[unclosed'", json!({"name": "repo-tools"})));
    }

    #[test]
    fn test_ordering_operators() {
        let r = json!({"stars": 42});
        assert!(eval("stars > 10", r.clone()));
        assert!(eval("stars >= 42", r.clone()));
        assert!(eval("stars < 100", r.clone()));
        assert!(!eval("stars <= 41", r));
    }

    #[test]
    fn test_ordering_numeric_strings_coerce() {
        assert!(eval("stars > 10", json!({"stars": "42"})));
    }

    #[test]
    fn test_ordering_coercion_failure_is_false() {
        assert!(!eval("stars > 10", json!({"stars": "many"})));
        assert!(!eval("stars > 10", json!({"stars": [1, 2]})));
        assert!(!eval("stars > 10", json!({})));
    }

    #[test]
    fn test_contains_list_exact() {
        assert!(eval(
            "tags contains 'work'",
            json!({"tags": ["work", "oss"]})
        ));
    }

    #[test]
    fn test_contains_list_fuzzy_fallback() {
        assert!(eval(
            "topics contains 'parsing'",
            json!({"topics": ["query parsing engine"]})
        ));
    }

    #[test]
    fn test_contains_hierarchical_pattern() {
        assert!(eval(
            "tags contains 'lang:*'",
            json!({"tags": ["lang:python", "oss"]})
        ));
    }

    #[test]
    fn test_contains_scalar_partial() {
        assert!(eval(
            "description contains 'scraper'",
            json!({"description": "a fast web scraper in Rust"})
        ));
    }

    #[test]
    fn test_in_reverses_roles() {
        assert!(eval(
            "language in ['Python', 'Rust']",
            json!({"language": "Rust"})
        ));
        assert!(!eval(
            "language in ['Python', 'Rust']",
            json!({"language": "Go"})
        ));
    }

    #[test]
    fn test_wildcard_tag_queries() {
        assert!(eval(
            "tags contains 'work/*'",
            json!({"tags": ["work/active"]})
        ));
        assert!(eval(
            "tags contains 'lang:python/*'",
            json!({"tags": ["lang:python/3.11"]})
        ));
        assert!(!eval(
            "tags contains 'lang:python/3.11'",
            json!({"tags": ["lang:python"]})
        ));
    }

    #[test]
    fn test_truthiness_probe_present_field() {
        assert!(eval("archived", json!({"archived": true})));
        assert!(!eval("archived", json!({"archived": false})));
    }

    #[test]
    fn test_truthiness_probe_absent_field_degrades_to_search() {
        // No "webserver" field anywhere, but the description leaf is a
        // close fuzzy match for the probed name
        assert!(eval("webserver", json!({"description": "webserver"})));
        assert!(!eval("webserver", json!({"language": "Python"})));
    }

    #[test]
    fn test_simple_search_matches_keys_and_leaves() {
        let r = json!({"remote": {"host": "github.com"}});
        assert!(eval("'github.com'", r.clone()));
        assert!(eval("'host'", r));
    }

    #[test]
    fn test_simple_search_inside_lists() {
        assert!(eval("'asyncio'", json!({"topics": ["asyncio", "net"]})));
    }

    #[test]
    fn test_fuzzy_key_resolution_in_conditions() {
        // "languge" resolves to the "language" key through the fixed
        // key-matching threshold, independent of the caller threshold
        assert!(eval("languge == 'Python'", json!({"language": "Python"})));
    }

    #[test]
    fn test_threshold_is_tunable() {
        let node = QueryNode::parse("language ~= 'Pyt'").unwrap();
        let r = record(json!({"language": "Python"}));
        assert!(!QueryEvaluator::default().matches(&node, &r));
        assert!(QueryEvaluator::new(50).matches(&node, &r));
    }

    #[test]
    fn test_evaluate_free_function() {
        let node = QueryNode::parse("stars > 1").unwrap();
        assert!(evaluate(&node, &record(json!({"stars": 2})), 80));
    }

    #[test]
    fn test_ast_reusable_across_records() {
        let node = QueryNode::parse("language == 'Python'").unwrap();
        let evaluator = QueryEvaluator::default();
        assert!(evaluator.matches(&node, &record(json!({"language": "Python"}))));
        assert!(!evaluator.matches(&node, &record(json!({"language": "Rust"}))));
        assert!(evaluator.matches(&node, &record(json!({"language": "python"}))));
    }
}
