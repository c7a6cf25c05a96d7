//! Collection filtering with a parsed query
//!
//! One query tree, many records: the caller parses once, then this
//! module applies the evaluator across a repository snapshot in
//! parallel. Each item is independent, so rayon splits the slice with no
//! shared state.

use rayon::prelude::*;

use crate::Repo;
use crate::metadata::MetadataRecord;
use crate::query::{QueryEvaluator, QueryNode};

/// Filter a repository snapshot down to the entries matching `query`
///
/// Returns references into `items` in their original order.
///
/// # Examples
/// ```
/// use reposcope::{Repo, metadata::MetadataRecord, query::QueryNode};
/// use reposcope::search::filter::filter_repos;
/// use serde_json::json;
///
/// let items = vec![(
///     Repo::new("proj".into(), "/src/proj".into()),
///     MetadataRecord::from(json!({"language": "Python"})),
/// )];
/// let query = QueryNode::parse("language == 'Python'").unwrap();
/// let hits = filter_repos(&query, &items, 80);
/// assert_eq!(hits.len(), 1);
/// ```
#[must_use]
pub fn filter_repos<'a>(
    query: &QueryNode,
    items: &'a [(Repo, MetadataRecord)],
    threshold: u32,
) -> Vec<&'a Repo> {
    let evaluator = QueryEvaluator::new(threshold);

    items
        .par_iter()
        .filter(|(_, record)| evaluator.matches(query, record))
        .map(|(repo, _)| repo)
        .collect()
}
