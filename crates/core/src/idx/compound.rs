//! Finds the cached intersections made stale by indexing a document.
use std::collections::BTreeSet;

use crate::cnf::WORD_SEPARATOR;
use crate::key::Base;
use crate::key::compl::Compl;

/// Select the registered compound keys which a document with these
/// completion terms belongs to.
///
/// A compound key caches the intersection for a multi-term query, and is only
/// recomputed when it is missing. A fresh intersection would hold the
/// document when every term of the query is one of its terms, whatever the
/// order of the query words or which of them are prefixes, so each such
/// cached key is stale once the document is written.
pub fn stale_compound_keys<'k>(
	base: &Base,
	terms: &BTreeSet<&str>,
	registered: &'k [String],
) -> Vec<&'k String> {
	let prefix = Compl::prefix(base);
	registered
		.iter()
		.filter(|key| {
			let Some(query) = key.strip_prefix(&prefix) else {
				return false;
			};
			query.contains(WORD_SEPARATOR)
				&& query.split(WORD_SEPARATOR).all(|t| terms.contains(t))
		})
		.collect()
}
