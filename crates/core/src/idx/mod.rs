//! The completion index, built entirely out of primitive store operations.
//!
//! Documents live in the [`docs`] hash of their namespace. Each document is
//! written into the sorted sets of [`terms`] under every prefix and inner
//! substring of its completion text, and every write is recorded in the
//! [`reverse`] index so the document can later be removed exactly.

pub mod analyzer;
pub mod compound;
pub mod docs;
pub mod entries;
pub mod indexer;
pub mod member;
pub mod reverse;
pub mod search;
pub mod terms;

use crate::cnf::{DEFAULT_COMPLETION_FIELD, DEFAULT_ID_FIELD};

/// The document fields an index operation reads
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fieldset {
	/// The field holding the document id
	pub id: String,
	/// The field holding the text to complete against
	pub compl: String,
	/// The field ordering documents which match with the same score
	pub sort: String,
}

impl Fieldset {
	pub fn new(id: Option<&str>, compl: Option<&str>, sort: Option<&str>) -> Self {
		let compl = compl.unwrap_or(DEFAULT_COMPLETION_FIELD).to_owned();
		Self {
			id: id.unwrap_or(DEFAULT_ID_FIELD).to_owned(),
			sort: sort.map(ToOwned::to_owned).unwrap_or_else(|| compl.clone()),
			compl,
		}
	}
}

impl Default for Fieldset {
	fn default() -> Self {
		Self::new(None, None, None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sort_field_defaults_to_completion_field() {
		let f = Fieldset::new(None, Some("title"), None);
		assert_eq!(f.id, "id");
		assert_eq!(f.sort, "title");
		let f = Fieldset::new(Some("_key"), None, Some("priority"));
		assert_eq!(f, Fieldset {
			id: "_key".into(),
			compl: "name".into(),
			sort: "priority".into(),
		});
	}
}
