use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::{Item, OneOrMany};
use crate::idx::Fieldset;

/// Options for [`index`](crate::dbs::Completer::index),
/// [`add`](crate::dbs::Completer::add) and
/// [`update`](crate::dbs::Completer::update).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexOptions {
	/// The items to index
	pub data: Option<OneOrMany<Item>>,
	/// The namespace of the documents
	pub ns: Option<String>,
	/// The field holding the document id
	pub id_field: Option<String>,
	/// The field holding the text to complete against
	#[serde(alias = "complKey")]
	pub compl_field: Option<String>,
	/// The field ordering documents which match with the same score
	#[serde(alias = "sortKey")]
	pub sort_field: Option<String>,
	/// Discard the namespace before indexing
	pub reset: bool,
}

impl IndexOptions {
	pub fn new(data: impl Into<OneOrMany<Item>>) -> Self {
		Self {
			data: Some(data.into()),
			..Default::default()
		}
	}

	pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
		self.ns = Some(ns.into());
		self
	}

	pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
		self.sort_field = Some(field.into());
		self
	}

	pub fn with_reset(mut self, reset: bool) -> Self {
		self.reset = reset;
		self
	}

	pub(crate) fn fieldset(&self) -> Fieldset {
		Fieldset::new(self.id_field.as_deref(), self.compl_field.as_deref(), self.sort_field.as_deref())
	}
}

/// Options for [`remove`](crate::dbs::Completer::remove)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveOptions {
	/// The ids of the documents to remove
	#[serde(alias = "ids")]
	pub id: Option<OneOrMany<Value>>,
	/// The namespace of the documents
	pub ns: Option<String>,
}

impl RemoveOptions {
	pub fn new(id: impl Into<OneOrMany<Value>>) -> Self {
		Self {
			id: Some(id.into()),
			..Default::default()
		}
	}

	pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
		self.ns = Some(ns.into());
		self
	}
}

/// Options for [`search`](crate::dbs::Completer::search)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
	/// The text to complete
	pub search: String,
	/// The number of documents to return, defaulting to [`SEARCH_LIMIT`](crate::cnf::SEARCH_LIMIT)
	pub limit: Option<usize>,
	/// The page of results to return, counted in multiples of the limit
	pub offset: Option<usize>,
	/// The namespace of the documents
	pub ns: Option<String>,
}

impl SearchOptions {
	pub fn new(search: impl Into<String>) -> Self {
		Self {
			search: search.into(),
			..Default::default()
		}
	}

	pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
		self.ns = Some(ns.into());
		self
	}

	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn with_offset(mut self, offset: usize) -> Self {
		self.offset = Some(offset);
		self
	}
}
