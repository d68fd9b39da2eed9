//! Documents as they are supplied by callers and stored in a namespace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod id;

pub use self::id::DocId;

/// The fields of a stored document
pub type Fields = serde_json::Map<String, Value>;

/// An item supplied for indexing.
///
/// Plain strings are display names, and become documents holding that
/// string in their completion field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
	Text(String),
	Fields(Fields),
}

impl Item {
	/// Convert this item into the fields of a document
	pub fn into_fields(self, compl_field: &str) -> Fields {
		match self {
			Item::Fields(v) => v,
			Item::Text(v) => {
				let mut fields = Fields::new();
				fields.insert(compl_field.to_owned(), Value::String(v));
				fields
			}
		}
	}
}

impl From<&str> for Item {
	fn from(v: &str) -> Self {
		Item::Text(v.to_owned())
	}
}

impl From<Fields> for Item {
	fn from(v: Fields) -> Self {
		Item::Fields(v)
	}
}

/// A value which callers may supply either alone or as a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
	Many(Vec<T>),
	One(T),
}

impl<T> OneOrMany<T> {
	pub fn into_vec(self) -> Vec<T> {
		match self {
			OneOrMany::Many(v) => v,
			OneOrMany::One(v) => vec![v],
		}
	}
}

impl<T> From<Vec<T>> for OneOrMany<T> {
	fn from(v: Vec<T>) -> Self {
		OneOrMany::Many(v)
	}
}

/// Merge two documents, with the fields of `new` taking precedence.
///
/// The merge is shallow: nested objects are replaced rather than merged.
pub fn merge(mut old: Fields, new: Fields) -> Fields {
	old.extend(new);
	old
}
