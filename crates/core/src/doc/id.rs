use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::err::{Error, Result};

/// The identifier of a document within a namespace.
///
/// Identifiers are supplied as JSON strings or numbers and are addressed by
/// their string form, so `2` and `"2"` refer to the same document.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DocId(String);

impl DocId {
	/// Generate a new random identifier
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	/// Read an identifier out of a JSON value.
	///
	/// A JSON `null` yields `None`. Any value other than a string or a number
	/// is rejected.
	pub fn from_value(value: &Value) -> Result<Option<Self>> {
		match value {
			Value::Null => Ok(None),
			Value::String(s) => Ok(Some(Self(s.clone()))),
			Value::Number(n) => Ok(Some(Self(n.to_string()))),
			v => Err(Error::InvalidId {
				value: v.to_string(),
			}),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocId {
	fn from(v: &str) -> Self {
		Self(v.to_owned())
	}
}

impl From<String> for DocId {
	fn from(v: String) -> Self {
		Self(v)
	}
}

impl From<i64> for DocId {
	fn from(v: i64) -> Self {
		Self(v.to_string())
	}
}

impl From<u64> for DocId {
	fn from(v: u64) -> Self {
		Self(v.to_string())
	}
}

impl Serialize for DocId {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for DocId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct IdVisitor;

		impl Visitor<'_> for IdVisitor {
			type Value = DocId;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a string or a number")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<DocId, E> {
				Ok(DocId::from(v))
			}

			fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<DocId, E> {
				Ok(DocId::from(v))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<DocId, E> {
				Ok(DocId::from(v))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<DocId, E> {
				Ok(DocId::from(v))
			}

			fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<DocId, E> {
				match serde_json::Number::from_f64(v) {
					Some(n) => Ok(DocId(n.to_string())),
					None => Err(E::invalid_value(de::Unexpected::Float(v), &self)),
				}
			}
		}

		deserializer.deserialize_any(IdVisitor)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn numbers_and_strings_address_the_same_document() {
		let a = DocId::from_value(&json!(2)).unwrap().unwrap();
		let b = DocId::from_value(&json!("2")).unwrap().unwrap();
		assert_eq!(a, b);
		assert_eq!(a.as_str(), "2");
	}

	#[test]
	fn null_ids_are_absent() {
		assert_eq!(DocId::from_value(&Value::Null).unwrap(), None);
	}

	#[test]
	fn structured_ids_are_rejected() {
		let err = DocId::from_value(&json!({"a": 1})).unwrap_err();
		assert!(err.is_validation());
		let err = DocId::from_value(&json!([1])).unwrap_err();
		assert!(matches!(err, Error::InvalidId { value } if value == "[1]"));
	}

	#[test]
	fn generated_ids_are_unique_uuids() {
		let a = DocId::generate();
		let b = DocId::generate();
		assert_ne!(a, b);
		assert!(Uuid::parse_str(a.as_str()).is_ok());
	}

	#[test]
	fn deserializes_from_strings_and_numbers() {
		let ids: Vec<DocId> = serde_json::from_value(json!(["a", 7, -3])).unwrap();
		assert_eq!(ids, vec![DocId::from("a"), DocId::from(7u64), DocId::from(-3i64)]);
		assert_eq!(serde_json::to_value(&ids[1]).unwrap(), json!("7"));
		assert!(serde_json::from_value::<DocId>(json!(true)).is_err());
	}
}
