use core::fmt;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// The result type returned by every engine and store operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error originating from the completion engine or its backing store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The engine encountered unreachable logic
	#[error("The engine encountered unreachable logic: {0}")]
	Unreachable(String),

	/// The data supplied to an indexing operation was missing or malformed.
	///
	/// These errors are raised before any request reaches the store.
	#[error("Invalid data supplied for indexing: {0}")]
	Validation(String),

	/// A document identifier could not be used as a key
	#[error("Unable to use '{value}' as a document id, expected a string or a number")]
	InvalidId {
		value: String,
	},

	/// There was a problem with the underlying datastore
	#[error("There was a problem with the underlying datastore: {0}")]
	Ds(String),

	/// A key held a value of a different type than the operation expected
	#[error("WRONGTYPE Operation against key '{0}' holding the wrong kind of value")]
	WrongType(String),

	/// A document or reverse index entry could not be encoded or decoded
	#[error("Unable to serialize or deserialize a stored value: {0}")]
	Serialization(#[from] SerdeJsonError),
}

impl Error {
	#[track_caller]
	pub fn unreachable<T: fmt::Display>(message: T) -> Error {
		let location = std::panic::Location::caller();
		let message = format!("{}:{}: {}", location.file(), location.line(), message);
		Error::Unreachable(message)
	}

	/// Check if this error was raised while validating input
	pub fn is_validation(&self) -> bool {
		matches!(self, Error::Validation(_) | Error::InvalidId { .. })
	}

	/// Check if this error was raised by the backing store
	pub fn is_store(&self) -> bool {
		matches!(self, Error::Ds(_) | Error::WrongType(_))
	}
}

#[cfg(feature = "kv-redis")]
impl From<fred::error::RedisError> for Error {
	fn from(e: fred::error::RedisError) -> Error {
		Error::Ds(e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unreachable_records_location() {
		let Error::Unreachable(msg) = Error::unreachable("Reached unreachable code") else {
			panic!()
		};
		assert!(msg.starts_with("crates/core/src/err/mod.rs:"), "{msg}");
		assert!(msg.ends_with("Reached unreachable code"));
	}

	#[test]
	fn error_classification() {
		assert!(Error::Validation("no data".into()).is_validation());
		assert!(Error::InvalidId { value: "true".into() }.is_validation());
		assert!(Error::Ds("connection reset".into()).is_store());
		assert!(Error::WrongType("items:keys".into()).is_store());
		assert!(!Error::Ds("connection reset".into()).is_validation());
	}
}
