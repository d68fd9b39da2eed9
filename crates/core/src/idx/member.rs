//! The members stored in the completion keys.
use std::fmt;

use crate::cnf::KEY_SEPARATOR;
use crate::doc::DocId;
use crate::err::{Error, Result};

/// A sorted set member, pairing the sort key of a document with its id.
///
/// Members are encoded as `{sort}:{id}`. Sort keys never contain the
/// separator, so the member is split at the first separator and the id may
/// contain any character.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Member {
	pub sort: String,
	pub id: DocId,
}

impl Member {
	pub fn new(sort: String, id: DocId) -> Self {
		Self {
			sort,
			id,
		}
	}

	pub fn parse(member: &str) -> Result<Self> {
		match member.split_once(KEY_SEPARATOR) {
			Some((sort, id)) => Ok(Self::new(sort.to_owned(), DocId::from(id))),
			None => Err(Error::unreachable(format!("The completion member '{member}' has no id"))),
		}
	}
}

impl fmt::Display for Member {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{KEY_SEPARATOR}{}", self.sort, self.id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_at_the_first_separator() {
		let m = Member::parse("grant|tom:urn:2").unwrap();
		assert_eq!(m.sort, "grant|tom");
		assert_eq!(m.id.as_str(), "urn:2");
		assert_eq!(m.to_string(), "grant|tom:urn:2");
	}

	#[test]
	fn negative_sort_keys() {
		let m = Member::parse("-1:4").unwrap();
		assert_eq!(m.sort, "-1");
		assert_eq!(m.id, DocId::from(4u64));
	}

	#[test]
	fn members_without_ids_are_rejected() {
		assert!(matches!(Member::parse("orphan"), Err(Error::Unreachable(_))));
	}
}
