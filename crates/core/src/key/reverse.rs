//! Stores what was written into the completion keys for a document
use std::fmt;

use crate::cnf::KEY_SEPARATOR;
use crate::doc::DocId;
use crate::key::Base;

/// The set of `{key, member}` entries written for one document
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reverse<'a> {
	base: &'a Base,
	id: &'a DocId,
}

impl<'a> Reverse<'a> {
	pub fn new(base: &'a Base, id: &'a DocId) -> Self {
		Self {
			base,
			id,
		}
	}
}

impl fmt::Display for Reverse<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{KEY_SEPARATOR}{}", self.base, self.id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let base = Base::new(None, "items");
		let id = DocId::from(42u64);
		assert_eq!(Reverse::new(&base, &id).to_string(), "items:42");
	}
}
