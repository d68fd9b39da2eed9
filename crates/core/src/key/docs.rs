//! Stores the documents of a namespace
use std::fmt;

use crate::cnf::KEY_SEPARATOR;
use crate::key::Base;

/// The hash mapping document ids to their JSON-encoded fields
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Docs<'a> {
	base: &'a Base,
}

impl<'a> Docs<'a> {
	pub fn new(base: &'a Base) -> Self {
		Self {
			base,
		}
	}
}

impl fmt::Display for Docs<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{KEY_SEPARATOR}docs", self.base)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let base = Base::new(None, "items");
		assert_eq!(Docs::new(&base).to_string(), "items:docs");
	}
}
