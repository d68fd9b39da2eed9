//! Stores every completion key created in a namespace
use std::fmt;

use crate::cnf::KEY_SEPARATOR;
use crate::key::Base;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registry<'a> {
	base: &'a Base,
}

impl<'a> Registry<'a> {
	pub fn new(base: &'a Base) -> Self {
		Self {
			base,
		}
	}
}

impl fmt::Display for Registry<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{KEY_SEPARATOR}keys", self.base)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let base = Base::new(Some("autocomplete"), "items");
		assert_eq!(Registry::new(&base).to_string(), "autocomplete:items:keys");
	}
}
