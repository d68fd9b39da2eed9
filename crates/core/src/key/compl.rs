//! Stores the members matching a completion term
use std::fmt;

use crate::cnf::{KEY_SEPARATOR, WORD_SEPARATOR};
use crate::key::Base;

/// The sorted set of members whose text matches `term`.
///
/// When built from several terms this is a compound key, holding the cached
/// intersection of the keys of each term.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compl<'a> {
	base: &'a Base,
	term: String,
}

impl<'a> Compl<'a> {
	pub fn new(base: &'a Base, term: &str) -> Self {
		Self {
			base,
			term: term.to_owned(),
		}
	}

	pub fn compound<S: AsRef<str>>(base: &'a Base, terms: &[S]) -> Self {
		let mut term = String::new();
		for (i, t) in terms.iter().enumerate() {
			if i > 0 {
				term.push(WORD_SEPARATOR);
			}
			term.push_str(t.as_ref());
		}
		Self {
			base,
			term,
		}
	}

	/// The prefix shared by every completion key of the namespace
	pub fn prefix(base: &Base) -> String {
		format!("{base}{KEY_SEPARATOR}compl{KEY_SEPARATOR}")
	}
}

impl fmt::Display for Compl<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{KEY_SEPARATOR}compl{KEY_SEPARATOR}{}", self.base, self.term)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let base = Base::new(None, "items");
		assert_eq!(Compl::new(&base, "gra").to_string(), "items:compl:gra");
		assert_eq!(Compl::compound(&base, &["grant", "tom"]).to_string(), "items:compl:grant|tom");
		assert!(Compl::new(&base, "gra").to_string().starts_with(&Compl::prefix(&base)));
		let base = Base::new(Some("app"), "pets");
		assert_eq!(Compl::new(&base, "do").to_string(), "app:pets:compl:do");
	}
}
