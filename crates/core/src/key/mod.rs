//! How the keys are structured in the key value store
//!
//! Every key of a namespace starts with the namespace name, itself prefixed
//! with the application name when the engine is configured with one.
//!
//! crate::key::compl                {app}:{ns}:compl:{term}
//! crate::key::compl (compound)     {app}:{ns}:compl:{term}|{term}|...
//! crate::key::docs                 {app}:{ns}:docs
//! crate::key::registry             {app}:{ns}:keys
//! crate::key::reverse              {app}:{ns}:{id}
//!
//! Completion keys are sorted sets, the document key is a hash, and the
//! registry and reverse keys are sets.
//!
//! A reverse key shares the keyspace of the fixed keys above, so a document
//! with the id `docs` or `keys` would clobber them.
use std::fmt;

use crate::cnf::KEY_SEPARATOR;

pub mod compl;
pub mod docs;
pub mod registry;
pub mod reverse;

/// The leading segments shared by every key of a namespace
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Base {
	app: Option<String>,
	ns: String,
}

impl Base {
	pub fn new(app: Option<&str>, ns: &str) -> Self {
		Self {
			app: app.filter(|a| !a.is_empty()).map(ToOwned::to_owned),
			ns: ns.to_owned(),
		}
	}
}

impl fmt::Display for Base {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.app {
			Some(app) => write!(f, "{app}{KEY_SEPARATOR}{}", self.ns),
			None => f.write_str(&self.ns),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		assert_eq!(Base::new(None, "items").to_string(), "items");
		assert_eq!(Base::new(Some("autocomplete"), "items").to_string(), "autocomplete:items");
		assert_eq!(Base::new(Some(""), "items").to_string(), "items");
	}
}
