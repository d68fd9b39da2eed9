//! Records every completion key a document was written into.
//!
//! Removing a document replays its reverse entries instead of deriving its
//! keys from its current fields, so entries written under an older title or
//! into a cached intersection are removed as well.
use serde::{Deserialize, Serialize};

use crate::doc::DocId;
use crate::err::Result;
use crate::key::Base;
use crate::key::registry::Registry;
use crate::key::reverse::Reverse;
use crate::kvs::Datastore;

/// A member written into a completion key
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReverseEntry {
	pub key: String,
	pub member: String,
}

pub struct ReverseIndex<'a> {
	ds: &'a Datastore,
	base: &'a Base,
}

impl<'a> ReverseIndex<'a> {
	pub fn new(ds: &'a Datastore, base: &'a Base) -> Self {
		Self {
			ds,
			base,
		}
	}

	/// Add a key to the registry, without recording it for any document
	pub async fn register(&self, key: &str) -> Result<()> {
		self.ds.sadd(&Registry::new(self.base).to_string(), key).await
	}

	/// Record that `member` was written into `key` for the document
	pub async fn register_key(&self, id: &DocId, key: &str, member: &str) -> Result<()> {
		self.register(key).await?;
		let entry = serde_json::to_string(&ReverseEntry {
			key: key.to_owned(),
			member: member.to_owned(),
		})?;
		self.ds.sadd(&Reverse::new(self.base, id).to_string(), &entry).await
	}

	pub async fn entries(&self, id: &DocId) -> Result<Vec<ReverseEntry>> {
		let mut entries = self
			.ds
			.smembers(&Reverse::new(self.base, id).to_string())
			.await?
			.iter()
			.map(|v| serde_json::from_str(v))
			.collect::<Result<Vec<ReverseEntry>, _>>()?;
		entries.sort();
		Ok(entries)
	}

	/// Delete the reverse entries of the document
	pub async fn purge(&self, id: &DocId) -> Result<()> {
		self.ds.del(&[Reverse::new(self.base, id).to_string()]).await
	}

	/// List every key registered in the namespace
	pub async fn all_keys(&self) -> Result<Vec<String>> {
		let mut keys = self.ds.smembers(&Registry::new(self.base).to_string()).await?;
		keys.sort();
		Ok(keys)
	}

	pub async fn clear_registry(&self) -> Result<()> {
		self.ds.del(&[Registry::new(self.base).to_string()]).await
	}
}

#[cfg(test)]
mod tests {
	use test_log::test;

	use super::*;

	#[test(tokio::test)]
	async fn entries_are_stored_as_compact_json() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let rev = ReverseIndex::new(&ds, &base);
		let id = DocId::from(2u64);
		rev.register_key(&id, "items:compl:gr", "grant|tom:2").await.unwrap();
		rev.register_key(&id, "items:compl:gr", "grant|tom:2").await.unwrap();
		rev.register_key(&id, "items:compl:g", "grant|tom:2").await.unwrap();
		assert_eq!(
			ds.smembers("items:2").await.unwrap().iter().filter(|v| v.contains("compl:gr\"")).count(),
			1
		);
		assert!(
			ds.smembers("items:2")
				.await
				.unwrap()
				.contains(&r#"{"key":"items:compl:g","member":"grant|tom:2"}"#.to_owned())
		);
		let entries = rev.entries(&id).await.unwrap();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].key, "items:compl:g");
		assert_eq!(rev.all_keys().await.unwrap(), vec!["items:compl:g", "items:compl:gr"]);
		rev.purge(&id).await.unwrap();
		assert!(rev.entries(&id).await.unwrap().is_empty());
		rev.clear_registry().await.unwrap();
		assert!(rev.all_keys().await.unwrap().is_empty());
	}
}
