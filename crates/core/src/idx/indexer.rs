//! Adds, updates, removes and rebuilds the documents of a namespace.
use std::collections::BTreeSet;

use serde_json::Value;

use crate::doc::{DocId, Fields, Item, merge};
use crate::err::{Error, Result};
use crate::exe::join_all_first_error;
use crate::idx::Fieldset;
use crate::idx::analyzer::{normalize, words};
use crate::idx::compound::stale_compound_keys;
use crate::idx::docs::DocumentStore;
use crate::idx::entries::{entries, sort_key};
use crate::idx::member::Member;
use crate::idx::reverse::ReverseIndex;
use crate::idx::terms::TermIndex;
use crate::key::Base;
use crate::key::compl::Compl;
use crate::kvs::Datastore;

pub struct Indexer<'a> {
	ds: &'a Datastore,
	base: &'a Base,
	fields: &'a Fieldset,
}

impl<'a> Indexer<'a> {
	pub fn new(ds: &'a Datastore, base: &'a Base, fields: &'a Fieldset) -> Self {
		Self {
			ds,
			base,
			fields,
		}
	}

	fn docs(&self) -> DocumentStore<'a> {
		DocumentStore::new(self.ds, self.base)
	}

	fn terms(&self) -> TermIndex<'a> {
		TermIndex::new(self.ds)
	}

	fn reverse(&self) -> ReverseIndex<'a> {
		ReverseIndex::new(self.ds, self.base)
	}

	/// Store and index every item, returning their ids in input order
	pub async fn index(&self, items: Vec<Item>) -> Result<Vec<DocId>> {
		debug!("Indexing {} documents in namespace {}", items.len(), self.base);
		let mut ids = join_all_first_error(items.into_iter().enumerate().map(|(i, item)| async move {
			let id = self.add_document(item.into_fields(&self.fields.compl)).await?;
			Ok::<_, Error>((i, id))
		}))
		.await?;
		ids.sort_by_key(|(i, _)| *i);
		Ok(ids.into_iter().map(|(_, id)| id).collect())
	}

	/// Store a document and write its completion entries.
	///
	/// A document without an id is given a new one, stored back into its
	/// fields.
	pub async fn add_document(&self, mut fields: Fields) -> Result<DocId> {
		let id = match fields.get(&self.fields.id) {
			Some(v) => DocId::from_value(v)?,
			None => None,
		};
		let id = match id {
			Some(id) => id,
			None => {
				let id = DocId::generate();
				fields.insert(self.fields.id.clone(), Value::String(id.to_string()));
				id
			}
		};
		self.docs().put(&id, &fields).await?;
		self.write_entries(&id, &fields).await?;
		Ok(id)
	}

	async fn write_entries(&self, id: &DocId, fields: &Fields) -> Result<()> {
		let text = match fields.get(&self.fields.compl) {
			Some(Value::String(s)) => normalize(s.as_str()),
			Some(Value::Number(n)) => normalize(n.to_string().as_str()),
			_ => String::new(),
		};
		let words = words(&text);
		if words.is_empty() {
			trace!("Document {id} has no completion text, skipping its entries");
			return Ok(());
		}
		let member = Member::new(sort_key(fields, &self.fields.sort, &words), id.clone()).to_string();
		let entries = entries(&words);
		let terms = self.terms();
		let reverse = self.reverse();
		// Cached intersections this document belongs to are now incomplete
		let registered = reverse.all_keys().await?;
		let matched: BTreeSet<&str> = entries.iter().map(|e| e.term.as_str()).collect();
		let stale = stale_compound_keys(self.base, &matched, &registered);
		if !stale.is_empty() {
			trace!("Discarding {} cached intersections for document {id}", stale.len());
			terms.delete_keys(&stale.into_iter().cloned().collect::<Vec<_>>()).await?;
		}
		trace!("Writing {} completion entries for document {id}", entries.len());
		join_all_first_error(entries.iter().map(|e| {
			let key = Compl::new(self.base, &e.term).to_string();
			let (terms, reverse, member) = (&terms, &reverse, &member);
			async move {
				terms.add_member(&key, e.score, member).await?;
				reverse.register_key(id, &key, member).await
			}
		}))
		.await?;
		Ok(())
	}

	/// Merge every item into its stored document.
	///
	/// Items without a stored document are added. A document is only
	/// reindexed when its completion text changes.
	pub async fn update(&self, items: Vec<Item>) -> Result<()> {
		debug!("Updating {} documents in namespace {}", items.len(), self.base);
		join_all_first_error(
			items.into_iter().map(|item| self.update_document(item.into_fields(&self.fields.compl))),
		)
		.await?;
		Ok(())
	}

	async fn update_document(&self, fields: Fields) -> Result<DocId> {
		let id = match fields.get(&self.fields.id) {
			Some(v) => DocId::from_value(v)?,
			None => None,
		};
		let Some(id) = id else {
			return self.add_document(fields).await;
		};
		let Some(old) = self.docs().get(&id).await? else {
			return self.add_document(fields).await;
		};
		let before = old.get(&self.fields.compl).cloned();
		let merged = merge(old, fields);
		if merged.get(&self.fields.compl) != before.as_ref() {
			trace!("Completion text of document {id} changed, reindexing");
			self.remove_document(&id).await?;
			self.add_document(merged).await
		} else {
			self.docs().put(&id, &merged).await?;
			Ok(id)
		}
	}

	pub async fn remove(&self, ids: Vec<DocId>) -> Result<()> {
		debug!("Removing {} documents from namespace {}", ids.len(), self.base);
		join_all_first_error(ids.iter().map(|id| self.remove_document(id))).await?;
		Ok(())
	}

	/// Remove a document and every completion entry written for it
	pub async fn remove_document(&self, id: &DocId) -> Result<()> {
		self.docs().delete(id).await?;
		let reverse = self.reverse();
		let entries = reverse.entries(id).await?;
		trace!("Removing {} completion entries of document {id}", entries.len());
		let terms = self.terms();
		join_all_first_error(entries.iter().map(|e| terms.remove_member(&e.key, &e.member))).await?;
		reverse.purge(id).await
	}

	/// Discard the namespace, then index the items into it
	pub async fn reset(&self, items: Vec<Item>) -> Result<Vec<DocId>> {
		debug!("Resetting namespace {}", self.base);
		let docs = self.docs();
		let ids = docs.ids().await?;
		self.remove(ids).await?;
		docs.delete_all().await?;
		let reverse = self.reverse();
		let keys = reverse.all_keys().await?;
		self.terms().delete_keys(&keys).await?;
		reverse.clear_registry().await?;
		self.index(items).await
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use test_log::test;

	use super::*;

	fn item(v: Value) -> Item {
		serde_json::from_value(v).unwrap()
	}

	#[test(tokio::test)]
	async fn generated_ids_are_stored_back() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "test");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		let ids = ix.index(vec![item(json!({"name": "bob"})), item(json!("carl"))]).await.unwrap();
		assert_eq!(ids.len(), 2);
		let doc = DocumentStore::new(&ds, &base).get(&ids[1]).await.unwrap().unwrap();
		assert_eq!(doc["id"], json!(ids[1].as_str()));
		assert_eq!(doc["name"], json!("carl"));
	}

	#[test(tokio::test)]
	async fn documents_without_text_are_stored_but_not_indexed() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		ix.index(vec![item(json!({"id": 1, "name": ""})), item(json!({"id": 2, "title": "x"}))]).await.unwrap();
		assert_eq!(ds.keys("").await.unwrap(), vec!["items:docs"]);
	}

	#[test(tokio::test)]
	async fn entries_are_mirrored_in_the_reverse_index() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		ix.index(vec![item(json!({"id": 2, "name": "Grant Tom"}))]).await.unwrap();
		let reverse = ReverseIndex::new(&ds, &base).entries(&DocId::from(2u64)).await.unwrap();
		let compl = ds.keys("items:compl:").await.unwrap();
		assert_eq!(reverse.len(), compl.len());
		for entry in reverse {
			assert_eq!(entry.member, "grant|tom:2");
			assert!(ds.zscore(&entry.key, &entry.member).await.unwrap().is_some());
		}
		assert_eq!(ds.zscore("items:compl:to", "grant|tom:2").await.unwrap(), Some(2.0));
		assert_eq!(ds.zscore("items:compl:ant", "grant|tom:2").await.unwrap(), Some(3.0));
	}

	#[test(tokio::test)]
	async fn removal_replays_the_reverse_index() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		ix.index(vec![item(json!({"id": 1, "name": "Peter Allen"})), item(json!({"id": 2, "name": "Grant Tom"}))])
			.await
			.unwrap();
		ix.remove(vec![DocId::from(2u64)]).await.unwrap();
		for key in ds.keys("items:compl:").await.unwrap() {
			let members = ds.zrangebyscore(&key, 0.0, f64::INFINITY, None).await.unwrap();
			assert!(members.iter().all(|m| !m.ends_with(":2")), "{key}");
		}
		assert!(ds.smembers("items:2").await.unwrap().is_empty());
		assert!(DocumentStore::new(&ds, &base).get(&DocId::from(2u64)).await.unwrap().is_none());
	}

	#[test(tokio::test)]
	async fn unchanged_text_only_rewrites_the_document() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		ix.index(vec![item(json!({"id": 1, "name": "Bob Hope", "foo": "bar"}))]).await.unwrap();
		let before = ds.keys("").await.unwrap();
		ix.update(vec![item(json!({"id": 1, "baz": "blah"}))]).await.unwrap();
		assert_eq!(ds.keys("").await.unwrap(), before);
		let doc = DocumentStore::new(&ds, &base).get(&DocId::from(1u64)).await.unwrap().unwrap();
		assert_eq!(json!(doc), json!({"id": 1, "name": "Bob Hope", "foo": "bar", "baz": "blah"}));
	}

	#[test(tokio::test)]
	async fn reset_discards_the_namespace() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let other = Base::new(None, "other");
		let fields = Fieldset::default();
		Indexer::new(&ds, &other, &fields).index(vec![item(json!("kept"))]).await.unwrap();
		let ix = Indexer::new(&ds, &base, &fields);
		ix.index(vec![item(json!({"id": 1, "name": "Peter Allen"}))]).await.unwrap();
		ix.reset(Vec::new()).await.unwrap();
		assert!(ds.keys("items:").await.unwrap().is_empty());
		assert!(!ds.keys("other:").await.unwrap().is_empty());
	}

	#[test(tokio::test)]
	async fn invalid_ids_are_rejected() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let fields = Fieldset::default();
		let ix = Indexer::new(&ds, &base, &fields);
		let err = ix.index(vec![item(json!({"id": {"a": 1}, "name": "x"}))]).await.unwrap_err();
		assert!(err.is_validation());
	}
}
