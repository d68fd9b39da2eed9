//! Stores the documents of a namespace, one hash field per document.
use crate::doc::{DocId, Fields};
use crate::err::Result;
use crate::key::Base;
use crate::key::docs::Docs;
use crate::kvs::Datastore;

pub struct DocumentStore<'a> {
	ds: &'a Datastore,
	key: String,
}

impl<'a> DocumentStore<'a> {
	pub fn new(ds: &'a Datastore, base: &Base) -> Self {
		Self {
			ds,
			key: Docs::new(base).to_string(),
		}
	}

	pub async fn put(&self, id: &DocId, fields: &Fields) -> Result<()> {
		let val = serde_json::to_string(fields)?;
		self.ds.hset(&self.key, id.as_str(), &val).await
	}

	pub async fn get(&self, id: &DocId) -> Result<Option<Fields>> {
		match self.ds.hget(&self.key, id.as_str()).await? {
			Some(v) => Ok(Some(serde_json::from_str(&v)?)),
			None => Ok(None),
		}
	}

	/// Fetch many documents, in the order of the requested ids.
	///
	/// Missing documents yield `None` in their place.
	pub async fn get_many(&self, ids: &[DocId]) -> Result<Vec<Option<Fields>>> {
		let fields: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
		self.ds
			.hmget(&self.key, &fields)
			.await?
			.into_iter()
			.map(|v| -> Result<Option<Fields>> {
				match v {
					Some(v) => Ok(Some(serde_json::from_str(&v)?)),
					None => Ok(None),
				}
			})
			.collect()
	}

	pub async fn delete(&self, id: &DocId) -> Result<()> {
		self.ds.hdel(&self.key, id.as_str()).await
	}

	/// Delete every document of the namespace
	pub async fn delete_all(&self) -> Result<()> {
		self.ds.del(std::slice::from_ref(&self.key)).await
	}

	/// List the ids of every document of the namespace
	pub async fn ids(&self) -> Result<Vec<DocId>> {
		let mut ids: Vec<DocId> = self.ds.hgetall(&self.key).await?.into_keys().map(DocId::from).collect();
		ids.sort();
		Ok(ids)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};
	use test_log::test;

	use super::*;

	fn fields(v: Value) -> Fields {
		match v {
			Value::Object(v) => v,
			_ => unreachable!(),
		}
	}

	#[test(tokio::test)]
	async fn documents_round_trip_through_the_hash() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		let docs = DocumentStore::new(&ds, &base);
		let one = fields(json!({"id": 1, "name": "Peter Allen"}));
		let two = fields(json!({"id": "b", "name": "Grant Tom", "tags": ["x"]}));
		docs.put(&DocId::from(1u64), &one).await.unwrap();
		docs.put(&DocId::from("b"), &two).await.unwrap();
		assert_eq!(docs.get(&DocId::from("1")).await.unwrap(), Some(one.clone()));
		let many = docs.get_many(&[DocId::from("b"), DocId::from("zzz"), DocId::from(1u64)]).await.unwrap();
		assert_eq!(many, vec![Some(two), None, Some(one)]);
		assert_eq!(docs.ids().await.unwrap(), vec![DocId::from("1"), DocId::from("b")]);
		assert_eq!(ds.hget("items:docs", "1").await.unwrap().as_deref(), Some(r#"{"id":1,"name":"Peter Allen"}"#));
		docs.delete(&DocId::from(1u64)).await.unwrap();
		assert_eq!(docs.get(&DocId::from(1u64)).await.unwrap(), None);
		docs.delete_all().await.unwrap();
		assert!(docs.ids().await.unwrap().is_empty());
	}

	#[test(tokio::test)]
	async fn corrupt_documents_fail_to_decode() {
		let ds = Datastore::new("memory").await.unwrap();
		let base = Base::new(None, "items");
		ds.hset("items:docs", "1", "not json").await.unwrap();
		let err = DocumentStore::new(&ds, &base).get(&DocId::from("1")).await.unwrap_err();
		assert!(matches!(err, crate::err::Error::Serialization(_)));
	}
}
