use std::sync::Arc;

use crate::cnf::{DEFAULT_NAMESPACE, SEARCH_LIMIT};
use crate::dbs::{IndexOptions, RemoveOptions, SearchOptions};
use crate::doc::{DocId, Fields, Item, OneOrMany};
use crate::err::{Error, Result};
use crate::idx::indexer::Indexer;
use crate::idx::search::Searcher;
use crate::key::Base;
use crate::kvs::Datastore;

/// The completion engine.
///
/// Every operation addresses one namespace, taken from its options and
/// defaulting to `items`. The engine holds no state of its own besides the
/// datastore, so it can be cloned and shared freely.
#[derive(Clone, Debug)]
pub struct Completer {
	ds: Arc<Datastore>,
	app: Option<String>,
}

impl Completer {
	pub fn new(ds: Arc<Datastore>) -> Self {
		Self {
			ds,
			app: None,
		}
	}

	/// Prefix every key written by this engine with an application name
	pub fn with_app(mut self, app: impl Into<String>) -> Self {
		self.app = Some(app.into());
		self
	}

	pub fn datastore(&self) -> &Arc<Datastore> {
		&self.ds
	}

	fn base(&self, ns: Option<&str>) -> Base {
		Base::new(self.app.as_deref(), ns.unwrap_or(DEFAULT_NAMESPACE))
	}

	/// Index a list of items, returning the ids of the stored documents.
	///
	/// The `data` must be supplied as a list. When `reset` is set, the
	/// namespace is discarded first.
	pub async fn index(&self, mut opts: IndexOptions) -> Result<Vec<DocId>> {
		let items = match opts.data.take() {
			Some(OneOrMany::Many(items)) => items,
			Some(OneOrMany::One(_)) => {
				return Err(Error::Validation("Data element must be a list of items".into()));
			}
			None => return Err(Error::Validation("Data element required for indexing".into())),
		};
		let base = self.base(opts.ns.as_deref());
		let fields = opts.fieldset();
		let ix = Indexer::new(&self.ds, &base, &fields);
		if opts.reset {
			ix.reset(items).await
		} else {
			ix.index(items).await
		}
	}

	/// Index a single item or a list of items
	pub async fn add(&self, mut opts: IndexOptions) -> Result<Vec<DocId>> {
		let items = Self::items(opts.data.take())?;
		opts.data = Some(OneOrMany::Many(items));
		self.index(opts).await
	}

	/// Merge a single item or a list of items into their stored documents
	pub async fn update(&self, mut opts: IndexOptions) -> Result<()> {
		let items = Self::items(opts.data.take())?;
		let base = self.base(opts.ns.as_deref());
		let fields = opts.fieldset();
		Indexer::new(&self.ds, &base, &fields).update(items).await
	}

	/// Remove a single document or a list of documents.
	///
	/// Null ids are ignored.
	pub async fn remove(&self, opts: RemoveOptions) -> Result<()> {
		let ids = opts
			.id
			.map(OneOrMany::into_vec)
			.unwrap_or_default()
			.iter()
			.filter_map(|v| DocId::from_value(v).transpose())
			.collect::<Result<Vec<_>>>()?;
		if ids.is_empty() {
			return Ok(());
		}
		let base = self.base(opts.ns.as_deref());
		let fields = Default::default();
		Indexer::new(&self.ds, &base, &fields).remove(ids).await
	}

	/// Find the documents matching a query
	pub async fn search(&self, opts: SearchOptions) -> Result<Vec<Fields>> {
		let base = self.base(opts.ns.as_deref());
		let limit = opts.limit.unwrap_or(*SEARCH_LIMIT);
		let offset = opts.offset.unwrap_or(0);
		Searcher::new(&self.ds, &base).search(&opts.search, limit, offset).await
	}

	/// Discard a namespace, then index the supplied items into it, if any
	pub async fn reset_index(&self, mut opts: IndexOptions) -> Result<Vec<DocId>> {
		let items = match opts.data.take() {
			Some(data) => data.into_vec(),
			None => Vec::new(),
		};
		let base = self.base(opts.ns.as_deref());
		let fields = opts.fieldset();
		Indexer::new(&self.ds, &base, &fields).reset(items).await
	}

	fn items(data: Option<OneOrMany<Item>>) -> Result<Vec<Item>> {
		match data {
			Some(data) => Ok(data.into_vec()),
			None => Err(Error::Validation("Data element required for indexing".into())),
		}
	}
}
