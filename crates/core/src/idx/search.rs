//! Resolves completion queries into documents.
//!
//! A single term is looked up directly in its completion key. Several terms
//! are looked up in their compound key, which caches the intersection of the
//! keys of each term. When the compound key is empty the intersection is
//! computed and stored, and every member of it is recorded in the reverse
//! index of its document, so removing the document also prunes the cache.
use crate::doc::{DocId, Fields};
use crate::err::Result;
use crate::exe::join_all_first_error;
use crate::idx::analyzer::{normalize, words};
use crate::idx::docs::DocumentStore;
use crate::idx::member::Member;
use crate::idx::reverse::ReverseIndex;
use crate::idx::terms::TermIndex;
use crate::key::Base;
use crate::key::compl::Compl;
use crate::kvs::Datastore;

/// Every stored score lies within this range
const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = f64::INFINITY;

pub struct Searcher<'a> {
	ds: &'a Datastore,
	base: &'a Base,
}

impl<'a> Searcher<'a> {
	pub fn new(ds: &'a Datastore, base: &'a Base) -> Self {
		Self {
			ds,
			base,
		}
	}

	/// Find the documents matching every term of the query.
	///
	/// Results are ordered by score, then by sort key. The `offset` counts
	/// pages of `limit` results.
	pub async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<Vec<Fields>> {
		let terms = words(&normalize(query));
		if terms.is_empty() {
			return Ok(Vec::new());
		}
		let page = Some((offset.saturating_mul(limit), limit));
		let ix = TermIndex::new(self.ds);
		let members = if let [term] = terms.as_slice() {
			let key = Compl::new(self.base, term).to_string();
			ix.range_by_score(&key, MIN_SCORE, MAX_SCORE, page).await?
		} else {
			let key = Compl::compound(self.base, &terms).to_string();
			let members = ix.range_by_score(&key, MIN_SCORE, MAX_SCORE, page).await?;
			if members.is_empty() && self.intersect(&ix, &key, &terms).await? {
				ix.range_by_score(&key, MIN_SCORE, MAX_SCORE, page).await?
			} else {
				members
			}
		};
		debug!("Query '{query}' matched {} members in namespace {}", members.len(), self.base);
		self.resolve(&members).await
	}

	/// Store the intersection of the keys of each term into the compound
	/// key, returning whether it has any members
	async fn intersect(&self, ix: &TermIndex<'_>, key: &str, terms: &[String]) -> Result<bool> {
		let sources: Vec<String> = terms.iter().map(|t| Compl::new(self.base, t).to_string()).collect();
		if ix.intersect_store(key, &sources).await? == 0 {
			return Ok(false);
		}
		let reverse = ReverseIndex::new(self.ds, self.base);
		reverse.register(key).await?;
		let members = ix.range_by_score(key, MIN_SCORE, MAX_SCORE, None).await?;
		let reverse = &reverse;
		join_all_first_error(members.iter().map(|m| async move {
			let member = Member::parse(m)?;
			reverse.register_key(&member.id, key, m).await
		}))
		.await?;
		Ok(true)
	}

	/// Fetch the documents of the members, in order
	async fn resolve(&self, members: &[String]) -> Result<Vec<Fields>> {
		if members.is_empty() {
			return Ok(Vec::new());
		}
		let ids = members.iter().map(|m| Member::parse(m).map(|m| m.id)).collect::<Result<Vec<DocId>>>()?;
		let docs = DocumentStore::new(self.ds, self.base).get_many(&ids).await?;
		Ok(ids
			.iter()
			.zip(docs)
			.filter_map(|(id, doc)| {
				if doc.is_none() {
					warn!("Document {id} is indexed in namespace {} but no longer stored", self.base);
				}
				doc
			})
			.collect())
	}
}
