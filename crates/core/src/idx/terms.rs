//! The sorted sets holding the members matching each completion term.
use crate::err::Result;
use crate::kvs::Datastore;

pub struct TermIndex<'a> {
	ds: &'a Datastore,
}

impl<'a> TermIndex<'a> {
	pub fn new(ds: &'a Datastore) -> Self {
		Self {
			ds,
		}
	}

	pub async fn add_member(&self, key: &str, score: f64, member: &str) -> Result<()> {
		self.ds.zadd(key, score, member).await
	}

	/// Range over the members of a key by ascending score, then member.
	///
	/// The `(offset, count)` limit is applied after filtering by score.
	pub async fn range_by_score(
		&self,
		key: &str,
		min: f64,
		max: f64,
		limit: Option<(usize, usize)>,
	) -> Result<Vec<String>> {
		self.ds.zrangebyscore(key, min, max, limit).await
	}

	/// Intersect the source keys into `dest`, summing scores.
	pub async fn intersect_store(&self, dest: &str, sources: &[String]) -> Result<usize> {
		let n = self.ds.zinterstore(dest, sources).await?;
		trace!("Intersected {} keys into {dest} with {n} members", sources.len());
		Ok(n)
	}

	pub async fn remove_member(&self, key: &str, member: &str) -> Result<()> {
		self.ds.zrem(key, member).await
	}

	pub async fn delete_keys(&self, keys: &[String]) -> Result<()> {
		self.ds.del(keys).await
	}
}
