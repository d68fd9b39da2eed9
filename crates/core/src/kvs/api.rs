//! This module defines the primitive contract of the backing key-value store.
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;
use std::time::Duration;

use crate::err::Result;

/// This trait defines the primitive operations the engine requires from a
/// sorted-set-capable key-value store.
///
/// Every operation is a single atomic command against the store. The engine
/// never groups commands into transactions, so implementations do not need
/// to provide any isolation between calls.
///
/// Container types follow Redis semantics: a hash, set or sorted set which
/// loses its last element ceases to exist, and reading a missing key yields
/// an empty container rather than an error.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
	/// Get the name of the storage engine.
	fn kind(&self) -> &'static str;

	/// Set a plain string value, optionally expiring after `ttl`.
	async fn set(&self, key: &str, val: &str, ttl: Option<Duration>) -> Result<()>;

	/// Fetch a plain string value.
	async fn get(&self, key: &str) -> Result<Option<String>>;

	/// Set a field of a hash.
	async fn hset(&self, key: &str, field: &str, val: &str) -> Result<()>;

	/// Fetch a field of a hash.
	async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

	/// Fetch many fields of a hash, in the order they were requested.
	async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>>;

	/// Fetch every field of a hash.
	async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

	/// Delete a field from a hash.
	async fn hdel(&self, key: &str, field: &str) -> Result<()>;

	/// Add a member to a set.
	async fn sadd(&self, key: &str, member: &str) -> Result<()>;

	/// Fetch every member of a set.
	async fn smembers(&self, key: &str) -> Result<Vec<String>>;

	/// Add or rescore a member of a sorted set.
	async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()>;

	/// Fetch the members of a sorted set whose score lies within the
	/// inclusive range `min..=max`.
	///
	/// Members are ordered by ascending score, then by member. The optional
	/// `limit` is an `(offset, count)` pair applied after score filtering.
	async fn zrangebyscore(
		&self,
		key: &str,
		min: f64,
		max: f64,
		limit: Option<(usize, usize)>,
	) -> Result<Vec<String>>;

	/// Store the intersection of the source sorted sets in `dest`, summing
	/// the scores of each member, and return the size of the result.
	///
	/// A missing source key yields an empty intersection, and an empty
	/// intersection leaves `dest` absent.
	async fn zinterstore(&self, dest: &str, keys: &[String]) -> Result<usize>;

	/// Remove a member from a sorted set.
	async fn zrem(&self, key: &str, member: &str) -> Result<()>;

	/// Delete keys of any type.
	async fn del(&self, keys: &[String]) -> Result<()>;

	/// Reset the time to live of a key, returning whether the key exists.
	async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

	/// List every key starting with `prefix`, in lexical order.
	async fn keys(&self, prefix: &str) -> Result<Vec<String>>;

	/// Fetch the score of a sorted set member.
	async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

	/// Release the connection to the store.
	async fn shutdown(&self) -> Result<()>;
}
