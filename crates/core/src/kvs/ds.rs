use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use super::api::Backend;
use super::notify::{Notification, Notifier};
use crate::err::{Error, Result};

/// The backing key-value store, together with the lifecycle notifications
/// forwarded from its connection.
///
/// A datastore is cheap to share behind an [`Arc`]. The connection is
/// acquired when the datastore is created and released by [`Datastore::shutdown`].
pub struct Datastore {
	// The store adapter
	inner: Arc<dyn Backend>,
	// The lifecycle notification channel
	notifier: Notifier,
}

impl fmt::Display for Datastore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.inner.kind())
	}
}

impl fmt::Debug for Datastore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Datastore").field("kind", &self.inner.kind()).finish()
	}
}

impl Datastore {
	/// Creates a new datastore instance
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// # use completer_core::kvs::Datastore;
	/// # use completer_core::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("memory").await?;
	/// # Ok(())
	/// # }
	/// ```
	///
	/// Or to connect to a Redis server:
	///
	/// ```rust,no_run
	/// # use completer_core::kvs::Datastore;
	/// # use completer_core::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("redis://127.0.0.1:6379").await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn new(path: &str) -> Result<Datastore> {
		let notifier = Notifier::new();
		// Initiate the desired datastore
		let inner: Arc<dyn Backend> = match path {
			"memory" => {
				#[cfg(feature = "kv-mem")]
				{
					info!("Starting kvs store in {}", path);
					let v = super::mem::Datastore::new(notifier.sender());
					info!("Started kvs store in {}", path);
					Arc::new(v)
				}
				#[cfg(not(feature = "kv-mem"))]
				return Err(Error::Ds(
					"Cannot connect to the `memory` storage engine as it is not enabled in this build".to_owned(),
				));
			}
			// Parse and initiate a Redis connection
			s if s.starts_with("redis:") || s.starts_with("rediss:") => {
				#[cfg(feature = "kv-redis")]
				{
					info!("Connecting to kvs store at {}", path);
					let v = super::redis::Datastore::new(s, notifier.sender()).await?;
					info!("Connected to kvs store at {}", path);
					Arc::new(v)
				}
				#[cfg(not(feature = "kv-redis"))]
				return Err(Error::Ds(
					"Cannot connect to the `redis` storage engine as it is not enabled in this build".to_owned(),
				));
			}
			// The datastore path is not valid
			_ => {
				info!("Unable to load the specified datastore {}", path);
				return Err(Error::Ds("Unable to load the specified datastore".into()));
			}
		};
		Ok(Datastore {
			inner,
			notifier,
		})
	}

	/// Subscribe to the lifecycle notifications of the connection.
	///
	/// The first receiver handed out also observes the notifications emitted
	/// while the datastore was being created.
	pub fn notifications(&self) -> broadcast::Receiver<Notification> {
		self.notifier.subscribe()
	}

	/// Release the connection to the store
	pub async fn shutdown(&self) -> Result<()> {
		info!("Shutting down kvs store {}", self);
		self.inner.shutdown().await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self, val))]
	pub async fn set(&self, key: &str, val: &str, ttl: Option<Duration>) -> Result<()> {
		self.inner.set(key, val, ttl).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn get(&self, key: &str) -> Result<Option<String>> {
		self.inner.get(key).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self, val))]
	pub async fn hset(&self, key: &str, field: &str, val: &str) -> Result<()> {
		self.inner.hset(key, field, val).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
		self.inner.hget(key, field).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>> {
		if fields.is_empty() {
			return Ok(Vec::new());
		}
		let res = self.inner.hmget(key, fields).await?;
		if res.len() != fields.len() {
			fail!("Requested {} hash fields but received {}", fields.len(), res.len());
		}
		Ok(res)
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
		self.inner.hgetall(key).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn hdel(&self, key: &str, field: &str) -> Result<()> {
		self.inner.hdel(key, field).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn sadd(&self, key: &str, member: &str) -> Result<()> {
		self.inner.sadd(key, member).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn smembers(&self, key: &str) -> Result<Vec<String>> {
		self.inner.smembers(key).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
		self.inner.zadd(key, score, member).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn zrangebyscore(
		&self,
		key: &str,
		min: f64,
		max: f64,
		limit: Option<(usize, usize)>,
	) -> Result<Vec<String>> {
		if let Some((_, 0)) = limit {
			return Ok(Vec::new());
		}
		self.inner.zrangebyscore(key, min, max, limit).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn zinterstore(&self, dest: &str, keys: &[String]) -> Result<usize> {
		self.inner.zinterstore(dest, keys).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn zrem(&self, key: &str, member: &str) -> Result<()> {
		self.inner.zrem(key, member).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn del(&self, keys: &[String]) -> Result<()> {
		if keys.is_empty() {
			return Ok(());
		}
		self.inner.del(keys).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
		self.inner.keys(prefix).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
		self.inner.zscore(key, member).await
	}

	#[instrument(level = "trace", target = "completer::core::kvs", skip(self))]
	pub async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
		self.inner.expire(key, ttl).await
	}
}
