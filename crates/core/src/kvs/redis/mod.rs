#![cfg(feature = "kv-redis")]

use std::collections::HashMap;
use std::time::Duration;

use fred::prelude::*;
use fred::types::{ConnectHandle, Scanner};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::err::{Error, Result};
use crate::kvs::api::Backend;
use crate::kvs::notify::{Notification, emit};

/// The number of keys requested per page when scanning the keyspace
const SCAN_PAGE_SIZE: u32 = 500;

pub struct Datastore {
	client: RedisClient,
	// The connection task, and the tasks forwarding connection events
	tasks: Mutex<Vec<JoinHandle<()>>>,
	connect_handle: Mutex<Option<ConnectHandle>>,
	notify: broadcast::Sender<Notification>,
}

impl Datastore {
	/// Open a new connection to a Redis server
	pub(crate) async fn new(path: &str, notify: broadcast::Sender<Notification>) -> Result<Datastore> {
		let config = match RedisConfig::from_url(path) {
			Ok(x) => x,
			Err(e) => return Err(Error::Ds(e.to_string())),
		};
		let client = Builder::from_config(config)
			.set_policy(ReconnectPolicy::default())
			.build()
			.map_err(|e| Error::Ds(e.to_string()))?;
		// Forward connection events before connecting, so none are missed
		let mut tasks = Vec::with_capacity(2);
		let mut errors = client.error_rx();
		let sender = notify.clone();
		tasks.push(tokio::spawn(async move {
			while let Ok(e) = errors.recv().await {
				warn!(target: "completer::core::kvs", "Redis connection error: {e}");
				emit(&sender, Notification::Error(e.to_string()));
			}
		}));
		let mut reconnects = client.reconnect_rx();
		let sender = notify.clone();
		tasks.push(tokio::spawn(async move {
			while let Ok(server) = reconnects.recv().await {
				debug!(target: "completer::core::kvs", "Reconnected to Redis server {server}");
				emit(&sender, Notification::Connect);
				emit(&sender, Notification::Ready);
			}
		}));
		let connect_handle = client.init().await.map_err(|e| Error::Ds(e.to_string()))?;
		emit(&notify, Notification::Connect);
		emit(&notify, Notification::Ready);
		Ok(Datastore {
			client,
			tasks: Mutex::new(tasks),
			connect_handle: Mutex::new(Some(connect_handle)),
			notify,
		})
	}
}

/// Escape the glob characters of a key prefix, producing a `SCAN` pattern
fn pattern(prefix: &str) -> String {
	let mut out = String::with_capacity(prefix.len() + 1);
	for c in prefix.chars() {
		if matches!(c, '*' | '?' | '[' | ']' | '\\') {
			out.push('\\');
		}
		out.push(c);
	}
	out.push('*');
	out
}

/// Render a score bound the way Redis expects it
fn bound(v: f64) -> String {
	if v == f64::INFINITY {
		"+inf".to_owned()
	} else if v == f64::NEG_INFINITY {
		"-inf".to_owned()
	} else {
		v.to_string()
	}
}

/// Convert a range limit, saturating where it does not fit a Redis integer
fn clamp(v: usize) -> i64 {
	i64::try_from(v).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl Backend for Datastore {
	fn kind(&self) -> &'static str {
		"redis"
	}

	async fn set(&self, key: &str, val: &str, ttl: Option<Duration>) -> Result<()> {
		let expire = ttl.map(|t| Expiration::EX(t.as_secs().max(1) as i64));
		self.client.set::<(), _, _>(key, val, expire, None, false).await?;
		Ok(())
	}

	async fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.client.get(key).await?)
	}

	async fn hset(&self, key: &str, field: &str, val: &str) -> Result<()> {
		self.client.hset::<(), _, _>(key, (field, val)).await?;
		Ok(())
	}

	async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
		Ok(self.client.hget(key, field).await?)
	}

	async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>> {
		Ok(self.client.hmget(key, fields.to_vec()).await?)
	}

	async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
		Ok(self.client.hgetall(key).await?)
	}

	async fn hdel(&self, key: &str, field: &str) -> Result<()> {
		self.client.hdel::<(), _, _>(key, field).await?;
		Ok(())
	}

	async fn sadd(&self, key: &str, member: &str) -> Result<()> {
		self.client.sadd::<(), _, _>(key, member).await?;
		Ok(())
	}

	async fn smembers(&self, key: &str) -> Result<Vec<String>> {
		Ok(self.client.smembers(key).await?)
	}

	async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
		self.client.zadd::<(), _, _>(key, None, None, false, false, (score, member)).await?;
		Ok(())
	}

	async fn zrangebyscore(
		&self,
		key: &str,
		min: f64,
		max: f64,
		limit: Option<(usize, usize)>,
	) -> Result<Vec<String>> {
		let limit = limit.map(|(offset, count)| (clamp(offset), clamp(count)));
		let (min, max) = (bound(min), bound(max));
		Ok(self.client.zrangebyscore(key, min.as_str(), max.as_str(), false, limit).await?)
	}

	async fn zinterstore(&self, dest: &str, keys: &[String]) -> Result<usize> {
		if keys.is_empty() {
			self.client.del::<(), _>(dest).await?;
			return Ok(0);
		}
		Ok(self.client.zinterstore(dest, keys.to_vec(), Vec::<f64>::new(), None).await?)
	}

	async fn zrem(&self, key: &str, member: &str) -> Result<()> {
		self.client.zrem::<(), _, _>(key, member).await?;
		Ok(())
	}

	async fn del(&self, keys: &[String]) -> Result<()> {
		self.client.del::<(), _>(keys.to_vec()).await?;
		Ok(())
	}

	async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
		Ok(self.client.expire(key, ttl.as_secs().max(1) as i64).await?)
	}

	async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
		let mut keys = Vec::new();
		let mut scan_stream = self.client.scan(pattern(prefix), Some(SCAN_PAGE_SIZE), None);
		while let Some(page) = scan_stream.next().await {
			let mut page = page?;
			if let Some(found) = page.take_results() {
				keys.extend(found.into_iter().filter_map(|k| k.into_string()));
			}
			let _ = page.next();
		}
		// A scan can return a key more than once
		keys.sort();
		keys.dedup();
		Ok(keys)
	}

	async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
		Ok(self.client.zscore(key, member).await?)
	}

	async fn shutdown(&self) -> Result<()> {
		self.client.quit().await?;
		let handle = self.connect_handle.lock().take();
		if let Some(handle) = handle {
			match handle.await {
				Ok(Err(e)) => warn!(target: "completer::core::kvs", "Redis connection closed with an error: {e}"),
				Err(e) => warn!(target: "completer::core::kvs", "Redis connection task failed: {e}"),
				Ok(Ok(())) => {}
			}
		}
		let tasks = std::mem::take(&mut *self.tasks.lock());
		for task in tasks {
			task.abort();
		}
		emit(&self.notify, Notification::End);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scan_patterns_escape_globs() {
		assert_eq!(pattern("items:compl:"), "items:compl:*");
		assert_eq!(pattern("a*b?[c]"), "a\\*b\\?\\[c\\]*");
	}

	#[test]
	fn score_bounds() {
		assert_eq!(bound(f64::INFINITY), "+inf");
		assert_eq!(bound(f64::NEG_INFINITY), "-inf");
		assert_eq!(bound(0.0), "0");
		assert_eq!(bound(2.5), "2.5");
	}

	#[test]
	fn limits_saturate() {
		assert_eq!(clamp(20), 20);
		assert_eq!(clamp(usize::MAX), i64::MAX);
	}
}
