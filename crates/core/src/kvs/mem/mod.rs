#![cfg(feature = "kv-mem")]

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::err::{Error, Result};
use crate::kvs::api::Backend;
use crate::kvs::notify::{Notification, emit};

/// A sorted set score, ordered with [`f64::total_cmp`]
#[derive(Clone, Copy, Debug)]
struct Score(f64);

impl PartialEq for Score {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Score {}

impl PartialOrd for Score {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Score {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

/// A sorted set, ordered by score and then by member
#[derive(Clone, Debug, Default)]
struct SortedSet {
	order: BTreeSet<(Score, String)>,
	scores: HashMap<String, f64>,
}

impl SortedSet {
	fn insert(&mut self, score: f64, member: &str) {
		if let Some(old) = self.scores.insert(member.to_owned(), score) {
			self.order.remove(&(Score(old), member.to_owned()));
		}
		self.order.insert((Score(score), member.to_owned()));
	}

	fn remove(&mut self, member: &str) {
		if let Some(old) = self.scores.remove(member) {
			self.order.remove(&(Score(old), member.to_owned()));
		}
	}

	fn score(&self, member: &str) -> Option<f64> {
		self.scores.get(member).copied()
	}

	fn is_empty(&self) -> bool {
		self.scores.is_empty()
	}

	fn range(&self, min: f64, max: f64) -> impl Iterator<Item = &String> {
		self.order
			.iter()
			.skip_while(move |(s, _)| s.0 < min)
			.take_while(move |(s, _)| s.0 <= max)
			.map(|(_, m)| m)
	}
}

/// A typed value held at a key
#[derive(Clone, Debug)]
enum Entry {
	Str(String),
	Hash(HashMap<String, String>),
	Set(HashSet<String>),
	Zset(SortedSet),
}

impl Entry {
	fn is_empty(&self) -> bool {
		match self {
			Entry::Str(_) => false,
			Entry::Hash(v) => v.is_empty(),
			Entry::Set(v) => v.is_empty(),
			Entry::Zset(v) => v.is_empty(),
		}
	}
}

#[derive(Clone, Debug)]
struct Slot {
	entry: Entry,
	expires: Option<Instant>,
}

impl Slot {
	fn new(entry: Entry) -> Self {
		Self {
			entry,
			expires: None,
		}
	}

	fn expired(&self, now: Instant) -> bool {
		self.expires.is_some_and(|at| at <= now)
	}
}

/// An in-memory store with the container semantics of Redis.
///
/// Expired keys are evicted lazily, the next time they are accessed.
pub struct Datastore {
	db: RwLock<HashMap<String, Slot>>,
	notify: broadcast::Sender<Notification>,
}

macro_rules! typed {
	($slot:expr_2021, $key:expr_2021, $variant:ident) => {
		match $slot {
			Some(Slot {
				entry: Entry::$variant(v),
				..
			}) => Some(v),
			Some(_) => return Err(Error::WrongType($key.to_owned())),
			None => None,
		}
	};
}

impl Datastore {
	/// Open a new in-memory store
	pub(crate) fn new(notify: broadcast::Sender<Notification>) -> Datastore {
		emit(&notify, Notification::Connect);
		emit(&notify, Notification::Ready);
		Datastore {
			db: RwLock::new(HashMap::new()),
			notify,
		}
	}

	/// List every live key starting with the given prefix, in lexical order
	fn scan(&self, prefix: &str) -> Vec<String> {
		let now = Instant::now();
		let db = self.db.read();
		let mut keys: Vec<String> = db
			.iter()
			.filter(|(k, slot)| k.starts_with(prefix) && !slot.expired(now))
			.map(|(k, _)| k.clone())
			.collect();
		keys.sort();
		keys
	}

	/// Fetch a live slot, evicting it when it has expired
	fn live<'a>(db: &'a mut HashMap<String, Slot>, key: &str) -> Option<&'a mut Slot> {
		if db.get(key).is_some_and(|slot| slot.expired(Instant::now())) {
			db.remove(key);
		}
		db.get_mut(key)
	}

	/// Fetch a live slot for writing, creating an empty container if missing
	fn entry<'a>(
		db: &'a mut HashMap<String, Slot>,
		key: &str,
		empty: fn() -> Entry,
	) -> &'a mut Slot {
		if db.get(key).is_some_and(|slot| slot.expired(Instant::now())) {
			db.remove(key);
		}
		db.entry(key.to_owned()).or_insert_with(|| Slot::new(empty()))
	}

	/// Remove a container which no longer holds any elements
	fn prune(db: &mut HashMap<String, Slot>, key: &str) {
		if db.get(key).is_some_and(|slot| slot.entry.is_empty()) {
			db.remove(key);
		}
	}
}

#[async_trait::async_trait]
impl Backend for Datastore {
	fn kind(&self) -> &'static str {
		"memory"
	}

	async fn set(&self, key: &str, val: &str, ttl: Option<Duration>) -> Result<()> {
		let mut db = self.db.write();
		db.insert(
			key.to_owned(),
			Slot {
				entry: Entry::Str(val.to_owned()),
				expires: ttl.map(|ttl| Instant::now() + ttl),
			},
		);
		Ok(())
	}

	async fn get(&self, key: &str) -> Result<Option<String>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		Ok(typed!(slot, key, Str).cloned())
	}

	async fn hset(&self, key: &str, field: &str, val: &str) -> Result<()> {
		let mut db = self.db.write();
		let slot = Self::entry(&mut db, key, || Entry::Hash(HashMap::new()));
		let Entry::Hash(hash) = &mut slot.entry else {
			return Err(Error::WrongType(key.to_owned()));
		};
		hash.insert(field.to_owned(), val.to_owned());
		Ok(())
	}

	async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		Ok(typed!(slot, key, Hash).and_then(|h| h.get(field).cloned()))
	}

	async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		let hash = typed!(slot, key, Hash);
		Ok(fields.iter().map(|f| hash.as_ref().and_then(|h| h.get(f).cloned())).collect())
	}

	async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		Ok(typed!(slot, key, Hash).cloned().unwrap_or_default())
	}

	async fn hdel(&self, key: &str, field: &str) -> Result<()> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		if let Some(hash) = typed!(slot, key, Hash) {
			hash.remove(field);
		}
		Self::prune(&mut db, key);
		Ok(())
	}

	async fn sadd(&self, key: &str, member: &str) -> Result<()> {
		let mut db = self.db.write();
		let slot = Self::entry(&mut db, key, || Entry::Set(HashSet::new()));
		let Entry::Set(set) = &mut slot.entry else {
			return Err(Error::WrongType(key.to_owned()));
		};
		set.insert(member.to_owned());
		Ok(())
	}

	async fn smembers(&self, key: &str) -> Result<Vec<String>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		Ok(typed!(slot, key, Set).map(|s| s.iter().cloned().collect()).unwrap_or_default())
	}

	async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
		let mut db = self.db.write();
		let slot = Self::entry(&mut db, key, || Entry::Zset(SortedSet::default()));
		let Entry::Zset(zset) = &mut slot.entry else {
			return Err(Error::WrongType(key.to_owned()));
		};
		zset.insert(score, member);
		Ok(())
	}

	async fn zrangebyscore(
		&self,
		key: &str,
		min: f64,
		max: f64,
		limit: Option<(usize, usize)>,
	) -> Result<Vec<String>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		let Some(zset) = typed!(slot, key, Zset) else {
			return Ok(Vec::new());
		};
		let range = zset.range(min, max).cloned();
		Ok(match limit {
			Some((offset, count)) => range.skip(offset).take(count).collect(),
			None => range.collect(),
		})
	}

	async fn zinterstore(&self, dest: &str, keys: &[String]) -> Result<usize> {
		let mut db = self.db.write();
		let mut out: Option<SortedSet> = None;
		for key in keys {
			let slot = Self::live(&mut db, key);
			let source = typed!(slot, key, Zset).cloned().unwrap_or_default();
			out = Some(match out {
				None => source,
				Some(acc) => {
					let mut next = SortedSet::default();
					for (member, score) in acc.scores.iter() {
						if let Some(other) = source.score(member) {
							next.insert(score + other, member);
						}
					}
					next
				}
			});
		}
		let out = out.unwrap_or_default();
		let len = out.scores.len();
		if out.is_empty() {
			db.remove(dest);
		} else {
			db.insert(dest.to_owned(), Slot::new(Entry::Zset(out)));
		}
		Ok(len)
	}

	async fn zrem(&self, key: &str, member: &str) -> Result<()> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		if let Some(zset) = typed!(slot, key, Zset) {
			zset.remove(member);
		}
		Self::prune(&mut db, key);
		Ok(())
	}

	async fn del(&self, keys: &[String]) -> Result<()> {
		let mut db = self.db.write();
		for key in keys {
			db.remove(key);
		}
		Ok(())
	}

	async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
		let mut db = self.db.write();
		Ok(match Self::live(&mut db, key) {
			Some(slot) => {
				slot.expires = Some(Instant::now() + ttl);
				true
			}
			None => false,
		})
	}

	async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
		Ok(self.scan(prefix))
	}

	async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
		let mut db = self.db.write();
		let slot = Self::live(&mut db, key);
		Ok(typed!(slot, key, Zset).and_then(|z| z.score(member)))
	}

	async fn shutdown(&self) -> Result<()> {
		emit(&self.notify, Notification::End);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use test_log::test;

	use super::*;

	fn store() -> Datastore {
		let (tx, _) = broadcast::channel(8);
		Datastore::new(tx)
	}

	fn keys(v: &[&str]) -> Vec<String> {
		v.iter().map(|s| s.to_string()).collect()
	}

	#[test(tokio::test)]
	async fn strings_and_expiry() {
		let ds = store();
		ds.set("a", "1", None).await.unwrap();
		assert_eq!(ds.get("a").await.unwrap().as_deref(), Some("1"));
		ds.set("b", "2", Some(Duration::ZERO)).await.unwrap();
		assert_eq!(ds.get("b").await.unwrap(), None);
		assert!(ds.expire("a", Duration::ZERO).await.unwrap());
		assert_eq!(ds.get("a").await.unwrap(), None);
		assert!(!ds.expire("missing", Duration::from_secs(5)).await.unwrap());
	}

	#[test(tokio::test)]
	async fn hashes_keep_request_order() {
		let ds = store();
		ds.hset("h", "1", "one").await.unwrap();
		ds.hset("h", "2", "two").await.unwrap();
		let got = ds.hmget("h", &keys(&["2", "3", "1"])).await.unwrap();
		assert_eq!(got, vec![Some("two".into()), None, Some("one".into())]);
		assert_eq!(ds.hgetall("h").await.unwrap().len(), 2);
		ds.hdel("h", "1").await.unwrap();
		ds.hdel("h", "2").await.unwrap();
		assert!(ds.keys("").await.unwrap().is_empty());
	}

	#[test(tokio::test)]
	async fn sorted_sets_order_by_score_then_member() {
		let ds = store();
		ds.zadd("z", 2.0, "b").await.unwrap();
		ds.zadd("z", 1.0, "c").await.unwrap();
		ds.zadd("z", 1.0, "a").await.unwrap();
		ds.zadd("z", 3.0, "d").await.unwrap();
		let all = ds.zrangebyscore("z", 0.0, f64::INFINITY, None).await.unwrap();
		assert_eq!(all, keys(&["a", "c", "b", "d"]));
		let page = ds.zrangebyscore("z", 0.0, f64::INFINITY, Some((1, 2))).await.unwrap();
		assert_eq!(page, keys(&["c", "b"]));
		let bounded = ds.zrangebyscore("z", 2.0, 2.0, None).await.unwrap();
		assert_eq!(bounded, keys(&["b"]));
		// Rescoring moves the member
		ds.zadd("z", 0.5, "d").await.unwrap();
		let all = ds.zrangebyscore("z", 0.0, f64::INFINITY, None).await.unwrap();
		assert_eq!(all, keys(&["d", "a", "c", "b"]));
	}

	#[test(tokio::test)]
	async fn empty_sorted_sets_vanish() {
		let ds = store();
		ds.zadd("z", 1.0, "a").await.unwrap();
		ds.zrem("z", "a").await.unwrap();
		assert!(ds.keys("").await.unwrap().is_empty());
		ds.zrem("z", "a").await.unwrap();
	}

	#[test(tokio::test)]
	async fn intersections_sum_scores() {
		let ds = store();
		ds.zadd("x", 1.0, "a").await.unwrap();
		ds.zadd("x", 1.0, "b").await.unwrap();
		ds.zadd("y", 2.0, "b").await.unwrap();
		ds.zadd("y", 2.0, "c").await.unwrap();
		let n = ds.zinterstore("x|y", &keys(&["x", "y"])).await.unwrap();
		assert_eq!(n, 1);
		assert_eq!(ds.zscore("x|y", "b").await.unwrap(), Some(3.0));
		// A missing source empties the destination
		let n = ds.zinterstore("x|y", &keys(&["x", "missing"])).await.unwrap();
		assert_eq!(n, 0);
		assert!(!ds.keys("").await.unwrap().contains(&"x|y".to_string()));
	}

	#[test(tokio::test)]
	async fn wrong_types_are_rejected() {
		let ds = store();
		ds.sadd("s", "a").await.unwrap();
		let err = ds.zadd("s", 1.0, "a").await.unwrap_err();
		assert!(matches!(err, Error::WrongType(k) if k == "s"));
		assert!(ds.hget("s", "a").await.is_err());
		assert_eq!(ds.smembers("s").await.unwrap(), keys(&["a"]));
	}

	#[test(tokio::test)]
	async fn lifecycle_notifications() {
		let (tx, mut rx) = broadcast::channel(8);
		let ds = Datastore::new(tx);
		ds.shutdown().await.unwrap();
		assert_eq!(rx.try_recv().unwrap(), Notification::Connect);
		assert_eq!(rx.try_recv().unwrap(), Notification::Ready);
		assert_eq!(rx.try_recv().unwrap(), Notification::End);
	}
}
