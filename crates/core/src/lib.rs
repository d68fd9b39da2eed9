//! # Completer Core
//!
//! This crate is the core library of the completer engine, a prefix based
//! autocomplete index layered over a sorted-set key value store.
//!
//! Documents are stored per namespace, and every prefix and inner substring of
//! their completion text is written into a sorted set, scored by the position
//! of the word it was derived from. Queries are normalized the same way, and
//! multi-word queries are answered by intersecting those sorted sets.
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use completer_core::dbs::{Completer, IndexOptions, SearchOptions};
//! # use completer_core::doc::Item;
//! # use completer_core::kvs::Datastore;
//! # #[tokio::main]
//! # async fn main() -> Result<(), completer_core::err::Error> {
//! let ds = Arc::new(Datastore::new("memory").await?);
//! let completer = Completer::new(ds);
//! completer.index(IndexOptions::new(vec![Item::from("Grant Tom"), Item::from("Peter Allen")])).await?;
//! let found = completer.search(SearchOptions::new("gran")).await?;
//! assert_eq!(found[0]["name"], "Grant Tom");
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

mod exe;

pub mod cnf;
pub mod dbs;
pub mod doc;
pub mod err;
pub mod idx;
pub mod key;
pub mod kvs;
