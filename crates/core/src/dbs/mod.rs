//! The public operations of the completion engine.
//!
//! A [`Completer`] wraps a [`Datastore`](crate::kvs::Datastore) and exposes
//! the indexing and search operations, each taking an options struct which
//! deserializes from camelCase JSON.

mod completer;
mod options;

pub use self::completer::Completer;
pub use self::options::*;
