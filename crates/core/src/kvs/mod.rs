//! The module defining the key value store.
//! Everything related to the backing store lives here: the primitive
//! contract, the in-memory and Redis adapters, and the lifecycle
//! notifications of the connection.
//! Every piece of engine state (completion keys, documents, the key
//! registry and reverse index) is stored through a [`Datastore`], and the
//! engine holds no other durable state of its own.

mod api;
mod ds;
mod mem;
mod notify;
mod redis;

pub use self::api::Backend;
pub use self::ds::*;
pub use self::notify::Notification;
