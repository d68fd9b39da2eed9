use std::fmt;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::cnf::NOTIFICATION_CAPACITY;

/// A lifecycle event emitted by the connection to the backing store.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Notification {
	/// The store is ready to accept commands
	Ready,
	/// A connection to the store was established
	Connect,
	/// The connection reported an error
	Error(String),
	/// The connection was closed
	End,
	/// Buffered commands were flushed to the store.
	///
	/// Neither the memory nor the redis adapter buffers commands, so neither
	/// emits this event.
	Drain,
}

impl fmt::Display for Notification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Notification::Ready => write!(f, "ready"),
			Notification::Connect => write!(f, "connect"),
			Notification::Error(e) => write!(f, "error: {e}"),
			Notification::End => write!(f, "end"),
			Notification::Drain => write!(f, "drain"),
		}
	}
}

/// Fans lifecycle notifications out to every subscriber.
///
/// The first receiver is created together with the channel, so the first
/// subscriber also observes what was emitted while the store was connecting.
#[derive(Debug)]
pub(crate) struct Notifier {
	sender: broadcast::Sender<Notification>,
	initial: Mutex<Option<broadcast::Receiver<Notification>>>,
}

impl Notifier {
	pub(crate) fn new() -> Self {
		let (sender, initial) = broadcast::channel((*NOTIFICATION_CAPACITY).max(1));
		Self {
			sender,
			initial: Mutex::new(Some(initial)),
		}
	}

	/// A cloneable handle which store adapters use to emit notifications
	pub(crate) fn sender(&self) -> broadcast::Sender<Notification> {
		self.sender.clone()
	}

	#[cfg(test)]
	pub(crate) fn emit(&self, notification: Notification) {
		emit(&self.sender, notification)
	}

	pub(crate) fn subscribe(&self) -> broadcast::Receiver<Notification> {
		match self.initial.lock().take() {
			Some(rx) => rx,
			None => self.sender.subscribe(),
		}
	}
}

/// Emit a notification, ignoring the case where nobody is listening
pub(crate) fn emit(sender: &broadcast::Sender<Notification>, notification: Notification) {
	trace!(target: "completer::core::kvs", "Connection notification: {notification}");
	let _ = sender.send(notification);
}
