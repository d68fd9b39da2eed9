mod logs;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cnf::DEFAULT_LOG;
use crate::err::Error;

#[derive(Debug, Default)]
pub struct Builder {
	filter: Option<EnvFilter>,
}

pub fn builder() -> Builder {
	Builder::default()
}

/// Parse a log filter, accepting a bare level such as `debug`.
///
/// A bare level applies to the completer crates only, leaving the logs of
/// every dependency at `warn`.
pub fn filter_from_value(v: &str) -> Result<EnvFilter, Error> {
	let directives = match v {
		"error" | "warn" | "info" | "debug" | "trace" => {
			format!("warn,completer={v},completer_core={v},completer::core={v}")
		}
		"none" => "off".to_owned(),
		_ => v.to_owned(),
	};
	EnvFilter::builder().parse(&directives).map_err(|e| Error::LogFilter {
		filter: v.to_owned(),
		message: e.to_string(),
	})
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(self, log_level: &str) -> Result<Self, Error> {
		Ok(self.with_filter(filter_from_value(log_level)?))
	}

	/// Set the filter on the builder
	pub fn with_filter(mut self, filter: EnvFilter) -> Self {
		self.filter = Some(filter);
		self
	}

	/// Build a tracing dispatcher with the fmt subscriber
	pub fn build(self) -> Box<dyn Subscriber + Send + Sync + 'static> {
		let filter = match self.filter {
			Some(filter) => filter,
			None => EnvFilter::new(DEFAULT_LOG),
		};
		Box::new(tracing_subscriber::registry().with(logs::new(filter)))
	}

	/// Install the dispatcher as the global default
	pub fn init(self) {
		if self.build().try_init().is_err() {
			warn!("A global tracing subscriber was already installed");
		}
	}
}
