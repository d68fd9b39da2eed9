use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use completer_core::cnf::DEFAULT_NAMESPACE;
use completer_core::dbs::Completer;
use completer_core::kvs::Datastore;
use tokio::io::AsyncReadExt;

use crate::cnf::{DEFAULT_PATH, STDIN_PATH};
use crate::err::Error;

#[derive(Args, Debug)]
pub(crate) struct StoreArguments {
	#[arg(help = "Datastore path, either memory or a redis:// address")]
	#[arg(env = "COMPLETER_PATH", long = "path", default_value = DEFAULT_PATH)]
	pub(crate) path: String,
	#[arg(help = "Application name prefixed to every key")]
	#[arg(env = "COMPLETER_APP", long = "app")]
	pub(crate) app: Option<String>,
	#[arg(help = "The namespace of the documents")]
	#[arg(env = "COMPLETER_NS", long = "ns", default_value = DEFAULT_NAMESPACE)]
	pub(crate) ns: String,
}

impl StoreArguments {
	/// Connect to the datastore and build the engine over it
	pub(crate) async fn connect(&self) -> Result<Completer, Error> {
		let ds = Arc::new(Datastore::new(&self.path).await?);
		// Forward connection events to the logs
		let mut events = ds.notifications();
		tokio::spawn(async move {
			while let Ok(event) = events.recv().await {
				debug!("Datastore connection event: {event}");
			}
		});
		let completer = Completer::new(ds);
		Ok(match &self.app {
			Some(app) => completer.with_app(app),
			None => completer,
		})
	}
}

#[derive(Args, Debug)]
pub(crate) struct FieldArguments {
	#[arg(help = "The field holding the document id")]
	#[arg(long = "id-field")]
	pub(crate) id_field: Option<String>,
	#[arg(help = "The field holding the text to complete against")]
	#[arg(long = "compl-field")]
	pub(crate) compl_field: Option<String>,
	#[arg(help = "The field ordering documents which match equally")]
	#[arg(long = "sort-field")]
	pub(crate) sort_field: Option<String>,
}

/// Read a whole input, from a file or from standard input
pub(crate) async fn read_input(file: &str) -> anyhow::Result<String> {
	if file == STDIN_PATH {
		let mut buf = String::new();
		tokio::io::stdin().read_to_string(&mut buf).await.context("Unable to read standard input")?;
		Ok(buf)
	} else {
		tokio::fs::read_to_string(file).await.with_context(|| format!("Unable to read {file}"))
	}
}
