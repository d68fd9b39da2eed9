use clap::Args;
use completer_core::dbs::RemoveOptions;
use serde_json::Value;

use crate::cli::abstraction::StoreArguments;

#[derive(Args, Debug)]
pub struct RemoveCommandArguments {
	#[arg(help = "The ids of the documents to remove", required = true)]
	#[arg(index = 1, num_args = 1..)]
	pub(crate) ids: Vec<String>,
	#[command(flatten)]
	pub(crate) store: StoreArguments,
}

pub async fn init(
	RemoveCommandArguments {
		ids,
		store,
	}: RemoveCommandArguments,
) -> anyhow::Result<()> {
	let completer = store.connect().await?;
	let count = ids.len();
	let ids: Vec<Value> = ids.into_iter().map(Value::String).collect();
	completer.remove(RemoveOptions::new(ids).with_ns(store.ns)).await?;
	info!("Removed {count} documents");
	completer.datastore().shutdown().await?;
	Ok(())
}
