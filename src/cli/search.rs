use clap::Args;
use completer_core::dbs::SearchOptions;

use crate::cli::abstraction::StoreArguments;

#[derive(Args, Debug)]
pub struct SearchCommandArguments {
	#[arg(help = "The text to complete")]
	#[arg(index = 1)]
	pub(crate) query: String,
	#[arg(help = "The number of documents to return")]
	#[arg(long = "limit")]
	pub(crate) limit: Option<usize>,
	#[arg(help = "The page of results to return, counted in multiples of the limit")]
	#[arg(long = "offset")]
	pub(crate) offset: Option<usize>,
	#[command(flatten)]
	pub(crate) store: StoreArguments,
}

pub async fn init(args: SearchCommandArguments) -> anyhow::Result<()> {
	let completer = args.store.connect().await?;
	let opts = SearchOptions {
		search: args.query,
		limit: args.limit,
		offset: args.offset,
		ns: Some(args.store.ns),
	};
	let found = completer.search(opts).await?;
	println!("{}", serde_json::to_string(&found)?);
	completer.datastore().shutdown().await?;
	Ok(())
}
