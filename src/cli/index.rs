use clap::Args;
use completer_core::dbs::IndexOptions;
use completer_core::doc::{Item, OneOrMany};

use crate::cli::abstraction::{FieldArguments, StoreArguments, read_input};
use crate::cnf::STDIN_PATH;

#[derive(Args, Debug)]
pub struct WriteCommandArguments {
	#[arg(help = "Path to a JSON file of documents. Use dash - to read from stdin.")]
	#[arg(long = "file", default_value = STDIN_PATH)]
	pub(crate) file: String,
	#[command(flatten)]
	pub(crate) store: StoreArguments,
	#[command(flatten)]
	pub(crate) fields: FieldArguments,
}

#[derive(Args, Debug)]
pub struct IndexCommandArguments {
	#[arg(help = "Discard every document of the namespace before indexing")]
	#[arg(long = "reset")]
	pub(crate) reset: bool,
	#[command(flatten)]
	pub(crate) write: WriteCommandArguments,
}

impl WriteCommandArguments {
	/// Read the documents and build the options of the write
	async fn options(&self) -> anyhow::Result<IndexOptions> {
		let input = read_input(&self.file).await?;
		let data: OneOrMany<Item> = serde_json::from_str(&input)?;
		Ok(IndexOptions {
			data: Some(data),
			ns: Some(self.store.ns.clone()),
			id_field: self.fields.id_field.clone(),
			compl_field: self.fields.compl_field.clone(),
			sort_field: self.fields.sort_field.clone(),
			reset: false,
		})
	}
}

pub async fn init(args: IndexCommandArguments) -> anyhow::Result<()> {
	let opts = args.write.options().await?.with_reset(args.reset);
	let completer = args.write.store.connect().await?;
	let ids = completer.index(opts).await?;
	info!("Indexed {} documents", ids.len());
	println!("{}", serde_json::to_string(&ids)?);
	completer.datastore().shutdown().await?;
	Ok(())
}

pub async fn add(args: WriteCommandArguments) -> anyhow::Result<()> {
	let opts = args.options().await?;
	let completer = args.store.connect().await?;
	let ids = completer.add(opts).await?;
	info!("Added {} documents", ids.len());
	println!("{}", serde_json::to_string(&ids)?);
	completer.datastore().shutdown().await?;
	Ok(())
}

pub async fn update(args: WriteCommandArguments) -> anyhow::Result<()> {
	let opts = args.options().await?;
	let completer = args.store.connect().await?;
	completer.update(opts).await?;
	info!("The documents were updated successfully");
	completer.datastore().shutdown().await?;
	Ok(())
}
