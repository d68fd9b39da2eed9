mod abstraction;
mod index;
mod remove;
mod search;
mod shell;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::cnf::{DEFAULT_LOG, INFO, PKG_NAME};
use index::{IndexCommandArguments, WriteCommandArguments};
use remove::RemoveCommandArguments;
use search::SearchCommandArguments;
use shell::ShellCommandArguments;

#[derive(Parser, Debug)]
#[command(name = PKG_NAME, bin_name = PKG_NAME)]
#[command(about = INFO, version)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[arg(help = "The logging level or filter directives", global = true)]
	#[arg(env = "COMPLETER_LOG", long = "log", default_value = DEFAULT_LOG)]
	log: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	#[command(about = "Index a list of documents, optionally discarding the namespace first")]
	Index(IndexCommandArguments),
	#[command(about = "Index a single document or a list of documents")]
	Add(WriteCommandArguments),
	#[command(about = "Merge documents into their stored versions, reindexing renamed documents")]
	Update(WriteCommandArguments),
	#[command(about = "Remove documents and every completion entry written for them")]
	Remove(RemoveCommandArguments),
	#[command(about = "Find the documents matching a completion query")]
	Search(SearchCommandArguments),
	#[command(about = "Serve newline-delimited JSON requests from standard input")]
	Shell(ShellCommandArguments),
}

#[tokio::main]
pub async fn init() -> ExitCode {
	let args = Cli::parse();
	// Initialize logging
	match crate::telemetry::builder().with_log_level(&args.log) {
		Ok(builder) => builder.init(),
		Err(e) => {
			eprintln!("{e}");
			return ExitCode::FAILURE;
		}
	}
	let output = match args.command {
		Commands::Index(args) => index::init(args).await,
		Commands::Add(args) => index::add(args).await,
		Commands::Update(args) => index::update(args).await,
		Commands::Remove(args) => remove::init(args).await,
		Commands::Search(args) => search::init(args).await,
		Commands::Shell(args) => shell::init(args).await,
	};
	if let Err(e) = output {
		error!("{e:#}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}
