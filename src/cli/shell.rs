use clap::Args;
use completer_core::dbs::{Completer, IndexOptions, RemoveOptions, SearchOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::abstraction::StoreArguments;
use crate::err::Error;

#[derive(Args, Debug)]
pub struct ShellCommandArguments {
	#[command(flatten)]
	pub(crate) store: StoreArguments,
}

/// A single request read from a line of input
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Request {
	Index(IndexOptions),
	Add(IndexOptions),
	Update(IndexOptions),
	Remove(RemoveOptions),
	Search(SearchOptions),
	ResetIndex(IndexOptions),
}

/// The reply written for each request
#[derive(Debug, Serialize)]
struct Response {
	ok: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	result: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl Response {
	fn success(result: Value) -> Self {
		Self {
			ok: true,
			result: Some(result),
			error: None,
		}
	}

	fn failure(err: Error) -> Self {
		Self {
			ok: false,
			result: None,
			error: Some(err.to_string()),
		}
	}
}

async fn execute(completer: &Completer, line: &str) -> Result<Value, Error> {
	let res = match serde_json::from_str::<Request>(line)? {
		Request::Index(opts) => serde_json::to_value(completer.index(opts).await?)?,
		Request::Add(opts) => serde_json::to_value(completer.add(opts).await?)?,
		Request::Update(opts) => {
			completer.update(opts).await?;
			Value::Null
		}
		Request::Remove(opts) => {
			completer.remove(opts).await?;
			Value::Null
		}
		Request::Search(opts) => serde_json::to_value(completer.search(opts).await?)?,
		Request::ResetIndex(opts) => serde_json::to_value(completer.reset_index(opts).await?)?,
	};
	Ok(res)
}

async fn handle(completer: &Completer, line: &str) -> Response {
	match execute(completer, line).await {
		Ok(v) => Response::success(v),
		Err(e) => {
			debug!("Request failed: {e}");
			Response::failure(e)
		}
	}
}

pub async fn init(
	ShellCommandArguments {
		store,
	}: ShellCommandArguments,
) -> anyhow::Result<()> {
	let completer = store.connect().await?;
	info!("Reading requests from standard input");
	serve(&completer).await?;
	completer.datastore().shutdown().await?;
	Ok(())
}

async fn serve(completer: &Completer) -> Result<(), Error> {
	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	let mut stdout = tokio::io::stdout();
	while let Some(line) = lines.next_line().await? {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		let mut out = serde_json::to_vec(&handle(completer, line).await)?;
		out.push(b'\n');
		stdout.write_all(&out).await?;
		stdout.flush().await?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use completer_core::kvs::Datastore;
	use serde_json::json;
	use test_log::test;

	use super::*;

	async fn completer() -> Completer {
		Completer::new(Arc::new(Datastore::new("memory").await.unwrap()))
	}

	#[test(tokio::test)]
	async fn requests_share_one_store() {
		let completer = completer().await;
		let res = handle(
			&completer,
			r#"{"op":"index","data":[{"id":"1","name":"Grant Bowie"},{"id":"2","name":"Grace Hopper"}]}"#,
		)
		.await;
		assert!(res.ok);
		assert_eq!(res.result, Some(json!(["1", "2"])));
		let res = handle(&completer, r#"{"op":"search","search":"gran"}"#).await;
		assert!(res.ok);
		assert_eq!(res.result, Some(json!([{"id": "1", "name": "Grant Bowie"}])));
		let res = handle(&completer, r#"{"op":"remove","ids":["1"]}"#).await;
		assert_eq!(res.result, Some(Value::Null));
		let res = handle(&completer, r#"{"op":"search","search":"gran"}"#).await;
		assert_eq!(res.result, Some(json!([])));
	}

	#[test(tokio::test)]
	async fn malformed_requests_are_reported() {
		let completer = completer().await;
		let res = handle(&completer, "{not json").await;
		assert!(!res.ok);
		assert!(res.error.unwrap().starts_with("Unable to parse input"));
		let res = handle(&completer, r#"{"op":"explode"}"#).await;
		assert!(!res.ok);
		// Indexing needs a list of items
		let res = handle(&completer, r#"{"op":"index","data":{"id":"1","name":"Grant"}}"#).await;
		assert!(!res.ok);
		assert!(res.result.is_none());
	}

	#[test]
	fn responses_omit_empty_members() {
		let res = Response::success(json!([]));
		assert_eq!(serde_json::to_string(&res).unwrap(), r#"{"ok":true,"result":[]}"#);
	}
}
