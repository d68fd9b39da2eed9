//! Concurrent fan-out of store operations.

use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::cnf::MAX_CONCURRENCY;
use crate::err::Result;

/// Drives every future to completion, keeping at most
/// [`MAX_CONCURRENCY`] of them in flight at once.
///
/// Unlike `try_join_all`, a failure does not drop the remaining futures.
/// Every launched operation runs to completion and the first error to
/// complete is returned. Successful outputs are returned in completion
/// order.
pub async fn join_all_first_error<I, F, T>(futures: I) -> Result<Vec<T>>
where
	I: IntoIterator<Item = F>,
	F: Future<Output = Result<T>>,
{
	let futures: Vec<F> = futures.into_iter().collect();
	let results: Vec<Result<T>> =
		stream::iter(futures).buffer_unordered((*MAX_CONCURRENCY).max(1)).collect().await;
	let mut out = Vec::with_capacity(results.len());
	let mut first = None;
	for res in results {
		match res {
			Ok(v) => out.push(v),
			Err(e) => {
				if first.is_none() {
					first = Some(e);
				}
			}
		}
	}
	match first {
		Some(e) => Err(e),
		None => Ok(out),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use test_log::test;

	use super::*;
	use crate::err::Error;

	#[test(tokio::test)]
	async fn collects_all_outputs() {
		let mut out =
			join_all_first_error((0..10).map(|i| async move { Ok(i * 2) })).await.unwrap();
		out.sort();
		assert_eq!(out, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
	}

	#[test(tokio::test)]
	async fn siblings_complete_after_an_error() {
		let done = AtomicUsize::new(0);
		let res = join_all_first_error((0..8).map(|i| {
			let done = &done;
			async move {
				if i == 0 {
					return Err(Error::Ds("first".into()));
				}
				tokio::task::yield_now().await;
				if i == 5 {
					return Err(Error::Ds("second".into()));
				}
				done.fetch_add(1, Ordering::SeqCst);
				Ok(())
			}
		}))
		.await;
		let Err(Error::Ds(msg)) = res else {
			panic!("expected a datastore error")
		};
		assert_eq!(msg, "first");
		assert_eq!(done.load(Ordering::SeqCst), 6);
	}

	#[test(tokio::test)]
	async fn empty_input_succeeds() {
		let none: Vec<std::future::Ready<Result<()>>> = Vec::new();
		let out = join_all_first_error(none).await.unwrap();
		assert!(out.is_empty());
	}
}
