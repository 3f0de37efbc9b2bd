//! Batch fetch engine
//!
//! Splits large identifier lists into fixed-size batches and runs the batch
//! downloads through a bounded concurrent pool. A batch that fails (after
//! the HTTP layer's own retries) contributes no records; everything else is
//! merged into one unordered accumulator.

use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::warn;

use crate::progress;

/// Split `ids` into consecutive batches of at most `batch_size` elements.
///
/// The union of all batches equals the input, order preserved, and the batch
/// count is `ceil(len / batch_size)`.
pub fn partition<T: Clone>(ids: &[T], batch_size: usize) -> Vec<Vec<T>> {
    if batch_size == 0 {
        return Vec::new();
    }
    ids.chunks(batch_size).map(<[T]>::to_vec).collect()
}

/// Fetch all batches through a pool of at most `pool_size` concurrent
/// workers, reporting completed-batch progress.
///
/// `fetch` receives each batch together with its index and returns the
/// records it produced; a failing batch is logged and yields nothing. No
/// ordering guarantee is made for the aggregated result.
pub async fn fetch_batches<T, R, F, Fut>(
    batches: Vec<Vec<T>>,
    pool_size: usize,
    label: &str,
    fetch: F,
) -> Vec<R>
where
    F: Fn(Vec<T>, usize) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<R>>>,
{
    let total = batches.len();
    if total == 0 {
        return Vec::new();
    }

    let bar = progress::batch_progress(total as u64, label);
    let fetch = &fetch;

    let results: Vec<Vec<R>> = stream::iter(batches.into_iter().enumerate())
        .map(|(index, batch)| {
            let bar = bar.clone();
            async move {
                let records = match fetch(batch, index).await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!(
                            batch = index,
                            error = %e,
                            "Batch failed after retries, contributing no records"
                        );
                        Vec::new()
                    },
                };
                bar.inc(1);
                records
            }
        })
        .buffer_unordered(pool_size.max(1))
        .collect()
        .await;

    bar.finish_and_clear();

    results.into_iter().flatten().collect()
}
