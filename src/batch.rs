//! Bounded-concurrency batch execution
//!
//! Items are split into contiguous chunks. Each chunk's handlers run
//! concurrently and the next chunk starts only after all of them finish.

use std::future::Future;

use futures::future::try_join_all;
use tracing::debug;

/// Runs `handler` over `items` in sequential batches of at most `batch_size`
///
/// The first handler error aborts the current batch: the other handlers in it
/// are dropped and no later batch is started. A `batch_size` of zero is
/// treated as one.
///
/// # Arguments
/// * `items` - Items to process, in order
/// * `batch_size` - Maximum number of handlers running at once
/// * `handler` - Called once per item
///
/// # Returns
/// * `Ok(())` once every handler has succeeded
/// * `Err(E)` with the first handler error
pub async fn run_batches<I, F, Fut, E>(items: I, batch_size: usize, handler: F) -> Result<(), E>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let batch_size = batch_size.max(1);
    let mut items = items.into_iter().peekable();
    let mut batch_num = 0;

    while items.peek().is_some() {
        batch_num += 1;
        let batch: Vec<Fut> = items.by_ref().take(batch_size).map(&handler).collect();
        debug!(batch = batch_num, size = batch.len(), "Starting batch");

        try_join_all(batch).await?;
    }

    Ok(())
}
