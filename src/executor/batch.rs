//! Batched ID Processor
//!
//! Storage backends cap the number of bound parameters in one statement, so
//! every `IN (...)` query over a candidate ID list is issued chunk by chunk.
//! Chunks run strictly one after another and results are concatenated in
//! chunk order.

use std::future::Future;

/// Default number of IDs bound in one `IN (...)` list
pub const DEFAULT_ID_BATCH_SIZE: usize = 10_000;

/// Invoke `consumer` once per chunk of `ids` and concatenate the results.
///
/// A `chunk_size` of zero is treated as one. The first failing chunk aborts
/// the whole call; no partial result is returned.
pub async fn process_in_chunks<'a, T, E, F, Fut>(
    ids: &'a [i64],
    chunk_size: usize,
    mut consumer: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(&'a [i64]) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut out = Vec::new();
    for chunk in ids.chunks(chunk_size.max(1)) {
        out.extend(consumer(chunk).await?);
    }
    Ok(out)
}

/// Number of chunks `process_in_chunks` issues for `len` IDs
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}
