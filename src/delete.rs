use futures::future;
use log::debug;

use crate::client::Cluster;
use crate::error::CurationError;

/// Deletes `names` in consecutive chunks of at most `batch_size` entries,
/// one remote call per chunk, all in flight at once. The join is
/// all-or-nothing: the first chunk failure fails the whole run and no
/// partial result is reported. On success the input list is handed back
/// unchanged for the report.
pub async fn delete_all<C: Cluster>(
    client: &C,
    names: Vec<String>,
    batch_size: usize,
) -> Result<Vec<String>, CurationError> {
    if names.is_empty() {
        return Ok(names);
    }

    let chunk_size = if batch_size == 0 {
        names.len()
    } else {
        batch_size
    };

    let chunks = names.chunks(chunk_size).collect::<Vec<_>>();
    debug!(
        "deleting {} indices in {} batches of up to {}",
        names.len(),
        chunks.len(),
        chunk_size
    );
    for chunk in &chunks {
        debug!("batch: {}", chunk.join(", "));
    }

    future::try_join_all(chunks.into_iter().map(|chunk| client.delete_indices(chunk))).await?;

    Ok(names)
}
