//! Fork-join substrate shared by the scheduler and batch fetches

use crate::error::{Error, Result};
use rayon::prelude::*;

/// Apply `f` to every item concurrently and join all results.
///
/// Each item gets its own worker unless `jobs` caps the pool. Results come
/// back in item order once every call has returned; nothing is cancelled.
/// A batch of zero or one item runs on the calling thread.
pub fn fan_out<T, R, F>(items: &[T], jobs: Option<usize>, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    let workers = jobs.unwrap_or(items.len()).clamp(1, items.len().max(1));

    if items.len() <= 1 || workers == 1 {
        return Ok(items.iter().map(f).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("levelexec-{i}"))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    Ok(pool.install(|| items.par_iter().map(&f).collect()))
}
