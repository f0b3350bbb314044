//! Model cache inspection
//!
//! The cache is populated when the image is built. The gateway never reads
//! the models; it only counts entries to answer health and readiness checks.
//! Any entry counts, no validation of what it contains.

use std::path::Path;

use tracing::debug;

/// Count entries in the model cache directory
///
/// A missing or unreadable directory counts as empty.
pub async fn count_cached_models(dir: &Path) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), "Model cache not readable: {}", e);
            return 0;
        }
    };

    let mut count = 0;
    loop {
        match entries.next_entry().await {
            Ok(Some(_)) => count += 1,
            Ok(None) => break,
            Err(e) => {
                debug!(dir = %dir.display(), "Stopped scanning model cache: {}", e);
                break;
            }
        }
    }
    count
}
