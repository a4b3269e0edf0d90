pub mod backup;
pub mod clock;
pub mod config;
pub mod export;
pub mod init;
pub mod status;
pub mod timesheet;

use crate::errors::AppResult;
use crate::store::SharedStore;

/// Make sure the last mutation reached the disk and the mirror before a
/// one-shot command exits.
pub(crate) async fn finish(store: &SharedStore) -> AppResult<()> {
    store.ensure_flushed()?;
    store.settle().await;
    Ok(())
}
