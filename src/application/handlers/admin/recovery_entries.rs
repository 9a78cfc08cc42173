//! ListRecoveryEntriesHandler - Payments awaiting manual replay.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::ports::{RecoveryEntry, RecoveryLog};

pub struct ListRecoveryEntriesHandler {
    log: Arc<dyn RecoveryLog>,
}

impl ListRecoveryEntriesHandler {
    pub fn new(log: Arc<dyn RecoveryLog>) -> Self {
        Self { log }
    }

    /// Every entry, newest first.
    pub async fn handle(&self) -> Result<Vec<RecoveryEntry>, BookingError> {
        let mut entries = self.log.entries().await?;
        entries.reverse();
        Ok(entries)
    }
}
