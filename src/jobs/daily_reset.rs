use std::sync::Arc;

use anyhow::Context;
use futures::future::BoxFuture;
use tracing::info;

use crate::clock::Clock;
use crate::scheduler::Job;
use crate::store::AttendanceStore;

/// Clears every record that is not dated today, starting a fresh attendance day.
pub struct DailyReset {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
}

impl DailyReset {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl Job for DailyReset {
    fn name(&self) -> &'static str {
        "daily-attendance-reset"
    }

    fn run(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let today = self.clock.today();
            let removed = self
                .store
                .delete_except_date(today)
                .await
                .context("failed to purge previous days")?;

            info!(removed, %today, "Attendance reset for a new day");
            Ok(())
        })
    }
}
