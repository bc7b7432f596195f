//! Per-record fan-out over a notification batch.

use tracing::{error, info, warn};

use vod_models::{Job, UploadEvent, UploadRecord};

use crate::launcher::TaskLauncher;

/// Outcome of one record in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub record_index: usize,
    pub error: Option<String>,
}

impl RecordOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Stateless fan-out from a notification batch to N task launches.
pub struct Dispatcher<L: TaskLauncher> {
    launcher: L,
}

impl<L: TaskLauncher> Dispatcher<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Process every record independently; one record's failure never
    /// blocks the rest of the batch.
    pub async fn dispatch(&self, event: &UploadEvent) -> Vec<RecordOutcome> {
        if event.records.is_empty() {
            warn!("No records found in upload event");
            return Vec::new();
        }

        info!("Processing {} upload event record(s)", event.records.len());

        let mut outcomes = Vec::with_capacity(event.records.len());
        for (index, record) in event.records.iter().enumerate() {
            outcomes.push(self.dispatch_record(record, index).await);
        }

        let succeeded = outcomes.iter().filter(|o| o.success()).count();
        let failed = outcomes.len() - succeeded;
        info!(
            "Processing complete: {} succeeded, {} failed",
            succeeded, failed
        );
        for outcome in outcomes.iter().filter(|o| !o.success()) {
            error!(
                "Record {} failed: {}",
                outcome.record_index,
                outcome.error.as_deref().unwrap_or("unknown")
            );
        }

        outcomes
    }

    async fn dispatch_record(&self, record: &UploadRecord, index: usize) -> RecordOutcome {
        let result = async {
            let input_key = record.decoded_key()?;
            let job = Job::from_input_key(input_key);

            info!(
                "Processing record {}: inputKey={}, outputKey={}",
                index, job.input_key, job.output_key
            );

            self.launcher.launch(&job).await?;
            Ok::<_, crate::error::DispatchError>(())
        }
        .await;

        RecordOutcome {
            record_index: index,
            error: result.err().map(|e| e.to_string()),
        }
    }
}
