use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    errors::PollError,
    notifier::Notifier,
    review::HomeworkApi,
    status::parse_status,
    validation::{check_response, current_date},
};

/// What a single polling cycle ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was announced
    Notified(String),
    /// The review service reported nothing new
    Unchanged,
    /// The cycle failed and the failure was reported to the chat
    Reported(String),
}

/// Polls the review service and relays status changes to the chat
pub struct StatusBot {
    api: Arc<dyn HomeworkApi>,
    notifier: Notifier,
    retry_time: Duration,
    advance_cursor: bool,
    timestamp: i64,
}

impl StatusBot {
    pub fn new(api: impl HomeworkApi + 'static, notifier: Notifier, retry_time: Duration) -> Self {
        Self {
            api: Arc::new(api),
            notifier,
            retry_time,
            advance_cursor: true,
            timestamp: 0,
        }
    }

    /// Initial `from_date` sent to the review service
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Keep the cursor at its initial value when `false`
    pub fn with_advance_cursor(mut self, advance_cursor: bool) -> Self {
        self.advance_cursor = advance_cursor;
        self
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Fetch, validate and format once.
    ///
    /// Returns `None` when no homework changed since the cursor.
    pub async fn poll(&mut self) -> Result<Option<String>, PollError> {
        let response = self.api.fetch(self.timestamp).await?;
        let homeworks = check_response(&response)?;

        // The service lists the most recently updated homework first
        let message = homeworks.first().map(parse_status).transpose()?;

        // Only a fully processed response moves the cursor
        if self.advance_cursor {
            match current_date(&response) {
                Some(date) => self.timestamp = date,
                None => warn!("`current_date` is not an integer timestamp, cursor not advanced"),
            }
        }

        Ok(message)
    }

    /// Runs one cycle and sends its result to the chat
    #[instrument(name = "Polling cycle", skip(self), fields(from_date = self.timestamp))]
    pub async fn cycle(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok(Some(message)) => CycleOutcome::Notified(self.notifier.notify(&message).await),
            Ok(None) => {
                debug!("No new homework statuses");
                CycleOutcome::Unchanged
            }
            Err(e) => {
                error!("Polling cycle failed: {e}");
                CycleOutcome::Reported(self.notifier.notify(&e.report()).await)
            }
        }
    }

    /// Polls forever, sleeping the same interval after every cycle
    pub async fn run(mut self) {
        info!(
            "Starting homework status polling every {}s",
            self.retry_time.as_secs()
        );
        loop {
            self.cycle().await;
            sleep(self.retry_time).await;
        }
    }
}
