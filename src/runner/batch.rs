//! Run every catalog entry once, in id order

use std::time::{Duration, Instant};

use crate::catalog::CatalogEntry;
use crate::runner::Runner;

/// Result of one entry within a batch
#[derive(Clone, Debug, PartialEq)]
pub enum BatchOutcome {
    /// The request went out and a response came back, whatever its status
    Completed {
        id: u32,
        status: u16,
        elapsed: Duration,
    },
    /// Credential, executor or transport failure
    Failed { id: u32, message: String },
}

impl BatchOutcome {
    pub fn id(&self) -> u32 {
        match self {
            BatchOutcome::Completed { id, .. } | BatchOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Completed { status, .. } if (200..300).contains(status))
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            BatchOutcome::Completed { elapsed, .. } => *elapsed,
            BatchOutcome::Failed { .. } => Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    /// Sum of the per-request response times
    pub total_elapsed: Duration,
    /// Wall-clock time of the whole batch
    pub wall_time: Duration,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// Share of successful requests, in percent
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.success_count() as f64 / self.len() as f64 * 100.0
    }
}

/// Reported before each entry is sent
#[derive(Clone, Copy, Debug)]
pub struct BatchProgress {
    /// 1-based position of `entry` in the run
    pub position: usize,
    pub total: usize,
    pub entry: &'static CatalogEntry,
}

impl Runner {
    /// Send every entry's example request; failures are recorded, never fatal
    pub async fn run_all<F>(&mut self, mut on_progress: F) -> BatchReport
    where
        F: FnMut(BatchProgress),
    {
        let started = Instant::now();
        let entries: Vec<&'static CatalogEntry> = self.catalog().iter().collect();
        let total = entries.len();
        let mut report = BatchReport::default();

        for (idx, entry) in entries.into_iter().enumerate() {
            on_progress(BatchProgress {
                position: idx + 1,
                total,
                entry,
            });

            let outcome = match self.run_executor(entry.id).await {
                Ok(result) => BatchOutcome::Completed {
                    id: entry.id,
                    status: result.status,
                    elapsed: result.elapsed,
                },
                Err(e) => {
                    tracing::warn!(id = entry.id, error = %e, "Batch request failed");
                    BatchOutcome::Failed {
                        id: entry.id,
                        message: e.to_string(),
                    }
                }
            };
            report.total_elapsed += outcome.elapsed();
            report.outcomes.push(outcome);
        }

        report.wall_time = started.elapsed();
        tracing::info!(
            total,
            succeeded = report.success_count(),
            failed = report.error_count(),
            "Batch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Settings;
    use crate::runner::testing::{no_credentials, FakeTransport, StaticKey};

    fn runner(transport: &FakeTransport) -> Runner {
        Runner::new(
            Catalog::new(),
            Box::new(StaticKey("batch-key")),
            Box::new(transport.clone()),
            Settings::default(),
        )
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_stop_the_batch() {
        let transport = FakeTransport::ok("{}").failing_on(&["/payers", "/payers/csv", "/export/pdf"]);
        let mut runner = runner(&transport);

        let report = runner.run_all(|_| {}).await;

        assert_eq!(report.len(), 21);
        let failed: Vec<u32> = report
            .outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Failed { .. }))
            .map(BatchOutcome::id)
            .collect();
        assert_eq!(failed, vec![14, 19, 20]);
        assert_eq!(report.success_count(), 18);
        assert_eq!(report.error_count(), 3);
        assert_eq!(transport.sent_count(), 21);
        assert_eq!(runner.result_count(), 18);
    }

    #[tokio::test]
    async fn test_batch_ignores_edits_and_keeps_order() {
        let transport = FakeTransport::ok("{}");
        let mut runner = runner(&transport);
        runner.edit_payload(7, r#"{"x12": "edited"}"#).unwrap();

        let mut seen = Vec::new();
        let report = runner.run_all(|p| seen.push((p.position, p.entry.id))).await;

        assert_eq!(seen.first(), Some(&(1, 1)));
        assert_eq!(seen.last(), Some(&(21, 21)));
        let ids: Vec<u32> = report.outcomes.iter().map(BatchOutcome::id).collect();
        assert_eq!(ids, (1..=21).collect::<Vec<_>>());

        let sent = transport.sent.borrow();
        assert_eq!(sent[6].body, Some(serde_json::json!({"x12": "example"})));
    }

    #[tokio::test]
    async fn test_http_errors_count_as_errors() {
        let mut transport = FakeTransport::ok("{}");
        transport.status = 401;
        let mut runner = runner(&transport);

        let report = runner.run_all(|_| {}).await;
        assert_eq!(report.success_count(), 0);
        assert_eq!(report.error_count(), 21);
        assert!(report
            .outcomes
            .iter()
            .all(|o| matches!(o, BatchOutcome::Completed { status: 401, .. })));
        assert_eq!(report.total_elapsed, Duration::from_millis(5 * 21));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_every_entry() {
        let transport = FakeTransport::ok("{}");
        let mut runner = Runner::new(
            Catalog::new(),
            Box::new(no_credentials()),
            Box::new(transport.clone()),
            Settings::default(),
        );

        let report = runner.run_all(|_| {}).await;
        assert_eq!(report.len(), 21);
        assert_eq!(report.error_count(), 21);
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(report.success_rate(), 0.0);
    }
}
