//! Bulk Operation Coordinator
//!
//! Fan-out/fan-in over per-id requests: every request is issued together,
//! the caller reconciles only once all of them have settled.

use futures::future::join_all;
use serde::Serialize;
use std::future::Future;

/// Run `op` for every id concurrently; outcomes come back in input order
pub async fn fan_out<F, Fut, T>(ids: &[String], op: F) -> Vec<(String, T)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = T>,
{
    let pending = ids.iter().map(|id| {
        let fut = op(id.clone());
        let id = id.clone();
        async move { (id, fut.await) }
    });
    join_all(pending).await
}

/// A bulk item the backend did not confirm
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub id: String,
    pub reason: String,
}

/// Summary of a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    /// True when nothing failed
    pub success: bool,
    pub success_count: usize,
    pub failed_count: usize,
    pub deleted: Vec<String>,
    pub failed: Vec<FailedItem>,
    /// User-facing summary
    pub message: String,
}

impl BulkDeleteReport {
    pub fn from_outcomes(outcomes: Vec<(String, Result<(), String>)>) -> Self {
        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => deleted.push(id),
                Err(reason) => failed.push(FailedItem { id, reason }),
            }
        }

        let message = if failed.is_empty() {
            format!("Successfully deleted {} product(s)", deleted.len())
        } else {
            format!(
                "{} deleted successfully, {} failed",
                deleted.len(),
                failed.len()
            )
        };

        Self {
            success: failed.is_empty(),
            success_count: deleted.len(),
            failed_count: failed.len(),
            deleted,
            failed,
            message,
        }
    }

    /// Nothing requested, nothing to do
    pub fn empty() -> Self {
        Self::from_outcomes(Vec::new())
    }
}

/// Summary of a sequential bulk update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkUpdateReport<T> {
    pub success: bool,
    pub updated: Vec<T>,
    pub failed: Vec<FailedItem>,
    pub message: String,
}

impl<T> BulkUpdateReport<T> {
    pub fn new(updated: Vec<T>, failed: Vec<FailedItem>) -> Self {
        let success = failed.is_empty();
        let message = if success {
            "Products updated successfully!".to_string()
        } else {
            "Some products failed to update".to_string()
        };
        Self {
            success,
            updated,
            failed,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_runs_concurrently_in_input_order() {
        let ids: Vec<String> = ["slow", "fast", "mid"].iter().map(|s| s.to_string()).collect();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let started = tokio::time::Instant::now();
        let results = fan_out(&ids, |id| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                let ms = match id.as_str() {
                    "slow" => 300,
                    "mid" => 200,
                    _ => 100,
                };
                tokio::time::sleep(Duration::from_millis(ms)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                id.len()
            }
        })
        .await;

        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() < Duration::from_millis(600));
        let order: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["slow", "fast", "mid"]);
        assert_eq!(results[0].1, 4);
    }

    #[test]
    fn test_report_messages() {
        let all_ok = BulkDeleteReport::from_outcomes(vec![
            ("p1".into(), Ok(())),
            ("p2".into(), Ok(())),
        ]);
        assert!(all_ok.success);
        assert_eq!(all_ok.message, "Successfully deleted 2 product(s)");

        let mixed = BulkDeleteReport::from_outcomes(vec![
            ("p1".into(), Ok(())),
            ("bad-id".into(), Err("Product not found".into())),
            ("p2".into(), Ok(())),
        ]);
        assert!(!mixed.success);
        assert_eq!(mixed.success_count, 2);
        assert_eq!(mixed.failed_count, 1);
        assert_eq!(mixed.message, "2 deleted successfully, 1 failed");
        assert_eq!(mixed.failed[0].id, "bad-id");
    }

    #[test]
    fn test_empty_report_is_trivially_successful() {
        let report = BulkDeleteReport::empty();
        assert!(report.success);
        assert_eq!((report.success_count, report.failed_count), (0, 0));
    }
}
