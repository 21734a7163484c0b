use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::core::billing_date;
use crate::core::Result;
use crate::modules::invoices::repositories::InvoiceRepository;

/// One invoice the sweep could not update; the operator can retry just these
#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub invoice_id: String,
    pub error: String,
}

/// Outcome of one penalty sweep run
#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    /// Invoices matching the sweep criteria at scan time
    pub scanned: usize,
    /// Invoices whose penalty landed this run
    pub updated: usize,
    pub failures: Vec<SweepFailure>,
}

/// Periodic sweep applying the late penalty to overdue unsettled invoices.
///
/// Eligibility is unsettled + strictly past due + zero penalty, checked in
/// the scan query and again in the UPDATE's WHERE clause, so repeated or
/// concurrent runs never compound a penalty and a payment that settles the
/// invoice mid-sweep turns the update into a no-op.
pub struct PenaltySweep {
    invoice_repo: InvoiceRepository,
    interval_secs: u64,
    timezone_offset_hours: i32,
}

impl PenaltySweep {
    pub fn new(
        invoice_repo: InvoiceRepository,
        interval_secs: u64,
        timezone_offset_hours: i32,
    ) -> Self {
        Self {
            invoice_repo,
            interval_secs,
            timezone_offset_hours,
        }
    }

    /// Start the background sweep loop.
    /// This should be spawned as a tokio task in main.rs
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting overdue-penalty sweep"
        );

        let mut ticker = interval(Duration::from_secs(self.interval_secs));

        loop {
            ticker.tick().await;

            match self.update_overdue_penalties().await {
                Ok(summary) => {
                    if summary.updated > 0 || !summary.failures.is_empty() {
                        info!(
                            scanned = summary.scanned,
                            updated = summary.updated,
                            failed = summary.failures.len(),
                            "Penalty sweep completed"
                        );
                    }
                }
                Err(e) => {
                    error!(error = %e, "Penalty sweep failed to scan");
                }
            }
        }
    }

    /// Apply the late penalty to every eligible invoice.
    ///
    /// Row failures are isolated: one bad invoice does not abort the sweep,
    /// and already-updated invoices are never rolled back.
    pub async fn update_overdue_penalties(&self) -> Result<SweepSummary> {
        let today = billing_date::billing_today(self.timezone_offset_hours);
        let invoices = self.invoice_repo.find_due_for_penalty(today).await?;

        let mut summary = SweepSummary {
            scanned: invoices.len(),
            updated: 0,
            failures: Vec::new(),
        };

        for mut invoice in invoices {
            let invoice_id = invoice.id.clone().unwrap_or_default();

            if !invoice.apply_late_penalty() {
                continue;
            }

            match self.invoice_repo.apply_late_penalty(&invoice).await {
                Ok(true) => {
                    summary.updated += 1;
                    info!(
                        invoice_id = invoice_id,
                        penalty_total = %invoice.penalty_total,
                        net_amount = %invoice.net_amount,
                        "Applied late penalty"
                    );
                }
                Ok(false) => {
                    // Lost the race to a payment or a concurrent sweep; the
                    // guard made this a no-op
                }
                Err(e) => {
                    warn!(
                        invoice_id = invoice_id,
                        error = %e,
                        "Failed to apply late penalty, continuing sweep"
                    );
                    summary.failures.push(SweepFailure {
                        invoice_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }
}
