//! # Report Runner
//!
//! Drives a report through its lifecycle and tells listeners when it
//! is done.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   insert row ──► In Process ──► assemble ──► Generated (+ payload)      │
//! │                      │                                                  │
//! │                      └────────── error ───► Failed (status persisted,   │
//! │                                             error re-raised)            │
//! │                                                                         │
//! │   Completion notice sent exactly once on BOTH paths.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Regeneration races are accepted: each run writes its own row and the
//! status update is a single best-effort write.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use gstr_db::repository::reports::GenerationStatus;
use gstr_db::Database;

use crate::assembler::ReportAssembler;
use crate::config::ReportContext;
use crate::error::EngineResult;

/// Completion notice for one report run.
#[derive(Debug, Clone)]
pub struct GenerationNotice {
    pub report_id: String,
    pub status: GenerationStatus,
}

/// Runs report generation, synchronously or in the background.
pub struct ReportRunner {
    db: Arc<Database>,
    notify_tx: Option<mpsc::Sender<GenerationNotice>>,
}

impl ReportRunner {
    pub fn new(db: Arc<Database>) -> Self {
        ReportRunner {
            db,
            notify_tx: None,
        }
    }

    /// Registers a channel that receives one notice per run.
    pub fn with_notifications(mut self, tx: mpsc::Sender<GenerationNotice>) -> Self {
        self.notify_tx = Some(tx);
        self
    }

    /// Generates a report synchronously. Returns the report row id on
    /// success; on failure the row is marked Failed and the error is
    /// re-raised.
    pub async fn generate(&self, ctx: &ReportContext) -> EngineResult<String> {
        let report_id = self
            .db
            .reports()
            .insert_in_process(&ctx.company, &ctx.gstin, &ctx.ret_period())
            .await?;

        let result = self.assemble_and_store(&report_id, ctx).await;

        let status = match &result {
            Ok(()) => GenerationStatus::Generated,
            Err(err) => {
                error!(report_id = %report_id, %err, "Report generation failed");
                // best-effort status write; the original error wins
                if let Err(mark_err) = self.db.reports().mark_failed(&report_id).await {
                    error!(report_id = %report_id, %mark_err, "Could not persist Failed status");
                }
                GenerationStatus::Failed
            }
        };

        self.notify(&report_id, status).await;
        result.map(|()| report_id)
    }

    /// Spawns generation on the runtime and returns the task handle.
    pub fn spawn_generate(
        self: Arc<Self>,
        ctx: ReportContext,
    ) -> tokio::task::JoinHandle<EngineResult<String>> {
        info!(company = %ctx.company, ret_period = %ctx.ret_period(), "Queued background generation");
        tokio::spawn(async move { self.generate(&ctx).await })
    }

    async fn assemble_and_store(&self, report_id: &str, ctx: &ReportContext) -> EngineResult<()> {
        let assembled = ReportAssembler::new(&self.db, ctx).assemble().await?;

        let json_output = serde_json::to_string(&assembled.report)?;
        let missing_field_invoices = serde_json::to_string(&assembled.missing_field_invoices)?;

        self.db
            .reports()
            .mark_generated(report_id, &json_output, &missing_field_invoices)
            .await?;

        info!(report_id = %report_id, "Report generated");
        Ok(())
    }

    async fn notify(&self, report_id: &str, status: GenerationStatus) {
        if let Some(tx) = &self.notify_tx {
            let notice = GenerationNotice {
                report_id: report_id.to_string(),
                status,
            };
            // a closed receiver must not fail the run
            let _ = tx.send(notice).await;
        }
    }
}
