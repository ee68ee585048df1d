//! Patient Context Enrichment
//!
//! Before a prompt goes to the generative backend, the gateway may enrich it
//! with a short text block describing the patient the conversation is about.
//! The block is rebuilt from the records backend on every turn; nothing is
//! cached across turns.

use crate::records::{PatientRecord, RecordsClient, RecordsError};
use std::sync::Arc;
use tracing::info;

/// Builds per-turn context blocks from the records backend.
pub struct ContextEnricher {
    records: Arc<dyn RecordsClient>,
}

impl ContextEnricher {
    pub fn new(records: Arc<dyn RecordsClient>) -> Self {
        Self { records }
    }

    /// Fetches and renders the context block for `patient_id`.
    ///
    /// Returns `Ok(None)` when no id was supplied (no backend call is made)
    /// or when the backend has no record for the id. A backend fault is
    /// returned to the caller, which decides whether to fail the turn or
    /// degrade to an unenriched prompt.
    pub async fn enrich(&self, patient_id: Option<&str>) -> Result<Option<String>, RecordsError> {
        let Some(patient_id) = patient_id else {
            return Ok(None);
        };

        match self.records.get_patient(patient_id).await? {
            Some(record) => Ok(Some(render_context(&record))),
            None => {
                // A miss is an expected outcome, not a fault.
                info!(patient_id, "No record found for patient; skipping enrichment");
                Ok(None)
            }
        }
    }
}

/// Renders a record into the fixed context template.
///
/// The appointments line is included only when the record carries one.
fn render_context(record: &PatientRecord) -> String {
    let mut context = format!("Patient name: {}", record.name);
    if let Some(appointments) = &record.upcoming_appointments {
        context.push_str(&format!("\nUpcoming appointments: {}", appointments));
    }
    context
}
