//! Patient Records Backend Client
//!
//! The records backend is the hospital's system-of-record. This core only
//! ever performs a pure lookup against it: given a patient id, fetch the
//! record or learn that none exists. A missing record is a normal outcome
//! (`Ok(None)`), never an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors from the records backend.
///
/// Only genuine backend faults land here; "patient not found" is expressed
/// as `Ok(None)` by `RecordsClient::get_patient`.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("records backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("records backend returned unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// A single patient record as served by the records backend.
///
/// `name` is the only field guaranteed to be present; everything else
/// degrades gracefully when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_appointments: Option<String>,
}

/// A client capable of looking up patient records by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsClient: Send + Sync {
    /// Fetches the record for `patient_id`, or `None` if the backend has
    /// no record under that id.
    async fn get_patient(&self, patient_id: &str) -> Result<Option<PatientRecord>, RecordsError>;
}

/// An implementation of `RecordsClient` backed by an HTTP records service.
pub struct HttpRecordsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordsClient {
    /// Creates a client for a records service rooted at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RecordsClient for HttpRecordsClient {
    async fn get_patient(&self, patient_id: &str) -> Result<Option<PatientRecord>, RecordsError> {
        let url = format!("{}/patients/{}", self.base_url, patient_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RecordsError::UnexpectedStatus(response.status().as_u16()));
        }

        let record = response.json::<PatientRecord>().await?;
        Ok(Some(record))
    }
}

/// An in-memory `RecordsClient` for development and integration testing.
///
/// Seeded with a small, fixed patient set so the service can run end-to-end
/// without a real hospital management system behind it.
pub struct InMemoryRecordsClient {
    patients: HashMap<String, PatientRecord>,
}

impl InMemoryRecordsClient {
    /// Creates an empty in-memory records store.
    pub fn new() -> Self {
        Self {
            patients: HashMap::new(),
        }
    }

    /// Creates a store seeded with the demonstration patient set.
    pub fn with_demo_data() -> Self {
        let mut patients = HashMap::new();
        patients.insert(
            "P12345".to_string(),
            PatientRecord {
                name: "John Doe".to_string(),
                age: Some(45),
                upcoming_appointments: Some(
                    "Dr. Smith, Cardiology, June 15, 2023, 10:00 AM".to_string(),
                ),
            },
        );
        patients.insert(
            "P67890".to_string(),
            PatientRecord {
                name: "Jane Smith".to_string(),
                age: Some(35),
                upcoming_appointments: Some(
                    "Dr. Johnson, Neurology, June 18, 2023, 2:30 PM".to_string(),
                ),
            },
        );
        Self { patients }
    }

    /// Inserts or replaces a record under `patient_id`.
    pub fn insert(&mut self, patient_id: impl Into<String>, record: PatientRecord) {
        self.patients.insert(patient_id.into(), record);
    }
}

impl Default for InMemoryRecordsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordsClient for InMemoryRecordsClient {
    async fn get_patient(&self, patient_id: &str) -> Result<Option<PatientRecord>, RecordsError> {
        Ok(self.patients.get(patient_id).cloned())
    }
}
