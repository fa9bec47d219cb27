use super::path_term;
use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use dental_types::{Acknowledgement, ClinicalHistoryEntry, RecordId};

/// `/historial` endpoints (clinical history).
#[derive(Clone, Copy, Debug)]
pub struct HistoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> HistoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn by_patient(
        &self,
        patient_id: RecordId,
    ) -> ClientResult<Vec<ClinicalHistoryEntry>> {
        self.client
            .send(ApiRequest::get(&["historial", "paciente", &patient_id.to_string()]))
            .await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<ClinicalHistoryEntry> {
        self.client
            .send(ApiRequest::get(&["historial", &id.to_string()]))
            .await
    }

    /// `GET /historial/buscar/{termino}`; the term is percent-encoded as a path segment.
    ///
    /// An empty term is rejected without contacting the backend.
    pub async fn search(&self, term: &str) -> ClientResult<Vec<ClinicalHistoryEntry>> {
        let term = path_term(term, "clinical history search term")?;
        self.client
            .send(ApiRequest::get(&["historial", "buscar", term]))
            .await
    }

    pub async fn create(&self, entry: &ClinicalHistoryEntry) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::post(&["historial"]).json(entry)?;
        self.client.send(request).await
    }

    pub async fn update(
        &self,
        id: RecordId,
        entry: &ClinicalHistoryEntry,
    ) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::put(&["historial", &id.to_string()]).json(entry)?;
        self.client.send(request).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<Acknowledgement> {
        self.client
            .send(ApiRequest::delete(&["historial", &id.to_string()]))
            .await
    }
}
