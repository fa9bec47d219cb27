use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use dental_types::{Acknowledgement, Patient, PatientIdentificationRecord, RecordId};

/// `/pacientes` endpoints.
#[derive(Clone, Copy, Debug)]
pub struct PatientsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PatientsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<Patient>> {
        self.client.send(ApiRequest::get(&["pacientes"])).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Patient> {
        self.client
            .send(ApiRequest::get(&["pacientes", &id.to_string()]))
            .await
    }

    /// `GET /pacientes/buscar?q={query}`; the query is sent exactly as given.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Patient>> {
        let request = ApiRequest::get(&["pacientes", "buscar"]).query("q", query);
        self.client.send(request).await
    }

    pub async fn create(
        &self,
        identification: &PatientIdentificationRecord,
    ) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::post(&["pacientes"]).json(identification)?;
        self.client.send(request).await
    }

    pub async fn update(
        &self,
        id: RecordId,
        identification: &PatientIdentificationRecord,
    ) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::put(&["pacientes", &id.to_string()]).json(identification)?;
        self.client.send(request).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<Acknowledgement> {
        self.client
            .send(ApiRequest::delete(&["pacientes", &id.to_string()]))
            .await
    }
}
