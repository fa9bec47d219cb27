use super::date_segment;
use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use chrono::NaiveDate;
use dental_types::{
    Acknowledgement, Appointment, AppointmentDraft, AppointmentStatus, AvailableHours, RecordId,
    StatusUpdate,
};

/// `/citas` endpoints.
#[derive(Clone, Copy, Debug)]
pub struct AppointmentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AppointmentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Appointments for the backend's current day.
    pub async fn today(&self) -> ClientResult<Vec<Appointment>> {
        self.client.send(ApiRequest::get(&["citas", "hoy"])).await
    }

    pub async fn by_date(&self, date: NaiveDate) -> ClientResult<Vec<Appointment>> {
        self.client
            .send(ApiRequest::get(&["citas", "fecha", &date_segment(date)]))
            .await
    }

    /// Free start times for `doctor_id` on `date`.
    pub async fn available(
        &self,
        doctor_id: RecordId,
        date: NaiveDate,
    ) -> ClientResult<AvailableHours> {
        let request = ApiRequest::get(&[
            "citas",
            "disponibles",
            &doctor_id.to_string(),
            &date_segment(date),
        ]);
        self.client.send(request).await
    }

    pub async fn create(&self, appointment: &AppointmentDraft) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::post(&["citas"]).json(appointment)?;
        self.client.send(request).await
    }

    /// `PUT /citas/{id}/estado`; `notes` is only sent when given.
    pub async fn update_status(
        &self,
        id: RecordId,
        status: AppointmentStatus,
        notes: Option<&str>,
    ) -> ClientResult<Acknowledgement> {
        let update = StatusUpdate {
            status,
            notes: notes.map(str::to_owned),
        };
        let request = ApiRequest::put(&["citas", &id.to_string(), "estado"]).json(&update)?;
        self.client.send(request).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<Acknowledgement> {
        self.client
            .send(ApiRequest::delete(&["citas", &id.to_string()]))
            .await
    }
}
