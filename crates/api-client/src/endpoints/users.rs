use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use dental_types::{Acknowledgement, RecordId, User, UserDraft};
use serde_json::json;

/// `/usuarios` endpoints.
#[derive(Clone, Copy, Debug)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<User>> {
        self.client.send(ApiRequest::get(&["usuarios"])).await
    }

    /// Staff accounts with the doctor role.
    pub async fn doctors(&self) -> ClientResult<Vec<User>> {
        self.client.send(ApiRequest::get(&["usuarios", "doctores"])).await
    }

    pub async fn create(&self, user: &UserDraft) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::post(&["usuarios"]).json(user)?;
        self.client.send(request).await
    }

    pub async fn update(&self, id: RecordId, user: &User) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::put(&["usuarios", &id.to_string()]).json(user)?;
        self.client.send(request).await
    }

    /// `PUT /usuarios/{id}/reset-password` with the new password in the body.
    pub async fn reset_password(
        &self,
        id: RecordId,
        new_password: &str,
    ) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::put(&["usuarios", &id.to_string(), "reset-password"])
            .json(&json!({ "password": new_password }))?;
        self.client.send(request).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<Acknowledgement> {
        self.client
            .send(ApiRequest::delete(&["usuarios", &id.to_string()]))
            .await
    }
}
