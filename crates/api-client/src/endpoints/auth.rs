use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use dental_types::{Acknowledgement, Credentials, LoginResponse, PasswordChange, User};
use serde::Deserialize;

/// `/auth` endpoints.
#[derive(Clone, Copy, Debug)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

/// Body of `GET /auth/verify`: either `{"usuario": {...}}` or the user object itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerifyResponse {
    Wrapped {
        #[serde(rename = "usuario", alias = "user")]
        user: User,
    },
    Bare(User),
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`. On success the returned token becomes the session token.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        let request = ApiRequest::post(&["auth", "login"]).json(credentials)?;
        let response: LoginResponse = self.client.send(request).await?;
        self.client.session().set_token(&response.token)?;
        tracing::info!("signed in as {}", credentials.username);
        Ok(response)
    }

    /// `GET /auth/verify`: the user the current token belongs to.
    pub async fn verify(&self) -> ClientResult<User> {
        let response: VerifyResponse = self
            .client
            .send(ApiRequest::get(&["auth", "verify"]))
            .await?;
        Ok(match response {
            VerifyResponse::Wrapped { user } | VerifyResponse::Bare(user) => user,
        })
    }

    /// `PUT /auth/change-password` for the signed-in user.
    pub async fn change_password(&self, change: &PasswordChange) -> ClientResult<Acknowledgement> {
        let request = ApiRequest::put(&["auth", "change-password"]).json(change)?;
        self.client.send(request).await
    }

    /// Forget the local token. No request is made.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.session().clear()?;
        Ok(())
    }
}
