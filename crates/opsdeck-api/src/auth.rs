// Login and identity endpoints

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Identity, LoginRequest, LoginResponse};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// `POST /api/login` with `{"email", "password"}`. A `400` answer means
    /// the credentials were refused and maps to `Error::Authentication`.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<String, Error> {
        let url = self.api_url("login")?;
        debug!(email, "logging in");

        let body = LoginRequest {
            email: email.to_owned(),
            password: password.expose_secret().to_owned(),
        };

        match self.post::<LoginResponse>(url, &body).await {
            Ok(resp) => Ok(resp.token),
            Err(Error::Api {
                status: 400 | 401,
                message,
            }
            | Error::Unauthorized { message }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }

    /// Identity and enabled modules for a token.
    ///
    /// `GET /api/me` with `Authorization: Bearer <token>`.
    pub async fn me(&self, token: &str) -> Result<Identity, Error> {
        let url = self.api_url("me")?;
        debug!("fetching identity");
        self.get(url, Some(token)).await
    }
}
