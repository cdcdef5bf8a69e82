// Dashboard API HTTP client
//
// Wraps `reqwest::Client` with URL construction, bearer-token injection and
// `{error}` body decoding. Endpoint methods live in `auth.rs` and
// `resources.rs` as inherent impls so this module stays focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the dashboard API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://127.0.0.1:4000`); every
    /// endpoint lives under `/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: TransportConfig::default().timeout.as_secs(),
        }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request, optionally authenticated with a bearer token.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&str>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let mut req = self.http.get(url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Decode a success body as `T`, or turn a failing status into
    /// `Error::Unauthorized` / `Error::Api` carrying the server's message.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
                |_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                },
                |b| b.error,
            );
            debug!(status = status.as_u16(), %message, "request failed");
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(Error::Unauthorized { message });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_url_tolerates_trailing_slashes() {
        let base = Url::parse("http://localhost:4000/").unwrap();
        let client = ApiClient::with_client(reqwest::Client::new(), base);
        assert_eq!(
            client.api_url("/users").unwrap().as_str(),
            "http://localhost:4000/api/users"
        );
    }

    #[test]
    fn api_url_keeps_base_path_prefix() {
        let base = Url::parse("http://localhost:4000/dash").unwrap();
        let client = ApiClient::with_client(reqwest::Client::new(), base);
        assert_eq!(
            client.api_url("scheduler/cron-jobs").unwrap().as_str(),
            "http://localhost:4000/dash/api/scheduler/cron-jobs"
        );
    }
}
