//! HTTP transport with transparent bearer-token refresh.
//!
//! Every authenticated call in the crate funnels through
//! [`HttpTransport::request`], which injects the current `Authorization`
//! header and recovers from an expired token by re-authenticating and
//! retrying the request at most once. All other failures surface to the
//! caller with the response body attached.

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::types::{ApiFailure, AuthRequest, AuthResponse, BearerToken, Credentials};
use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

/// Body of an outgoing request.
///
/// Multipart bodies cannot be reused once sent, so the transport rebuilds
/// the payload for each attempt; the retry after a token refresh re-sends
/// identical content.
#[derive(Debug)]
pub(crate) enum Payload {
    /// No body (GET requests).
    None,
    /// JSON body.
    Json(serde_json::Value),
    /// Multipart upload of one file, associated with a task.
    FileUpload {
        task: String,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// Transport shared by all session operations.
///
/// Owns the HTTP client, the credentials and the current bearer token.
/// The token is replaced wholesale on refresh; it is never logged.
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
    token: RwLock<Option<BearerToken>>,
    /// Base API URL without trailing slash, e.g. `https://api.inkpress.io/v1`.
    base: String,
    /// Scheme used for worker URLs, inherited from the base URL.
    scheme: String,
}

impl HttpTransport {
    pub(crate) fn new(credentials: Credentials, config: SessionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        let base = config.base_url.as_str().trim_end_matches('/').to_string();
        let scheme = config.base_url.scheme().to_string();

        Ok(Self {
            client,
            credentials,
            token: RwLock::new(None),
            base,
            scheme,
        })
    }

    /// URL of an endpoint under the base API, e.g. `endpoint("start/compress")`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// URL of the versioned API on an assigned worker host.
    pub(crate) fn worker_url(&self, server: &str) -> String {
        format!("{}://{}/v1", self.scheme, server)
    }

    /// Exchange the public key for a fresh bearer token.
    ///
    /// Overwrites the stored token used by all subsequent requests. Called
    /// once when the session connects and again, transparently, whenever a
    /// request is rejected with an expired-token response.
    pub(crate) async fn authenticate(&self) -> Result<()> {
        let url = self.endpoint("auth");
        tracing::debug!("requesting bearer token from {}", url);

        let response = self
            .client
            .post(&url)
            .form(&AuthRequest {
                public_key: self.credentials.public_key(),
            })
            .send()
            .await
            .map_err(|e| Error::Auth(describe_request_error(&url, &e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "auth endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("invalid auth response: {}", e)))?;

        *self.token.write() = Some(BearerToken::new(auth.token));
        tracing::debug!("bearer token refreshed");

        Ok(())
    }

    /// Issue an authenticated request.
    ///
    /// On a non-2xx response the body is parsed as [`ApiFailure`]; an
    /// expired token (`status == 401`) triggers one re-authentication and
    /// one retry of the same request. A second consecutive rejection, or
    /// any other failure, surfaces with status and body.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        payload: &Payload,
    ) -> Result<reqwest::Response> {
        const MAX_AUTH_RETRIES: u32 = 1;

        let mut attempt = 0;
        loop {
            if self.token.read().is_none() {
                self.authenticate().await?;
            }
            let header = {
                let guard = self.token.read();
                // `authenticate` stores a token on success.
                match guard.as_ref() {
                    Some(token) => token.header_value(),
                    None => return Err(Error::Auth("no bearer token available".to_string())),
                }
            };

            tracing::trace!("{} {} (attempt {})", method, url, attempt + 1);

            let mut builder = self
                .client
                .request(method.clone(), url)
                .header(reqwest::header::AUTHORIZATION, header);
            builder = match payload {
                Payload::None => builder,
                Payload::Json(value) => builder.json(value),
                Payload::FileUpload {
                    task,
                    filename,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.clone()).file_name(filename.clone());
                    builder.multipart(Form::new().text("task", task.clone()).part("file", part))
                }
            };

            let response = builder.send().await.map_err(|e| Error::Transport {
                url: url.to_string(),
                message: describe_send_error(&e),
            })?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let failure: Option<ApiFailure> = serde_json::from_str(&body).ok();

            if failure.is_some_and(|f| f.status == 401) && attempt < MAX_AUTH_RETRIES {
                tracing::debug!("bearer token rejected for {}, requesting a new one", url);
                self.authenticate().await?;
                attempt += 1;
                continue;
            }

            return Err(Error::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base", &self.base)
            .field("authenticated", &self.token.read().is_some())
            .finish()
    }
}

fn describe_send_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else {
        error.to_string()
    }
}

fn describe_request_error(url: &str, error: &reqwest::Error) -> String {
    format!("request to {} failed: {}", url, describe_send_error(error))
}
