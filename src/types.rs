//! Session and wire types for the InkPress API.
//!
//! The request/response payloads here mirror the JSON bodies the service
//! exchanges; everything else is client-side session state.

use serde::{Deserialize, Serialize};

/// API credentials issued when registering a project.
///
/// The secret key is stored but not transmitted during the bearer-token
/// exchange; it is reserved for signed-request support.
#[derive(Clone)]
pub struct Credentials {
    public_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create credentials from a public/secret key pair.
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The project's public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The project's secret key.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Short-lived bearer token obtained from the auth endpoint.
///
/// Owned by the session and replaced wholesale whenever the server reports
/// it as expired.
#[derive(Clone)]
pub struct BearerToken {
    value: String,
}

impl BearerToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Render the `Authorization` header value for this token.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// A server-side unit of work, bound to the worker host that was assigned
/// when the task was started.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task id issued by the API.
    pub id: String,
    /// The tool this task runs (e.g. "compress", "merge").
    pub tool: String,
    /// Hostname of the worker assigned to this task.
    pub server: String,
}

/// Record of one file uploaded to the current task's worker.
///
/// Serialized verbatim into the process request's `files` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name assigned by the worker on upload.
    pub server_filename: String,
    /// The local path the file was read from.
    pub filename: String,
}

/// Extra tool-specific parameters merged into the process request body.
///
/// # Examples
///
/// ```rust
/// use inkpress::ProcessOptions;
///
/// let options = ProcessOptions::new()
///     .set("compression_level", "extreme")
///     .set("ignore_errors", true);
/// assert!(!options.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessOptions {
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl ProcessOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to send alongside the task, tool and file list.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether any parameters have been set.
    pub fn is_empty(&self) -> bool {
        self.extra.is_empty()
    }
}

/// Body of the bearer-token request.
#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub public_key: &'a str,
}

/// Response of the auth endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
}

/// Response of `GET /start/{tool}`.
#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    pub server: String,
    pub task: String,
}

/// Response of the worker's upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub server_filename: String,
}

/// Body of the worker's process endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ProcessRequest<'a> {
    pub task: &'a str,
    pub tool: &'a str,
    pub files: &'a [UploadedFile],
    #[serde(flatten)]
    pub options: &'a ProcessOptions,
}

/// Error body the API attaches to non-2xx responses.
///
/// Parsed explicitly so the transport layer can distinguish an expired
/// token (`status == 401`) from any other failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiFailure {
    pub status: u16,
    #[serde(default)]
    #[allow(dead_code)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bearer_token_header_value() {
        let token = BearerToken::new("abc123");
        assert_eq!(token.header_value(), "Bearer abc123");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let credentials = Credentials::new("pub-key", "secret-key");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("pub-key"));
        assert!(!rendered.contains("secret-key"));

        let token = BearerToken::new("top-secret");
        assert!(!format!("{:?}", token).contains("top-secret"));
    }

    #[test]
    fn uploaded_file_wire_format() {
        let file = UploadedFile {
            server_filename: "srv-1.pdf".to_string(),
            filename: "report.pdf".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({"server_filename": "srv-1.pdf", "filename": "report.pdf"})
        );
    }

    #[test]
    fn process_request_flattens_options() {
        let files = vec![UploadedFile {
            server_filename: "srv-1.pdf".to_string(),
            filename: "report.pdf".to_string(),
        }];
        let options = ProcessOptions::new().set("compression_level", "low");
        let request = ProcessRequest {
            task: "task-1",
            tool: "compress",
            files: &files,
            options: &options,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["task"], "task-1");
        assert_eq!(value["tool"], "compress");
        assert_eq!(value["files"][0]["server_filename"], "srv-1.pdf");
        assert_eq!(value["compression_level"], "low");
    }

    #[test]
    fn api_failure_parses_with_and_without_message() {
        let failure: ApiFailure =
            serde_json::from_str(r#"{"status":401,"message":"token expired"}"#).unwrap();
        assert_eq!(failure.status, 401);
        assert_eq!(failure.message, "token expired");

        let bare: ApiFailure = serde_json::from_str(r#"{"status":500}"#).unwrap();
        assert_eq!(bare.status, 500);
        assert!(bare.message.is_empty());
    }
}
