//! Error types for InkPress API operations.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for InkPress operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a task through the InkPress API.
///
/// Operation-scoped variants (`TaskStart`, `Upload`, `Process`, `Download`)
/// carry the context of the call that failed; the underlying transport
/// failure is preserved in their `message`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Credential exchange against the auth endpoint failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The API refused to create a task.
    #[error("failed to start {tool} task: {message}")]
    TaskStart {
        /// The tool the task was requested for.
        tool: String,
        /// Error detail from the transport layer.
        message: String,
    },

    /// A file could not be uploaded to the assigned worker.
    #[error("failed to upload {}: {message}", .path.display())]
    Upload {
        /// The local file that failed to upload.
        path: PathBuf,
        /// Error detail from the transport layer.
        message: String,
    },

    /// The worker refused to process the current task.
    #[error("processing failed for task {task}: {message}")]
    Process {
        /// The task id that failed.
        task: String,
        /// Error detail from the transport layer.
        message: String,
    },

    /// The processed result could not be retrieved.
    #[error("failed to download result for task {task}: {message}")]
    Download {
        /// The task id whose result was requested.
        task: String,
        /// Error detail from the transport layer.
        message: String,
    },

    /// The request could not be completed (connection, TLS, timeout).
    #[error("transport error for {url}: {message}")]
    Transport {
        /// The URL the request was issued against.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The server answered with a non-2xx status the client does not
    /// recover from. The response body is retained for diagnostics.
    #[error("server returned status {status} for {url}: {body}")]
    UnexpectedStatus {
        /// The URL the request was issued against.
        url: String,
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A lifecycle method was called out of order.
    #[error("invalid session state: {0}")]
    Precondition(String),

    /// A local file could not be read or written.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// The path that could not be accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The client was misconfigured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is a state-machine violation reported before any
    /// HTTP request was issued.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display_includes_url() {
        let err = Error::Transport {
            url: "https://api.example.com/v1/auth".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transport error for https://api.example.com/v1/auth: connection refused"
        );
    }

    #[test]
    fn unexpected_status_display_includes_body() {
        let err = Error::UnexpectedStatus {
            url: "https://worker1.example.com/v1/process".to_string(),
            status: 500,
            body: r#"{"status":500,"message":"worker overloaded"}"#.to_string(),
        };
        assert!(err.to_string().contains("worker overloaded"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn precondition_is_detectable() {
        let err = Error::Precondition("add_file requires a started task".to_string());
        assert!(err.is_precondition());
        assert!(!Error::Auth("nope".to_string()).is_precondition());
    }
}
