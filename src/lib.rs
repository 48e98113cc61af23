//! Rust client SDK for the InkPress document-processing API.
//!
//! All document processing happens server-side; this crate handles the
//! session plumbing: credential exchange, task lifecycle orchestration and
//! the transparent bearer-token refresh that wraps every HTTP call.
//!
//! # Overview
//!
//! A [`TaskSession`] drives one remote task at a time through a fixed
//! lifecycle:
//!
//! ```text
//! connect ─▶ start_task ─▶ add_file* ─▶ process ─▶ download
//! ```
//!
//! Connecting exchanges the project's public key for a bearer token. When
//! the server later rejects that token as expired, the session obtains a
//! fresh one and retries the failed request once — callers never see the
//! refresh. Starting a task assigns it to a worker host; uploads,
//! processing and the result download all go to that worker.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use inkpress::{Credentials, TaskSession};
//!
//! #[tokio::main]
//! async fn main() -> inkpress::Result<()> {
//!     let credentials = Credentials::new("project_public_xxx", "secret_key_xxx");
//!     let mut session = TaskSession::connect(credentials).await?;
//!
//!     // One call: start a compress task, upload, process, download.
//!     let output = session.compress("report.pdf").await?;
//!     println!("written to {}", output.display());
//!
//!     // Or drive the lifecycle step by step.
//!     session.start_task("merge").await?;
//!     session.add_file("cover.pdf").await?;
//!     session.add_file("body.pdf").await?;
//!     session.process().await?;
//!     session.download("book.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`]. Lifecycle violations
//! (uploading before starting a task, processing with no files) are
//! reported as [`Error::Precondition`] without touching the network;
//! HTTP failures carry the response status and body.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod session;
pub mod types;

mod transport;

#[cfg(feature = "logging")]
pub mod logging;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use session::{TaskSession, TaskState};
pub use types::{BearerToken, Credentials, ProcessOptions, Task, UploadedFile};
