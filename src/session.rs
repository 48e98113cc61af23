//! Task lifecycle management.
//!
//! A [`TaskSession`] drives one remote task at a time through the fixed
//! lifecycle `Idle → Started → FilesAdded → Processed → Downloaded`.
//! Starting a new task abandons the previous one; the server reclaims it.

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Payload};
use crate::types::{
    Credentials, ProcessOptions, ProcessRequest, StartResponse, Task, UploadResponse, UploadedFile,
};
use reqwest::Method;
use std::path::{Path, PathBuf};

/// Lifecycle state of the session's current task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// No task has been started.
    Idle,
    /// A task exists but holds no files yet.
    Started,
    /// At least one file has been uploaded.
    FilesAdded,
    /// The worker has processed the uploaded files.
    Processed,
    /// The result has been written to disk.
    Downloaded,
}

/// The task currently owned by a session, with its upload ledger.
#[derive(Debug)]
struct ActiveTask {
    task: Task,
    /// Versioned URL of the assigned worker.
    worker: String,
    /// Files uploaded so far, in upload order.
    files: Vec<UploadedFile>,
    state: TaskState,
}

/// Client session for the InkPress document-processing API.
///
/// Connecting exchanges the credentials for a bearer token; an expired
/// token is refreshed transparently on any later call. The session owns at
/// most one task at a time and every lifecycle method takes `&mut self`,
/// so calls are strictly sequenced.
///
/// # Examples
///
/// ```rust,no_run
/// use inkpress::{Credentials, TaskSession};
///
/// # async fn run() -> inkpress::Result<()> {
/// let mut session = TaskSession::connect(Credentials::new("pub", "sec")).await?;
/// let output = session.compress("report.pdf").await?;
/// println!("compressed file written to {}", output.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TaskSession {
    transport: HttpTransport,
    task: Option<ActiveTask>,
}

impl TaskSession {
    /// Connect to the production API.
    ///
    /// Performs exactly one auth call; the obtained token is reused by all
    /// subsequent requests until the server rejects it.
    pub async fn connect(credentials: Credentials) -> Result<Self> {
        Self::connect_with(credentials, SessionConfig::default()).await
    }

    /// Connect with an explicit configuration.
    pub async fn connect_with(credentials: Credentials, config: SessionConfig) -> Result<Self> {
        let transport = HttpTransport::new(credentials, config)?;
        transport.authenticate().await?;
        Ok(Self {
            transport,
            task: None,
        })
    }

    /// Start a new task for `tool`.
    ///
    /// Requests a task id and an assigned worker host from the API. Any
    /// previous task is discarded and the uploaded-file list is reset.
    pub async fn start_task(&mut self, tool: &str) -> Result<&Task> {
        let url = self.transport.endpoint(&format!("start/{}", tool));
        let response = self
            .transport
            .request(Method::GET, &url, &Payload::None)
            .await
            .map_err(|e| Error::TaskStart {
                tool: tool.to_string(),
                message: e.to_string(),
            })?;

        let start: StartResponse = response.json().await.map_err(|e| Error::TaskStart {
            tool: tool.to_string(),
            message: format!("invalid start response: {}", e),
        })?;

        tracing::debug!(
            "started {} task {} on worker {}",
            tool,
            start.task,
            start.server
        );

        let worker = self.transport.worker_url(&start.server);
        let active = self.task.insert(ActiveTask {
            task: Task {
                id: start.task,
                tool: tool.to_string(),
                server: start.server,
            },
            worker,
            files: Vec::new(),
            state: TaskState::Started,
        });
        Ok(&active.task)
    }

    /// Upload a local file to the current task's worker.
    ///
    /// Requires a started task; fails with [`Error::Precondition`] before
    /// any HTTP request otherwise. The worker-assigned filename is recorded
    /// in upload order for the process call.
    pub async fn add_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let active = match self.task.as_mut() {
            Some(t) if matches!(t.state, TaskState::Started | TaskState::FilesAdded) => t,
            _ => {
                return Err(Error::Precondition(
                    "add_file requires a started task".to_string(),
                ))
            }
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| Error::Filesystem {
            path: path.to_path_buf(),
            source: e,
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let payload = Payload::FileUpload {
            task: active.task.id.clone(),
            filename,
            bytes,
        };

        let url = format!("{}/upload", active.worker);
        let upload_error = |message: String| Error::Upload {
            path: path.to_path_buf(),
            message,
        };
        let response = self
            .transport
            .request(Method::POST, &url, &payload)
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| upload_error(format!("invalid upload response: {}", e)))?;

        tracing::trace!(
            "uploaded {} as {} for task {}",
            path.display(),
            upload.server_filename,
            active.task.id
        );

        active.files.push(UploadedFile {
            server_filename: upload.server_filename,
            filename: path.to_string_lossy().into_owned(),
        });
        active.state = TaskState::FilesAdded;
        Ok(())
    }

    /// Process the uploaded files with the task's tool.
    pub async fn process(&mut self) -> Result<()> {
        self.process_with(ProcessOptions::default()).await
    }

    /// Process the uploaded files with extra tool-specific options.
    ///
    /// Requires at least one uploaded file. A 2xx response is treated as
    /// success; per-file outcomes are not modeled.
    pub async fn process_with(&mut self, options: ProcessOptions) -> Result<()> {
        let active = match self.task.as_mut() {
            Some(t) if t.state == TaskState::FilesAdded => t,
            Some(t) if t.state == TaskState::Started => {
                return Err(Error::Precondition(
                    "process requires at least one uploaded file".to_string(),
                ))
            }
            _ => {
                return Err(Error::Precondition(
                    "process requires a started task with uploaded files".to_string(),
                ))
            }
        };

        let request = ProcessRequest {
            task: &active.task.id,
            tool: &active.task.tool,
            files: &active.files,
            options: &options,
        };
        let process_error = |task: &ActiveTask, message: String| Error::Process {
            task: task.task.id.clone(),
            message,
        };
        let body =
            serde_json::to_value(&request).map_err(|e| process_error(active, e.to_string()))?;

        let url = format!("{}/process", active.worker);
        self.transport
            .request(Method::POST, &url, &Payload::Json(body))
            .await
            .map_err(|e| process_error(active, e.to_string()))?;

        tracing::debug!(
            "task {} processed {} file(s)",
            active.task.id,
            active.files.len()
        );

        active.state = TaskState::Processed;
        Ok(())
    }

    /// Download the processed result and write it to `output`.
    ///
    /// Overwrites any existing file at that path.
    pub async fn download(&mut self, output: impl AsRef<Path>) -> Result<()> {
        let output = output.as_ref();
        let active = match self.task.as_mut() {
            Some(t) if t.state == TaskState::Processed => t,
            _ => {
                return Err(Error::Precondition(
                    "download requires a processed task".to_string(),
                ))
            }
        };

        let url = format!("{}/download/{}", active.worker, active.task.id);
        let download_error = |message: String| Error::Download {
            task: active.task.id.clone(),
            message,
        };
        let response = self
            .transport
            .request(Method::GET, &url, &Payload::None)
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        tokio::fs::write(output, &bytes)
            .await
            .map_err(|e| Error::Filesystem {
                path: output.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(
            "wrote {} byte(s) to {} for task {}",
            bytes.len(),
            output.display(),
            active.task.id
        );

        active.state = TaskState::Downloaded;
        Ok(())
    }

    /// Compress a PDF, writing the result next to the input.
    ///
    /// The output name replaces the input's extension with
    /// `_compresso.pdf`: `report.pdf` becomes `report_compresso.pdf`.
    /// Returns the path the result was written to.
    pub async fn compress(&mut self, input: impl AsRef<Path>) -> Result<PathBuf> {
        let input = input.as_ref();
        let output = default_output_name(input);
        self.compress_to(input, &output).await?;
        Ok(output)
    }

    /// Compress a PDF, writing the result to an explicit path.
    pub async fn compress_to(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<()> {
        self.start_task("compress").await?;
        self.add_file(input).await?;
        self.process().await?;
        self.download(output).await
    }

    /// Merge two or more PDFs into one, writing the result to `output`.
    ///
    /// A failed upload aborts the whole operation; the remote task is
    /// abandoned and previously uploaded files are not rolled back.
    pub async fn merge<P: AsRef<Path>>(
        &mut self,
        inputs: &[P],
        output: impl AsRef<Path>,
    ) -> Result<()> {
        if inputs.len() < 2 {
            return Err(Error::Precondition(
                "merge requires at least two input files".to_string(),
            ));
        }

        self.start_task("merge").await?;
        for input in inputs {
            self.add_file(input).await?;
        }
        self.process().await?;
        self.download(output).await
    }

    /// Lifecycle state of the current task, [`TaskState::Idle`] if none.
    pub fn state(&self) -> TaskState {
        self.task.as_ref().map_or(TaskState::Idle, |t| t.state)
    }

    /// The current task, if one has been started.
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref().map(|t| &t.task)
    }

    /// Files uploaded to the current task, in upload order.
    pub fn files(&self) -> &[UploadedFile] {
        self.task.as_ref().map_or(&[], |t| t.files.as_slice())
    }
}

/// Derive the default output path for a compressed file.
///
/// The input's extension (whatever its length or case) is replaced with
/// `_compresso.pdf`; extensionless inputs get the suffix appended.
fn default_output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_compresso.pdf", stem))
}
