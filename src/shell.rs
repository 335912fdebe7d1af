//! UI state that outlives a frame: the Idle/Downloading toggle, status line
//! and the pending outcome of the running download.

use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::{
    config::RevealPolicy,
    error::ValidationError,
    link::is_video_link,
    model::{DownloadOutcome, DownloadRequest, Formats, UiState},
};

/// Shown instead of any failure mentioning HTTP 403.
pub const FORBIDDEN_HINT: &str = "YouTube refused the connection (403 Forbidden).\nPlease update yt-dlp: 'yt-dlp -U' or 'pip install -U yt-dlp'";

const WORKER_LOST: &str = "The download stopped without reporting a result.";

/// Current status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Prompt,
    LinkDetected,
    Downloading,
    Succeeded,
    Failed,
}

/// Colour family of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Accent,
    Positive,
    Negative,
}

impl Status {
    pub fn text(self) -> &'static str {
        match self {
            Status::Prompt => "Paste a link and choose a format",
            Status::LinkDetected => "Link detected! Ready to download.",
            Status::Downloading => "Downloading... please wait",
            Status::Succeeded => "✅ Download complete!",
            Status::Failed => "❌ Something went wrong",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Status::Prompt => Tone::Muted,
            Status::Downloading => Tone::Accent,
            Status::LinkDetected | Status::Succeeded => Tone::Positive,
            Status::Failed => Tone::Negative,
        }
    }
}

/// Controls that are only usable while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub url_input: bool,
    pub paste: bool,
    pub formats: bool,
    pub start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A modal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
    /// Folder to open once the notice is dismissed
    pub reveal: Option<PathBuf>,
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: "Notice",
            message: err.to_string(),
            reveal: None,
        }
    }
}

/// What a click on the start button led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was incomplete; nothing started
    Rejected(ValidationError),
    /// Folder picker closed without a choice
    Cancelled,
    /// A download is already running
    Busy,
    Started,
}

/// Persistent state of the main window.
pub struct Shell {
    pub url: String,
    pub formats: Formats,
    state: UiState,
    status: Status,
    last_folder: Option<PathBuf>,
    pending: Option<oneshot::Receiver<DownloadOutcome>>,
}

impl Shell {
    /// Creates the shell, pre-filling the link field from `clipboard` when
    /// it holds a video link.
    pub fn new(clipboard: Option<String>) -> Self {
        let mut shell = Self {
            url: String::new(),
            formats: Formats::default(),
            state: UiState::Idle,
            status: Status::Prompt,
            last_folder: None,
            pending: None,
        };
        if let Some(text) = clipboard {
            let text = text.trim();
            if is_video_link(text) {
                shell.url = text.to_string();
                shell.status = Status::LinkDetected;
            }
        }
        shell
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_folder(&self) -> Option<&Path> {
        self.last_folder.as_deref()
    }

    pub fn controls(&self) -> Controls {
        let idle = self.state == UiState::Idle;
        Controls {
            url_input: idle,
            paste: idle,
            formats: idle,
            start: idle,
        }
    }

    /// Replaces the link with pasted text.
    pub fn paste(&mut self, text: Option<String>) {
        if self.state != UiState::Idle {
            return;
        }
        let Some(text) = text else { return };
        self.url = text.trim().to_string();
        if is_video_link(&self.url) {
            self.status = Status::LinkDetected;
        } else if self.status == Status::LinkDetected {
            self.status = Status::Prompt;
        }
    }

    /// Validates the input, asks for a folder and hands the request to
    /// `launch`. `launch` is only called for a complete request.
    pub fn submit<P, L>(&mut self, pick_folder: P, launch: L) -> Submission
    where
        P: FnOnce() -> Option<PathBuf>,
        L: FnOnce(DownloadRequest) -> oneshot::Receiver<DownloadOutcome>,
    {
        if self.state == UiState::Downloading {
            return Submission::Busy;
        }
        if self.url.trim().is_empty() {
            return Submission::Rejected(ValidationError::EmptyUrl);
        }
        if !self.formats.any() {
            return Submission::Rejected(ValidationError::NoFormat);
        }
        let Some(folder) = pick_folder() else {
            return Submission::Cancelled;
        };
        let request = match DownloadRequest::new(&self.url, folder, self.formats) {
            Ok(request) => request,
            Err(err) => return Submission::Rejected(err),
        };

        tracing::info!(url = request.url(), folder = %request.folder().display(), "submitting download");
        self.last_folder = Some(request.folder().to_path_buf());
        self.state = UiState::Downloading;
        self.status = Status::Downloading;
        self.pending = Some(launch(request));
        Submission::Started
    }

    /// Checks for the outcome of the running download.
    pub fn poll(&mut self) -> Option<Notice> {
        let rx = self.pending.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => DownloadOutcome::Failure {
                message: WORKER_LOST.to_string(),
            },
        };
        self.pending = None;
        Some(self.finish(outcome))
    }

    /// Returns to idle and describes the outcome for the user.
    fn finish(&mut self, outcome: DownloadOutcome) -> Notice {
        self.state = UiState::Idle;
        match outcome {
            DownloadOutcome::Success => {
                self.status = Status::Succeeded;
                Notice {
                    level: NoticeLevel::Info,
                    title: "Success",
                    message: "Files saved successfully.".to_string(),
                    reveal: self.last_folder.clone(),
                }
            }
            DownloadOutcome::Failure { message } => {
                self.status = Status::Failed;
                Notice {
                    level: NoticeLevel::Error,
                    title: "Download failed",
                    message: display_message(message),
                    reveal: None,
                }
            }
        }
    }
}

/// Applies `policy` to a failure to open `folder`; returns the warning to
/// show, if any.
pub fn reveal_failure(policy: RevealPolicy, folder: &Path, err: &io::Error) -> Option<Notice> {
    match policy {
        RevealPolicy::Ignore => {
            tracing::debug!("could not open {}: {err}", folder.display());
            None
        }
        RevealPolicy::Notify => Some(Notice {
            level: NoticeLevel::Warning,
            title: "Notice",
            message: format!("Could not open {}: {err}", folder.display()),
            reveal: None,
        }),
    }
}

/// Swaps a 403 error for instructions the user can act on.
pub fn display_message(message: String) -> String {
    if message.contains("403") {
        FORBIDDEN_HINT.to_string()
    } else {
        message
    }
}
