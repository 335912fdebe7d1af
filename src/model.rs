use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::ValidationError;

/// Which copies of the media the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formats {
    /// MP3 audio track
    pub audio: bool,
    /// MP4 video with audio
    pub video: bool,
}

impl Default for Formats {
    fn default() -> Self {
        Self { audio: true, video: false }
    }
}

impl Formats {
    pub fn any(&self) -> bool {
        self.audio || self.video
    }
}

/// A validated, immutable download order handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    folder: PathBuf,
    formats: Formats,
}

impl DownloadRequest {
    /// Builds a request, trimming the URL and checking every field.
    pub fn new(
        url: &str,
        folder: impl Into<PathBuf>,
        formats: Formats,
    ) -> Result<Self, ValidationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if !formats.any() {
            return Err(ValidationError::NoFormat);
        }
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(ValidationError::MissingFolder(folder));
        }
        if fs::metadata(&folder).is_ok_and(|meta| meta.permissions().readonly()) {
            return Err(ValidationError::ReadOnlyFolder(folder));
        }
        Ok(Self {
            url: url.to_string(),
            folder,
            formats,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn formats(&self) -> Formats {
        self.formats
    }
}

/// Terminal result of one download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success,
    Failure { message: String },
}

/// Represents whether a download is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    /// Waiting for input
    #[default]
    Idle,
    /// A request is in flight
    Downloading,
}
