use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a download request is refused before any work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid YouTube link.")]
    EmptyUrl,

    #[error("Please choose at least one format.")]
    NoFormat,

    #[error("The folder {} does not exist.", .0.display())]
    MissingFolder(PathBuf),

    #[error("The folder {} is read-only.", .0.display())]
    ReadOnlyFolder(PathBuf),
}

/// Failure of a single extraction run.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Message reported by the extractor itself, kept verbatim.
    #[error("{0}")]
    Failed(String),
}

/// Errors that stop the application from starting.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] io::Error),

    #[error("window error: {0}")]
    Gui(#[from] eframe::Error),
}
