// ============================================================================
// error.rs — Error type shared by every pipeline stage
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::deps::Backend;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("SVG file not found at {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Required backends not available: {}", format_backends(.0))]
    MissingBackends(Vec<Backend>),

    #[error("Cannot proceed without dependencies.")]
    DependenciesDeclined,

    #[error("Failed to start package manager '{program}': {source}")]
    InstallSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to relaunch '{program}' after installing: {source} (is ~/.cargo/bin on PATH?)"
    )]
    Relaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Package manager exited with {status}")]
    InstallFailed { status: String },

    #[error("Error converting SVG to PNG ({}): {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("Error converting PNG to ICO ({}): {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Not a valid ICO file ({}): {message}", .path.display())]
    InvalidIcon { path: PathBuf, message: String },

    #[error("Failed to encode {what}: {message}")]
    Encode { what: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration ({}): {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid size {0}: icon sizes must be between 1 and 256")]
    InvalidSize(u32),

    #[error("Invalid PNG size {0}: must be between 1 and {max}", max = crate::config::MAX_PNG_SIZE)]
    InvalidRenderSize(u32),

    #[error("Operation cancelled by user.")]
    Cancelled,
}

impl IconError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IconError::Io {
            path: path.into(),
            source,
        }
    }

    /// Cancellation exits without the "press Enter" pause.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, IconError::Cancelled)
    }
}

fn format_backends(backends: &[Backend]) -> String {
    backends
        .iter()
        .map(|b| b.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, IconError>;
