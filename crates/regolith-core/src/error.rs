//! Error types for world construction, snapshot copies and settings I/O

use thiserror::Error;

/// Fatal configuration problems detected while building a world.
///
/// These abort startup and are never retried; a running world can only be
/// replaced through an explicit regenerate with valid settings.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),

    #[error("grid is {grid_width}x{grid_height} but settings specify {width}x{height}")]
    GridMismatch {
        grid_width: i32,
        grid_height: i32,
        width: i32,
        height: i32,
    },
}

/// A snapshot copy that did not complete.
///
/// Recoverable: the collision system logs it, keeps the previous snapshot and
/// retries at the next readback interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("snapshot copy failed: {0}")]
    Failed(String),
}

/// Failures loading or saving the persisted settings record.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize settings")]
    Serialize(#[from] ron::Error),
}
