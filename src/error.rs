//! Error types for the classifier
//!
//! Per-pixel numeric failures never surface here: they become `NaN` inside
//! the rasters. Only structural problems (misaligned grids, missing bands,
//! invalid parameters, I/O) are reported to the caller.

use crate::bands::BandId;
use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Rasters are not aligned: expected ({er}, {ec}), got ({ar}, {ac})")]
    Misaligned { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Rasters share dimensions but not the same geotransform")]
    GeoTransformMismatch,

    #[error("Required band is missing: {0}")]
    MissingBand(BandId),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Class masks overlap at ({row}, {col}): encoded value {value}")]
    ExclusivityViolation { row: usize, col: usize, value: u8 },

    #[error("Failed to read raster: {0}")]
    Read(#[from] crate::readers::ReadError),

    #[error("Failed to write raster: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Write(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
