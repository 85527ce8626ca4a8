use crate::raster::Raster;
use std::fmt;

pub trait DataReader {
    fn read_data(&self) -> Result<Raster, ReadError>;
}

#[derive(Debug)]
pub enum ReadError {
    GeoTiff(String),
    Channel { requested: usize, available: usize },
    File(FileError),
}

#[derive(Debug)]
pub enum FileError {
    UnknownFileType(String),
}

pub enum FileType {
    GeoTiff,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::GeoTiff(msg) => write!(f, "GeoTIFF: {}", msg),
            ReadError::Channel {
                requested,
                available,
            } => write!(
                f,
                "channel {} requested but the file only has {} sample(s) per pixel",
                requested, available
            ),
            ReadError::File(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReadError {}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::UnknownFileType(path) => write!(f, "unsupported file type: {}", path),
        }
    }
}

impl std::error::Error for FileError {}

impl From<FileError> for ReadError {
    fn from(err: FileError) -> ReadError {
        ReadError::File(err)
    }
}
