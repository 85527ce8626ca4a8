pub mod geotiff;
pub mod types;
pub mod utils;

pub use geotiff::GeoTiffReader;
pub use types::{DataReader, FileError, FileType, ReadError};
pub use utils::reader_from_filetype;

use std::path::PathBuf;

/// Reader for sample `channel` of the file at `path`, picked by extension.
pub fn create_reader(path: PathBuf, channel: usize) -> Result<Box<dyn DataReader>, FileError> {
    match reader_from_filetype(&path) {
        Ok(FileType::GeoTiff) => Ok(Box::new(GeoTiffReader { path, channel })),
        Err(e) => Err(e),
    }
}
