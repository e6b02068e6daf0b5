//! File type detection

use std::path::Path;

use crate::error::{JsonError, JsonResult};

/// Supported sheet file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// JSON record list (`.sheets`)
    Sheets,
}

impl FileType {
    /// Pick the file type from the path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> JsonResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("sheets") => Ok(FileType::Sheets),
            _ => Err(JsonError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
