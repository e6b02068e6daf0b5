//! Sheet file reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use crate::error::JsonResult;
use crate::file_type::FileType;
use crate::record::SheetRecord;

/// Sheet file reader
pub struct SheetReader;

impl SheetReader {
    /// Read records from a file, choosing the format by extension
    pub fn read_file<P: AsRef<Path>>(path: P) -> JsonResult<Vec<SheetRecord>> {
        let path = path.as_ref();
        let records = match FileType::from_path(path)? {
            FileType::Sheets => Self::read(BufReader::new(File::open(path)?))?,
        };
        info!(path = %path.display(), cells = records.len(), "loaded sheet");
        Ok(records)
    }

    /// Read JSON records from a reader
    pub fn read<R: Read>(reader: R) -> JsonResult<Vec<SheetRecord>> {
        Ok(serde_json::from_reader(reader)?)
    }
}
