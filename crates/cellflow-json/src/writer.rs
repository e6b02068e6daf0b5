//! Sheet file writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::JsonResult;
use crate::file_type::FileType;
use crate::options::SheetWriteOptions;
use crate::record::SheetRecord;

/// Sheet file writer
pub struct SheetWriter;

impl SheetWriter {
    /// Write records to a file, choosing the format by extension
    pub fn write_file<P: AsRef<Path>>(
        records: &[SheetRecord],
        path: P,
        options: &SheetWriteOptions,
    ) -> JsonResult<()> {
        let path = path.as_ref();
        match FileType::from_path(path)? {
            FileType::Sheets => {
                let mut writer = BufWriter::new(File::create(path)?);
                Self::write(records, &mut writer, options)?;
                writer.flush()?;
            }
        }
        info!(path = %path.display(), cells = records.len(), "saved sheet");
        Ok(())
    }

    /// Write records as JSON to a writer
    pub fn write<W: Write>(
        records: &[SheetRecord],
        writer: W,
        options: &SheetWriteOptions,
    ) -> JsonResult<()> {
        if options.pretty {
            serde_json::to_writer_pretty(writer, records)?;
        } else {
            serde_json::to_writer(writer, records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellflow_core::CellReference;

    #[test]
    fn test_write_compact() {
        let records = vec![
            SheetRecord::new(CellReference::parse("A1").unwrap(), "5"),
            SheetRecord::new(CellReference::parse("B2").unwrap(), "=A1 * \"x\""),
        ];
        let mut out = Vec::new();
        SheetWriter::write(&records, &mut out, &SheetWriteOptions { pretty: false }).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"reference":"A1","text":"5"},{"reference":"B2","text":"=A1 * \"x\""}]"#
        );
    }
}
