//! # cellflow-json
//!
//! Reader and writer for `.sheets` files: a JSON array of
//! `{"reference": "A1", "text": "=B1 * 2"}` records, one per non-empty cell.

mod error;
mod file_type;
mod options;
mod reader;
mod record;
mod writer;

pub use error::{JsonError, JsonResult};
pub use file_type::FileType;
pub use options::SheetWriteOptions;
pub use reader::SheetReader;
pub use record::SheetRecord;
pub use writer::SheetWriter;
