//! Sheet file options

/// Options for writing sheet files
#[derive(Debug, Clone)]
pub struct SheetWriteOptions {
    /// Indent the JSON output (default: true)
    pub pretty: bool,
}

impl Default for SheetWriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}
