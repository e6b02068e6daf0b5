//! Persisted cell record

use cellflow_core::CellReference;
use serde::{Deserialize, Serialize};

/// One non-empty cell: where it is and the raw text the user typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRecord {
    pub reference: CellReference,
    pub text: String,
}

impl SheetRecord {
    pub fn new(reference: CellReference, text: impl Into<String>) -> Self {
        Self {
            reference,
            text: text.into(),
        }
    }

    /// Whether the text is a formula
    pub fn is_formula(&self) -> bool {
        self.text.starts_with('=')
    }
}
