//! Sheet configuration

/// Options for a [`Sheet`](crate::Sheet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Initial number of rows (default: 100)
    pub rows: u32,
    /// Initial number of data columns (default: 26)
    pub columns: u32,
    /// Run a full recompute after [`import`](crate::Sheet::import) (default: true)
    pub recalculate_after_import: bool,
    /// Keep pretty-printed expression trees available (default: false)
    pub debug: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            rows: 100,
            columns: 26,
            recalculate_after_import: true,
            debug: false,
        }
    }
}
