//! Prelude module - common imports for cellflow users
//!
//! ```rust
//! use cellflow::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellAccessor,
    CellRange,
    CellReference,
    // Observer
    ChangeListener,
    // Error types
    Error,
    Expression,
    FormulaError,
    Result,

    // Main types
    Sheet,
    SheetOptions,
    // I/O types
    SheetRecord,
    Value,
};
