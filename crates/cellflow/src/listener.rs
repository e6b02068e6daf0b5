//! Change notifications

use cellflow_core::CellReference;

/// Observer told about every cell whose displayed value may have changed
pub trait ChangeListener {
    fn cell_changed(&mut self, reference: CellReference);
}

impl<F> ChangeListener for F
where
    F: FnMut(CellReference),
{
    fn cell_changed(&mut self, reference: CellReference) {
        self(reference)
    }
}
