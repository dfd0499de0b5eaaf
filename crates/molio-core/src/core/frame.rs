use super::cell::UnitCell;

/// Read and write access to the unit cell of a container.
///
/// Cells are exchanged by value, so callers never hold a reference into the
/// container they got the cell from.
pub trait CellProvider {
    fn cell(&self) -> UnitCell;

    fn set_cell(&mut self, cell: UnitCell);
}

/// A single simulation step.
///
/// Only the parts of a frame that interact with the unit cell geometry live
/// here: the step number and the current cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    step: usize,
    cell: UnitCell,
}

impl Frame {
    /// Creates a frame at step 0 with an infinite cell.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(cell: UnitCell) -> Self {
        Self { step: 0, cell }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }
}

impl CellProvider for Frame {
    fn cell(&self) -> UnitCell {
        self.cell.clone()
    }

    fn set_cell(&mut self, cell: UnitCell) {
        self.cell = cell;
    }
}
