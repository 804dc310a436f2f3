//! Dense 4-D container with an explicit "not computed" tag per cell.
//!
//! Index order is (parameter set, perturbation slot, observable, condition),
//! stored row-major in a flat buffer. A cell is `None` until a value is
//! written; `None` is the sentinel and never stands for zero.

use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq)]
pub struct Array4 {
    shape: [usize; 4],
    cells: Vec<Option<f64>>,
}

impl Array4 {
    pub fn new(shape: [usize; 4]) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            cells: vec![None; len],
        }
    }

    pub fn from_cells(shape: [usize; 4], cells: Vec<Option<f64>>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if cells.len() != expected {
            bail!(
                "cell count {} does not match shape {:?} ({} cells)",
                cells.len(),
                shape,
                expected
            );
        }
        Ok(Self { shape, cells })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Option<f64>] {
        &self.cells
    }

    /// Panics when any index is out of range, like slice indexing.
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> Option<f64> {
        self.cells[self.offset(i, j, k, l)]
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, l: usize, value: Option<f64>) {
        let off = self.offset(i, j, k, l);
        self.cells[off] = value;
    }

    /// Values across all parameter sets for one (slot, observable, condition).
    pub fn across_sets(&self, j: usize, k: usize, l: usize) -> Vec<Option<f64>> {
        (0..self.shape[0]).map(|i| self.get(i, j, k, l)).collect()
    }

    pub fn missing(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    fn offset(&self, i: usize, j: usize, k: usize, l: usize) -> usize {
        let [n0, n1, n2, n3] = self.shape;
        assert!(
            i < n0 && j < n1 && k < n2 && l < n3,
            "index ({}, {}, {}, {}) out of range for shape {:?}",
            i,
            j,
            k,
            l,
            self.shape
        );
        ((i * n1 + j) * n2 + k) * n3 + l
    }
}
