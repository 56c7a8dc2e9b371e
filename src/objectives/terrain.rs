//! Optional terrain inputs for the elevation-aware objectives.
//!
//! The engine never loads DEMs or computes slope itself; an external
//! terrain subsystem supplies ready-made grids. A [`TerrainGrid`] is a
//! row-major raster with an affine (origin + cell size) transform from
//! project meters to cells. Absence of a grid degrades the dependent
//! objectives to a neutral score instead of failing.

use crate::error::{Error, Result};

/// A row-major raster grid in project coordinates.
///
/// Row 0 is the row at `origin_y`; y grows with row index. Cells are
/// square with side `cell_size_m`.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    values: Vec<f64>,
    cols: usize,
    rows: usize,
    origin_x: f64,
    origin_y: f64,
    cell_size_m: f64,
}

impl TerrainGrid {
    /// Builds a grid from row-major values.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstraint`] when the value count does not
    /// match `cols × rows` or the cell size is not positive.
    pub fn new(
        values: Vec<f64>,
        cols: usize,
        rows: usize,
        origin_x: f64,
        origin_y: f64,
        cell_size_m: f64,
    ) -> Result<Self> {
        if values.len() != cols * rows {
            return Err(Error::InvalidConstraint(format!(
                "terrain grid has {} values, expected {}×{} = {}",
                values.len(),
                cols,
                rows,
                cols * rows
            )));
        }
        if cell_size_m <= 0.0 {
            return Err(Error::InvalidConstraint(format!(
                "terrain cell size must be positive, got {cell_size_m}"
            )));
        }
        Ok(Self {
            values,
            cols,
            rows,
            origin_x,
            origin_y,
            cell_size_m,
        })
    }

    /// Samples the grid at a project coordinate (nearest cell).
    ///
    /// Returns `None` outside the grid extent.
    pub fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let col = (x - self.origin_x) / self.cell_size_m;
        let row = (y - self.origin_y) / self.cell_size_m;
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size_m(&self) -> f64 {
        self.cell_size_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(TerrainGrid::new(vec![0.0; 5], 2, 3, 0.0, 0.0, 10.0).is_err());
        assert!(TerrainGrid::new(vec![0.0; 6], 2, 3, 0.0, 0.0, 10.0).is_ok());
    }

    #[test]
    fn test_non_positive_cell_size_rejected() {
        assert!(TerrainGrid::new(vec![0.0; 4], 2, 2, 0.0, 0.0, 0.0).is_err());
        assert!(TerrainGrid::new(vec![0.0; 4], 2, 2, 0.0, 0.0, -5.0).is_err());
    }

    #[test]
    fn test_sample_nearest_cell() {
        // 2×2 grid, 10 m cells, origin at (100, 200).
        let grid =
            TerrainGrid::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, 100.0, 200.0, 10.0).unwrap();
        assert_eq!(grid.sample(105.0, 205.0), Some(1.0));
        assert_eq!(grid.sample(115.0, 205.0), Some(2.0));
        assert_eq!(grid.sample(105.0, 215.0), Some(3.0));
        assert_eq!(grid.sample(115.0, 215.0), Some(4.0));
    }

    #[test]
    fn test_sample_outside_extent_is_none() {
        let grid = TerrainGrid::new(vec![0.0; 4], 2, 2, 0.0, 0.0, 10.0).unwrap();
        assert_eq!(grid.sample(-1.0, 5.0), None);
        assert_eq!(grid.sample(5.0, 25.0), None);
        assert_eq!(grid.sample(20.0, 5.0), None);
    }
}
