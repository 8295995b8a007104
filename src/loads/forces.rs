//! Nodal force-result tables produced by the static solver

use serde::{Deserialize, Serialize};

use crate::error::{PipeError, PipeResult};
use crate::math::{Mat, Vec6, NDOF};

/// Nodal forces for every point, indexed by (point-row * 6 + dof, column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceTable {
    results: Mat,
}

impl ForceTable {
    /// A zero table for `npoints` points and `ncols` result columns
    pub fn zeros(npoints: usize, ncols: usize) -> Self {
        Self {
            results: Mat::zeros(npoints * NDOF, ncols),
        }
    }

    /// Wrap a solver result matrix; its row count must be a multiple of 6
    pub fn from_matrix(results: Mat) -> PipeResult<Self> {
        if results.nrows() % NDOF != 0 {
            return Err(PipeError::InvalidInput(format!(
                "force table has {} rows, expected a multiple of {NDOF}",
                results.nrows()
            )));
        }
        Ok(Self { results })
    }

    pub fn npoints(&self) -> usize {
        self.results.nrows() / NDOF
    }

    pub fn ncols(&self) -> usize {
        self.results.ncols()
    }

    pub fn matrix(&self) -> &Mat {
        &self.results
    }

    /// Six force components of the point at `row`, or `None` when out of range
    pub fn node_forces(&self, row: usize, col: usize) -> Option<Vec6> {
        if row >= self.npoints() || col >= self.ncols() {
            return None;
        }
        let start = row * NDOF;
        Some(self.results.fixed_view::<6, 1>(start, col).into_owned())
    }

    /// Overwrite the six force components of the point at `row`
    pub fn set_node_forces(&mut self, row: usize, col: usize, forces: Vec6) -> PipeResult<()> {
        if row >= self.npoints() || col >= self.ncols() {
            return Err(PipeError::InvalidInput(format!(
                "point row {row}, column {col} outside a {}x{} force table",
                self.npoints(),
                self.ncols()
            )));
        }
        let start = row * NDOF;
        self.results.fixed_view_mut::<6, 1>(start, col).copy_from(&forces);
        Ok(())
    }

    /// Algebraic sum of factored tables, all of the same shape
    pub fn combine(parts: &[(f64, &ForceTable)]) -> PipeResult<ForceTable> {
        let (_, first) = parts
            .first()
            .ok_or_else(|| PipeError::InvalidInput("no force tables to combine".to_string()))?;
        let shape = first.results.shape();
        let mut results = Mat::zeros(shape.0, shape.1);
        for (factor, table) in parts {
            if table.results.shape() != shape {
                return Err(PipeError::InvalidInput(format!(
                    "force table shape {:?} does not match {:?}",
                    table.results.shape(),
                    shape
                )));
            }
            results += &table.results * *factor;
        }
        Ok(ForceTable { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_forces_slice() {
        let mut table = ForceTable::zeros(3, 1);
        let f = Vec6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        table.set_node_forces(1, 0, f).unwrap();

        assert_eq!(table.node_forces(1, 0), Some(f));
        assert_eq!(table.node_forces(0, 0), Some(Vec6::zeros()));
        assert_eq!(table.matrix()[(6 + 3, 0)], 4.0);
        assert_eq!(table.node_forces(3, 0), None);
        assert!(table.set_node_forces(0, 1, f).is_err());
    }

    #[test]
    fn test_combine_tables() {
        let mut a = ForceTable::zeros(1, 1);
        let mut b = ForceTable::zeros(1, 1);
        a.set_node_forces(0, 0, Vec6::repeat(1.0)).unwrap();
        b.set_node_forces(0, 0, Vec6::repeat(-2.0)).unwrap();

        let c = ForceTable::combine(&[(2.0, &a), (0.5, &b)]).unwrap();
        assert_eq!(c.node_forces(0, 0), Some(Vec6::repeat(1.0)));

        let wrong = ForceTable::zeros(2, 1);
        assert!(ForceTable::combine(&[(1.0, &a), (1.0, &wrong)]).is_err());
        assert!(ForceTable::combine(&[]).is_err());
    }

    #[test]
    fn test_from_matrix_rejects_partial_points() {
        assert!(ForceTable::from_matrix(Mat::zeros(7, 1)).is_err());
        assert_eq!(ForceTable::from_matrix(Mat::zeros(12, 2)).unwrap().npoints(), 2);
    }
}
