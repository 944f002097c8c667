//! Resizable square matrix used for lane counts and joint distances

use super::error::{SimError, SimResult};

/// N×N matrix stored row-major in a flat buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> SquareMatrix<T> {
    /// A `size`×`size` matrix filled with `T::default()`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    /// Build from nested rows, rejecting anything that is not square
    pub fn from_rows(rows: &[Vec<T>]) -> SimResult<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SimError::InvalidGraph(format!(
                    "row {} has {} entries, expected {}",
                    index,
                    row.len(),
                    size
                )));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> T {
        self.cells[row * self.size + column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) {
        self.cells[row * self.size + column] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Grow or shrink to `new_size`
    ///
    /// Every surviving `(row, column)` keeps its value; new cells hold
    /// `T::default()`.
    pub fn resize(&mut self, new_size: usize) {
        let mut cells = vec![T::default(); new_size * new_size];
        let kept = self.size.min(new_size);
        for row in 0..kept {
            let old_start = row * self.size;
            let new_start = row * new_size;
            cells[new_start..new_start + kept]
                .copy_from_slice(&self.cells[old_start..old_start + kept]);
        }
        self.size = new_size;
        self.cells = cells;
    }

    /// Copy back into nested rows
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.size).map(|row| self.row(row).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_preserves_entries() {
        let mut matrix = SquareMatrix::from_rows(&[vec![0, 1], vec![2, 0]]).unwrap();
        matrix.resize(3);

        assert_eq!(matrix.to_rows(), vec![vec![0, 1, 0], vec![2, 0, 0], vec![0, 0, 0]]);

        matrix.set(2, 0, 7);
        matrix.resize(2);
        assert_eq!(matrix.to_rows(), vec![vec![0, 1], vec![2, 0]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = SquareMatrix::<u32>::from_rows(&[vec![0, 1], vec![0]]);
        assert!(matches!(result, Err(SimError::InvalidGraph(_))));
    }
}
