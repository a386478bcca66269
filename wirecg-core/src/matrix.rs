/// Raw matrix component access for debug panels and untrusted input
use std::fmt;

use nalgebra::Matrix4;

use crate::error::MathError;

/// Build a matrix from row slices, rejecting anything that isn't 4x4
pub fn try_matrix_from_rows(rows: &[&[f32]]) -> Result<Matrix4<f32>, MathError> {
    if rows.len() != 4 {
        return Err(MathError::RowCount(rows.len()));
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != 4) {
        return Err(MathError::RowLength { row, len: r.len() });
    }
    Ok(Matrix4::from_fn(|r, c| rows[r][c]))
}

/// Build a matrix from row slices, substituting the identity on bad dimensions
pub fn matrix_from_rows(rows: &[&[f32]]) -> Matrix4<f32> {
    try_matrix_from_rows(rows).unwrap_or_else(|err| {
        tracing::error!(%err, "error creating matrix, using identity");
        Matrix4::identity()
    })
}

/// Row-major copy of every component
pub fn matrix_rows(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = m[(r, c)];
        }
    }
    rows
}

/// Overwrite one component in place
pub fn set_matrix_entry(
    m: &mut Matrix4<f32>,
    row: usize,
    col: usize,
    value: f32,
) -> Result<(), MathError> {
    let entry = m
        .get_mut((row, col))
        .ok_or(MathError::OutOfBounds { row, col })?;
    *entry = value;
    Ok(())
}

/// Displays a matrix one row per line, rounded to a tenth
pub struct MatrixDisplay<'a>(pub &'a Matrix4<f32>);

impl fmt::Display for MatrixDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for row in matrix_rows(self.0) {
            write!(f, "\t")?;
            for value in row {
                // avoid printing "-0.0" for tiny negatives
                let rounded = (value * 10.0).round() / 10.0 + 0.0;
                write!(f, "{rounded:.1}, ")?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
