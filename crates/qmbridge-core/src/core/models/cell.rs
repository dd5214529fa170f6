use crate::core::constants::BOHR_PER_NANOMETER;
use nalgebra::Vector3;

/// The periodic simulation cell, described by three box vectors in host
/// length units (nanometers).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCell {
    vectors: [Vector3<f64>; 3],
}

impl PeriodicCell {
    /// Creates a cell from three box vectors in nanometers.
    pub fn new(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Self {
        Self { vectors: [a, b, c] }
    }

    /// Creates a rectangular cell with the given edge lengths in nanometers.
    pub fn rectangular(x: f64, y: f64, z: f64) -> Self {
        Self::new(
            Vector3::new(x, 0.0, 0.0),
            Vector3::new(0.0, y, 0.0),
            Vector3::new(0.0, 0.0, z),
        )
    }

    /// The three box vectors in nanometers.
    pub fn vectors(&self) -> &[Vector3<f64>; 3] {
        &self.vectors
    }

    /// The cell as a row-major 3×3 array in the calculator's length unit
    /// (Bohr), one row per box vector.
    pub fn to_bohr_rows(&self) -> [[f64; 3]; 3] {
        let mut rows = [[0.0; 3]; 3];
        for (row, vector) in rows.iter_mut().zip(self.vectors.iter()) {
            row[0] = BOHR_PER_NANOMETER * vector.x;
            row[1] = BOHR_PER_NANOMETER * vector.y;
            row[2] = BOHR_PER_NANOMETER * vector.z;
        }
        rows
    }
}
