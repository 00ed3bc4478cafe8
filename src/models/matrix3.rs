use crate::models::Vector3;

/// Row-major 3×3 matrix.
///
/// Serves two purposes: the intermediate for quaternion orthonormalization and
/// the inertia tensor of composite bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    pub m: [[f64; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::identity()
    }
}

impl Matrix3 {
    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    pub const fn zero() -> Self {
        Self::from_rows([[0.0; 3]; 3])
    }

    pub const fn diagonal(xx: f64, yy: f64, zz: f64) -> Self {
        Self::from_rows([
            [xx, 0.0, 0.0],
            [0.0, yy, 0.0],
            [0.0, 0.0, zz],
        ])
    }

    pub fn row(&self, index: usize) -> Vector3 {
        Vector3::new(self.m[index][0], self.m[index][1], self.m[index][2])
    }

    pub fn set_row(&mut self, index: usize, row: &Vector3) {
        self.m[index] = [row.x, row.y, row.z];
    }

    pub fn transpose(&self) -> Matrix3 {
        let m = &self.m;
        Matrix3::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn multiply(&self, other: &Matrix3) -> Matrix3 {
        let mut result = Matrix3::zero();
        for row in 0..3 {
            for col in 0..3 {
                result.m[row][col] = (0..3).map(|k| self.m[row][k] * other.m[k][col]).sum();
            }
        }
        result
    }

    pub fn multiply_vector(&self, vector: &Vector3) -> Vector3 {
        Vector3::new(
            self.row(0).dot(vector),
            self.row(1).dot(vector),
            self.row(2).dot(vector),
        )
    }

    pub fn add(&self, other: &Matrix3) -> Matrix3 {
        let mut result = *self;
        for row in 0..3 {
            for col in 0..3 {
                result.m[row][col] += other.m[row][col];
            }
        }
        result
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Adjugate over determinant. A singular matrix yields non-finite
    /// entries rather than an error.
    pub fn inverse(&self) -> Matrix3 {
        let m = &self.m;
        let inv_det = 1.0 / self.determinant();

        Matrix3::from_rows([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ])
    }

    /// Gram-Schmidt on the rows, in place.
    ///
    /// The third row is rebuilt from the first two, which also fixes
    /// handedness.
    pub fn orthonormalize(&mut self) {
        let x = self.row(0).normalized();
        let y = (self.row(1) - x * x.dot(&self.row(1))).normalized();
        let z = x.cross(&y);

        self.set_row(0, &x);
        self.set_row(1, &y);
        self.set_row(2, &z);
    }

    /// `R * self * Rᵀ`, i.e. a body-frame tensor expressed in world frame.
    pub fn rotated_by(&self, rotation: &Matrix3) -> Matrix3 {
        rotation.multiply(self).multiply(&rotation.transpose())
    }
}
