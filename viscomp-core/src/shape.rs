/// Homogeneous 2D point sets
use nalgebra::Matrix3xX;

/// An ordered polyline stored as a 3xN homogeneous array: one `(x, y, 1)` column per point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    coords: Matrix3xX<f64>,
}

impl PointSet {
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        let coords = Matrix3xX::from_fn(points.len(), |row, col| match row {
            0 => points[col].0,
            1 => points[col].1,
            _ => 1.0,
        });
        Self { coords }
    }

    pub fn from_homogeneous(coords: Matrix3xX<f64>) -> Self {
        Self { coords }
    }

    /// The cat outline: head and ears as a closed loop, then two eye strokes.
    pub fn cat() -> Self {
        Self::from_xy(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (1.5, 1.5),
            (0.5, 1.5),
            (0.0, 2.0),
            (0.0, 0.0),
            (0.5, 0.8),
            (0.7, 0.8),
            (1.3, 0.8),
            (1.5, 0.8),
        ])
    }

    pub fn homogeneous(&self) -> &Matrix3xX<f64> {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.ncols() == 0
    }

    pub fn x(&self, i: usize) -> f64 {
        self.coords[(0, i)]
    }

    pub fn y(&self, i: usize) -> f64 {
        self.coords[(1, i)]
    }

    /// Homogeneous coordinate of point `i`.
    pub fn w(&self, i: usize) -> f64 {
        self.coords[(2, i)]
    }

    /// Cartesian view of the first two rows.
    pub fn xy(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords.column_iter().map(|c| (c[0], c[1]))
    }
}
