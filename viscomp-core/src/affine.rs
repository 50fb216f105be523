/// 2D affine transformations in homogeneous coordinates
///
/// Every matrix here is 3x3 and acts on points stored as `(x, y, 1)` columns,
/// so translation, rotation and scaling all compose by matrix product.
use nalgebra::Matrix3;
use std::f64::consts::TAU;

use crate::shape::PointSet;

/// Translation by `(tx, ty)`.
pub fn translation(tx: f64, ty: f64) -> Matrix3<f64> {
    Matrix3::new(
        1.0, 0.0, tx, //
        0.0, 1.0, ty, //
        0.0, 0.0, 1.0,
    )
}

/// Counter-clockwise rotation about the origin, `theta` in radians.
pub fn rotation(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Non-uniform scale along the axes. Pass `sx == sy` for a uniform scale.
pub fn scale(sx: f64, sy: f64) -> Matrix3<f64> {
    Matrix3::new(
        sx, 0.0, 0.0, //
        0.0, sy, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Animation parameters for a time sample `t` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub tx: f64,
    pub ty: f64,
    /// Radians.
    pub angle: f64,
    pub scale: f64,
}

impl FrameParams {
    /// Oscillating x translation in `[-3, 3]`, one full turn, pulsing scale in `[0.4, 1.2]`.
    pub fn at(t: f64) -> Self {
        let phase = TAU * t;
        Self {
            tx: 3.0 * phase.sin(),
            ty: 0.0,
            angle: phase,
            scale: 0.8 + 0.4 * phase.sin(),
        }
    }

    /// `T · R · S`: applied right to left, so the shape is scaled, then rotated, then translated.
    pub fn matrix(&self) -> Matrix3<f64> {
        translation(self.tx, self.ty) * rotation(self.angle) * scale(self.scale, self.scale)
    }
}

/// Combined matrix for time sample `t`.
pub fn compose(t: f64) -> Matrix3<f64> {
    FrameParams::at(t).matrix()
}

/// Apply `m` to every column of the homogeneous point set.
pub fn apply(m: &Matrix3<f64>, points: &PointSet) -> PointSet {
    PointSet::from_homogeneous(m * points.homogeneous())
}

/// Row-major rendering of `m` rounded to `decimals` places.
pub fn format_matrix(m: &Matrix3<f64>, decimals: usize) -> String {
    let cells: Vec<String> = m
        .iter()
        .map(|v| {
            let factor = 10f64.powi(decimals as i32);
            let rounded = (v * factor).round() / factor;
            // avoid printing "-0.000"
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            format!("{:.*}", decimals, rounded)
        })
        .collect();
    let width = cells.iter().map(String::len).max().unwrap_or(0);

    // nalgebra iterates column-major
    let mut out = String::new();
    for row in 0..3 {
        out.push(if row == 0 { '[' } else { ' ' });
        out.push('[');
        for col in 0..3 {
            if col > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{:>width$}", cells[col * 3 + row], width = width));
        }
        out.push(']');
        if row == 2 {
            out.push(']');
        } else {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn cat() -> PointSet {
        PointSet::cat()
    }

    #[test]
    fn test_translation_moves_points() {
        let points = PointSet::from_xy(&[(1.0, 2.0), (-3.5, 0.25)]);
        let moved = apply(&translation(2.0, -1.0), &points);
        assert!((moved.x(0) - 3.0).abs() < EPS);
        assert!((moved.y(0) - 1.0).abs() < EPS);
        assert!((moved.x(1) + 1.5).abs() < EPS);
        assert!((moved.y(1) + 0.75).abs() < EPS);
    }

    #[test]
    fn test_translation_inverse_is_identity() {
        let m = translation(4.2, -7.0) * translation(-4.2, 7.0);
        assert!((m - Matrix3::identity()).norm() < EPS);
    }

    #[test]
    fn test_identity_constructors() {
        assert!((rotation(0.0) - Matrix3::identity()).norm() < EPS);
        assert!((scale(1.0, 1.0) - Matrix3::identity()).norm() < EPS);
    }

    #[test]
    fn test_rotation_inverse_is_identity() {
        for theta in [0.1, 1.0, 2.5, -4.0] {
            let m = rotation(theta) * rotation(-theta);
            assert!((m - Matrix3::identity()).norm() < EPS);
        }
    }

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let points = PointSet::from_xy(&[(1.0, 0.0)]);
        let rotated = apply(&rotation(FRAC_PI_2), &points);
        assert!(rotated.x(0).abs() < EPS);
        assert!((rotated.y(0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_compose_at_start_is_pure_scale() {
        assert!((compose(0.0) - scale(0.8, 0.8)).norm() < EPS);
    }

    #[test]
    fn test_params_at_quarter() {
        let p = FrameParams::at(0.25);
        assert!((p.tx - 3.0).abs() < EPS);
        assert_eq!(p.ty, 0.0);
        assert!((p.angle - FRAC_PI_2).abs() < EPS);
        assert!((p.scale - 1.2).abs() < EPS);

        let expected = translation(3.0, 0.0) * rotation(FRAC_PI_2) * scale(1.2, 1.2);
        assert!((compose(0.25) - expected).norm() < EPS);
    }

    #[test]
    fn test_scale_stays_positive() {
        for i in 0..1000 {
            let s = FrameParams::at(i as f64 / 1000.0).scale;
            assert!(s >= 0.4 - EPS && s <= 1.2 + EPS);
        }
    }

    #[test]
    fn test_apply_preserves_shape_of_point_set() {
        let original = cat();
        for i in 0..60 {
            let transformed = apply(&compose(i as f64 / 60.0), &original);
            assert_eq!(transformed.len(), original.len());
            for c in 0..transformed.len() {
                assert!((transformed.w(c) - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_composition_order_matters() {
        let (t, r, s) = (translation(3.0, 0.0), rotation(FRAC_PI_2), scale(1.2, 1.2));
        let points = PointSet::from_xy(&[(1.0, 0.0)]);

        let trs = apply(&(t * r * s), &points);
        let srt = apply(&(s * r * t), &points);
        // T·R·S: (1,0) -> (1.2,0) -> (0,1.2) -> (3,1.2)
        assert!((trs.x(0) - 3.0).abs() < EPS);
        assert!((trs.y(0) - 1.2).abs() < EPS);
        // S·R·T: (1,0) -> (4,0) -> (0,4) -> (0,4.8)
        assert!(srt.x(0).abs() < EPS);
        assert!((srt.y(0) - 4.8).abs() < EPS);

        // Without translation the order of R and uniform S commutes
        let rs = apply(&(r * s), &points);
        let sr = apply(&(s * r), &points);
        assert!((rs.x(0) - sr.x(0)).abs() < EPS);
        assert!((rs.y(0) - sr.y(0)).abs() < EPS);
    }

    #[test]
    fn test_format_matrix() {
        let text = format_matrix(&compose(0.0), 3);
        assert_eq!(
            text,
            "[[0.800 0.000 0.000]\n [0.000 0.800 0.000]\n [0.000 0.000 1.000]]"
        );
    }

    #[test]
    fn test_format_matrix_is_row_major() {
        let text = format_matrix(&translation(2.0, -1.5), 3);
        let first = text.lines().next().unwrap();
        assert!(first.ends_with("2.000]"));
        assert!(!text.contains("-0.000"));
        assert!(text.contains("-1.500"));
    }
}
