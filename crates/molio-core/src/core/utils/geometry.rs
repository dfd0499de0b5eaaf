use nalgebra::{Matrix3, Vector3};

/// Cosine of an angle in degrees, exact for right angles.
pub fn cos_degrees(angle: f64) -> f64 {
    if angle == 90.0 {
        0.0
    } else {
        angle.to_radians().cos()
    }
}

/// Sine of an angle in degrees, exact for right angles.
pub fn sin_degrees(angle: f64) -> f64 {
    if angle == 90.0 {
        1.0
    } else {
        angle.to_radians().sin()
    }
}

/// Angle between two vectors in degrees.
///
/// Returns `None` when either vector has zero length.
pub fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<f64> {
    let norms = u.norm() * v.norm();
    if norms == 0.0 {
        return None;
    }
    let cosine = (u.dot(v) / norms).clamp(-1.0, 1.0);
    Some(cosine.acos().to_degrees())
}

pub fn is_diagonal(matrix: &Matrix3<f64>) -> bool {
    (0..3).all(|i| (0..3).all(|j| i == j || matrix[(i, j)] == 0.0))
}

/// Rounds to the nearest integer, ties away from zero.
pub fn round_half_away(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angles_are_exact() {
        assert_eq!(cos_degrees(90.0), 0.0);
        assert_eq!(sin_degrees(90.0), 1.0);
        assert!((cos_degrees(60.0) - 0.5).abs() < 1e-12);
        assert!((sin_degrees(30.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn angle_between_orthogonal_and_parallel_vectors() {
        let x = Vector3::x();
        let y = Vector3::y();
        assert!((angle_between(&x, &y).unwrap() - 90.0).abs() < 1e-12);
        assert!(angle_between(&x, &(x * 3.0)).unwrap().abs() < 1e-6);
        assert!((angle_between(&x, &-x).unwrap() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn angle_between_zero_vector_is_undefined() {
        assert!(angle_between(&Vector3::zeros(), &Vector3::x()).is_none());
    }

    #[test]
    fn diagonal_detection() {
        assert!(is_diagonal(&Matrix3::from_diagonal(&Vector3::new(
            1.0, 2.0, 3.0
        ))));
        let mut m = Matrix3::identity();
        m[(1, 0)] = 1e-300;
        assert!(!is_diagonal(&m));
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(round_half_away(0.5), 1.0);
        assert_eq!(round_half_away(-0.5), -1.0);
        assert_eq!(round_half_away(-1.5), -2.0);
        assert_eq!(round_half_away(0.49), 0.0);
    }
}
