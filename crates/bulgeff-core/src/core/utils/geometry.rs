use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Signed dihedral angle, in radians within `(-pi, pi]`, defined by four points.
///
/// The bond `p2 -> p3` is the rotation axis. Both outer bonds are projected onto
/// the plane perpendicular to it and the signed angle between the projections is
/// taken with `atan2`.
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p1 - p2;
    let b2 = (p3 - p2).normalize();
    let b3 = p4 - p3;

    let v = b1 - b2 * b1.dot(&b2);
    let w = b3 - b2 * b3.dot(&b2);

    let x = v.dot(&w);
    let y = b2.cross(&v).dot(&w);
    y.atan2(x)
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Computes the rigid transform that best maps `from_points` onto `to_points`.
///
/// Uses the Kabsch algorithm (SVD of the cross-covariance matrix, with a sign
/// correction against reflections). The result satisfies
/// `to ~= rotation * from + translation` in the least-squares sense.
///
/// Returns `None` if the point sets are empty, differ in length, or contain a
/// non-finite coordinate.
pub fn calculate_transformation(
    from_points: &[Point3<f64>],
    to_points: &[Point3<f64>],
) -> Option<(Rotation3<f64>, Vector3<f64>)> {
    if from_points.len() != to_points.len() {
        return None;
    }
    let finite = |p: &Point3<f64>| p.coords.iter().all(|c| c.is_finite());
    if !from_points.iter().chain(to_points).all(finite) {
        return None;
    }
    let from_centroid = centroid(from_points)?;
    let to_centroid = centroid(to_points)?;

    let h = from_points
        .iter()
        .zip(to_points.iter())
        .fold(Matrix3::zeros(), |acc, (f, t)| {
            acc + (t - to_centroid) * (f - from_centroid).transpose()
        });

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    let d = (u * v_t).determinant();
    let mut correction = Matrix3::identity();
    if d < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = Rotation3::from_matrix_unchecked(u * correction * v_t);
    let translation = to_centroid.coords - rotation * from_centroid.coords;
    Some((rotation, translation))
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMSD between two paired point sets after optimally superposing `mobile` onto `target`.
///
/// Returns `None` if the sets are empty, differ in length, or contain a
/// non-finite coordinate.
pub fn superposed_rmsd(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Option<f64> {
    let (rotation, translation) = calculate_transformation(mobile, target)?;
    let moved: Vec<Point3<f64>> = mobile
        .iter()
        .map(|p| rotation * p + translation)
        .collect();
    calculate_rmsd(&moved, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.2, -0.3),
            Point3::new(2.1, 1.7, 0.4),
            Point3::new(3.9, 1.1, 1.8),
            Point3::new(4.2, -0.6, 2.5),
            Point3::new(5.8, 0.3, 3.1),
        ]
    }

    #[test]
    fn dihedral_of_cis_arrangement_is_zero() {
        let angle = dihedral_angle(
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 1.0, 1.0),
        );
        assert!(angle.abs() < EPS);
    }

    #[test]
    fn dihedral_of_trans_arrangement_is_pi() {
        let angle = dihedral_angle(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(-1.0, 0.0, 1.0),
        );
        assert!((angle.abs() - PI).abs() < EPS);
    }

    #[test]
    fn dihedral_sign_follows_rotation_direction() {
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);

        let positive = dihedral_angle(&p1, &p2, &p3, &Point3::new(0.0, 1.0, 1.0));
        let negative = dihedral_angle(&p1, &p2, &p3, &Point3::new(0.0, -1.0, 1.0));

        assert!((positive - FRAC_PI_2).abs() < EPS);
        assert!((negative + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(centroid(&[]).is_none());
        assert_eq!(
            centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)]),
            Some(Point3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn calculate_rmsd_returns_none_for_mismatched_lengths() {
        let a = vec![Point3::origin()];
        let b = vec![Point3::origin(), Point3::origin()];
        assert!(calculate_rmsd(&a, &b).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }

    #[test]
    fn calculate_rmsd_of_uniform_shift_equals_shift_length() {
        let a = sample_points();
        let b: Vec<_> = a.iter().map(|p| p + Vector3::new(3.0, 4.0, 0.0)).collect();
        assert!((calculate_rmsd(&a, &b).unwrap() - 5.0).abs() < EPS);
    }

    #[test]
    fn transformation_recovers_known_rigid_motion() {
        let target = sample_points();
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(1.0, -2.0, 0.5)),
            1.1,
        );
        let shift = Vector3::new(-7.0, 2.5, 10.0);
        let mobile: Vec<_> = target.iter().map(|p| rotation * p + shift).collect();

        let (r, t) = calculate_transformation(&mobile, &target).unwrap();
        for (m, expected) in mobile.iter().zip(target.iter()) {
            assert!(((r * m + t) - expected).norm() < 1e-8);
        }
    }

    #[test]
    fn superposed_rmsd_of_rigidly_moved_copy_is_zero() {
        let target = sample_points();
        let rotation = Rotation3::from_euler_angles(0.3, -1.2, 2.4);
        let mobile: Vec<_> = target
            .iter()
            .map(|p| rotation * p + Vector3::new(1.0, 2.0, 3.0))
            .collect();

        assert!(superposed_rmsd(&mobile, &target).unwrap() < 1e-8);
    }

    #[test]
    fn superposition_does_not_use_reflections() {
        let target = sample_points();
        let mirrored: Vec<_> = target.iter().map(|p| Point3::new(-p.x, p.y, p.z)).collect();

        let rmsd = superposed_rmsd(&mirrored, &target).unwrap();
        assert!(rmsd > 1e-3);
    }

    #[test]
    fn superposed_rmsd_never_exceeds_raw_rmsd() {
        let target = sample_points();
        let mut mobile = target.clone();
        mobile[2] += Vector3::new(0.8, -0.4, 0.2);
        mobile[4] += Vector3::new(-0.3, 0.9, 0.0);

        let raw = calculate_rmsd(&mobile, &target).unwrap();
        let superposed = superposed_rmsd(&mobile, &target).unwrap();
        assert!(superposed <= raw + EPS);
        assert!(superposed > 0.0);
    }

    #[test]
    fn superposed_rmsd_returns_none_for_mismatched_sets() {
        let target = sample_points();
        assert!(superposed_rmsd(&target[..3], &target).is_none());
    }

    #[test]
    fn non_finite_points_have_no_superposition() {
        let target = sample_points();
        let mut mobile = target.clone();
        mobile[1] = Point3::new(f64::NAN, 0.2, -0.3);
        assert!(superposed_rmsd(&mobile, &target).is_none());

        mobile[1] = Point3::new(1.5, f64::INFINITY, -0.3);
        assert!(calculate_transformation(&mobile, &target).is_none());
    }
}
