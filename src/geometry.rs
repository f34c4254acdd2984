use glam::Vec3;

/// Default tolerance for [`is_flat`]. A stack whose up vector deviates more
/// than this from world up (in dot-product terms) is considered tilted.
pub const FLAT_EPSILON: f32 = 0.005;

/// Closest point to `point` on the segment `start..end`.
pub fn closest_point_on_segment(point: Vec3, start: Vec3, end: Vec3) -> Vec3 {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return start;
    }
    let direction = delta / length;
    let t = (point - start).dot(direction).clamp(0.0, length);
    start + direction * t
}

/// Lateral distance of `pos` from a stack's center axis, which starts at
/// `origin` and runs one unit along `up`.
pub fn distance_to_axis(pos: Vec3, origin: Vec3, up: Vec3) -> f32 {
    pos.distance(closest_point_on_segment(pos, origin, origin + up))
}

/// Whether an up vector points (almost) straight up.
pub fn is_flat(up: Vec3, epsilon: f32) -> bool {
    up.normalize_or_zero().dot(Vec3::Y) > 1.0 - epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_closest_point_projects_inside_segment() {
        let p = closest_point_on_segment(Vec3::new(1.0, 0.5, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let below = closest_point_on_segment(Vec3::new(0.3, -2.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(below.abs_diff_eq(Vec3::ZERO, 1e-6));
        let above = closest_point_on_segment(Vec3::new(0.3, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(above.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_closest_point_degenerate_segment() {
        let p = closest_point_on_segment(Vec3::ONE, Vec3::X, Vec3::X);
        assert_eq!(p, Vec3::X);
    }

    #[test]
    fn test_distance_to_axis_is_lateral_offset() {
        let d = distance_to_axis(Vec3::new(0.03, 0.2, 0.04), Vec3::ZERO, Vec3::Y);
        assert!(approx(d, 0.05));
    }

    #[test]
    fn test_distance_to_axis_follows_tilted_axis() {
        // Axis along +X: a point straight above the origin is off-axis by its height.
        let d = distance_to_axis(Vec3::new(0.5, 0.25, 0.0), Vec3::ZERO, Vec3::X);
        assert!(approx(d, 0.25));
    }

    #[test]
    fn test_is_flat() {
        assert!(is_flat(Vec3::Y, FLAT_EPSILON));
        assert!(is_flat(Vec3::new(0.0, 3.0, 0.0), FLAT_EPSILON));
        let slight = Quat::from_rotation_x(0.05) * Vec3::Y;
        assert!(is_flat(slight, FLAT_EPSILON));
        let tilted = Quat::from_rotation_z(0.2) * Vec3::Y;
        assert!(!is_flat(tilted, FLAT_EPSILON));
        assert!(!is_flat(Vec3::NEG_Y, FLAT_EPSILON));
        assert!(!is_flat(Vec3::ZERO, FLAT_EPSILON));
    }
}
