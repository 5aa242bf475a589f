/// Squared Euclidean distance between two 2D positions.
///
/// Kept separate from [`within_radius`] so callers that only need an ordering
/// (e.g. nearest-point erasure) can skip the square root.
pub fn squared_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Whether `b` lies within `radius` of `a`, boundary inclusive.
///
/// The comparison is `sqrt(d2) <= radius` rather than `d2 <= radius * radius`.
/// Mathematically equivalent, but the rounding behavior at the boundary is
/// part of the engine's observable contract, so it stays in this exact form.
pub fn within_radius(a: [f64; 2], b: [f64; 2], radius: f64) -> bool {
    squared_distance(a, b).sqrt() <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance([0.0, 0.0], [3.0, 4.0]), 25.0);
        assert_eq!(squared_distance([1.0, 1.0], [1.0, 1.0]), 0.0);
        assert_eq!(squared_distance([-2.0, 0.0], [2.0, 0.0]), 16.0);
    }

    #[test]
    fn test_within_radius_boundary_inclusive() {
        // Exactly on the boundary counts as a neighbor.
        assert!(within_radius([0.0, 0.0], [3.0, 4.0], 5.0));
        assert!(within_radius([0.0, 0.0], [3.0, 4.0], 5.1));
        assert!(!within_radius([0.0, 0.0], [3.0, 4.0], 4.9));
    }
}
