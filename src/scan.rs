use crate::geometry::within_radius;
use crate::membership::ClusterMembership;
use crate::point::Point;

/// Result of one neighbor scan around an anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborScan {
    /// Count of all neighbors within the radius, assigned or not.
    pub total: usize,
    /// Neighbors not yet present in the membership table, in the order they
    /// were encountered in the snapshot.
    pub new_neighbors: Vec<Point>,
    /// Count of neighbors already present in the membership table.
    pub already_assigned: usize,
}

impl NeighborScan {
    /// The early-exit condition of the worklist driver: every neighbor of the
    /// anchor is already assigned, so expanding it again gains nothing. Note
    /// this also holds for an anchor with no neighbors at all (`total == 0`).
    pub fn saturated(&self) -> bool {
        self.already_assigned == self.total
    }
}

/// Scan `points` for neighbors of `anchor` within `radius`, partitioned by
/// membership. Pure function of its snapshot inputs; the anchor itself is
/// excluded by id, so a stale anchor position scans like any other point.
pub fn scan(
    anchor: &Point,
    points: &[Point],
    radius: f64,
    membership: &ClusterMembership,
) -> NeighborScan {
    let mut total = 0;
    let mut already_assigned = 0;
    let mut new_neighbors = Vec::new();

    for p in points {
        if p.id == anchor.id {
            continue;
        }
        if within_radius(anchor.position(), p.position(), radius) {
            total += 1;
            if membership.contains(p.id) {
                already_assigned += 1;
            } else {
                new_neighbors.push(*p);
            }
        }
    }

    NeighborScan {
        total,
        new_neighbors,
        already_assigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(i as u32, x, y))
            .collect()
    }

    #[test]
    fn test_anchor_excluded() {
        let pts = points(&[(0.0, 0.0)]);
        let result = scan(&pts[0], &pts, 100.0, &ClusterMembership::new());
        assert_eq!(result.total, 0);
        assert!(result.new_neighbors.is_empty());
        assert!(result.saturated());
    }

    #[test]
    fn test_partition_by_membership() {
        let pts = points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (50.0, 0.0)]);
        let mut membership = ClusterMembership::new();
        membership.insert(1, 0);

        let result = scan(&pts[0], &pts, 10.0, &membership);
        assert_eq!(result.total, 2);
        assert_eq!(result.already_assigned, 1);
        assert_eq!(result.new_neighbors.len(), 1);
        assert_eq!(result.new_neighbors[0].id, 2);
        assert!(!result.saturated());
    }

    #[test]
    fn test_boundary_inclusive() {
        let pts = points(&[(0.0, 0.0), (3.0, 4.0)]);
        let result = scan(&pts[0], &pts, 5.0, &ClusterMembership::new());
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_new_neighbors_in_encounter_order() {
        let pts = points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)]);
        let result = scan(&pts[0], &pts, 2.0, &ClusterMembership::new());
        let ids: Vec<u32> = result.new_neighbors.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_saturated_when_all_assigned() {
        let pts = points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let mut membership = ClusterMembership::new();
        membership.insert(1, 0);
        membership.insert(2, 0);
        let result = scan(&pts[0], &pts, 2.0, &membership);
        assert_eq!(result.total, 2);
        assert!(result.saturated());
    }
}
