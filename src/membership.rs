use crate::point::PointId;
use std::collections::HashMap;

/// Sparse mapping from point id to cluster index.
///
/// Presence means "assigned to a cluster"; absence means unassigned (noise so
/// far). Grows monotonically during one run and is cleared wholesale at run
/// start and run end. Cluster indices are 0-based in discovery order.
#[derive(Debug, Default, Clone)]
pub struct ClusterMembership {
    assigned: HashMap<PointId, usize>,
}

impl ClusterMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` into cluster `cluster`. First assignment wins; the
    /// engine never reassigns a point within a run.
    pub fn insert(&mut self, id: PointId, cluster: usize) {
        self.assigned.entry(id).or_insert(cluster);
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.assigned.contains_key(&id)
    }

    pub fn get(&self, id: PointId) -> Option<usize> {
        self.assigned.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn clear(&mut self) {
        self.assigned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_after_insert() {
        let mut m = ClusterMembership::new();
        assert!(!m.contains(7));
        m.insert(7, 0);
        assert!(m.contains(7));
        assert_eq!(m.get(7), Some(0));
    }

    #[test]
    fn test_first_assignment_wins() {
        let mut m = ClusterMembership::new();
        m.insert(3, 0);
        m.insert(3, 5);
        assert_eq!(m.get(3), Some(0));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut m = ClusterMembership::new();
        m.insert(1, 0);
        m.insert(2, 1);
        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains(1));
    }
}
