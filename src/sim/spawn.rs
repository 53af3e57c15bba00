//! Spawn registry
//!
//! A fixed list of named spawn locations: three static-only car-park slots
//! plus one point per graph node. Actors claim a point exclusively for
//! their active lifetime; a point must never be double-claimed.

use glam::Vec2;

use super::graph::NodeGraph;

/// Stable handle into the registry
pub type SpawnPointId = usize;

#[derive(Debug, Clone)]
pub struct SpawnPoint {
    pub id: String,
    pub position: Vec2,
    pub allows_static: bool,
    occupied: bool,
}

impl SpawnPoint {
    pub fn occupied(&self) -> bool {
        self.occupied
    }
}

#[derive(Debug)]
pub struct SpawnRegistry {
    points: Vec<SpawnPoint>,
}

impl SpawnRegistry {
    /// Build the registry: the car-park slots first, then one non-static
    /// point per graph node sharing the node's id and position.
    pub fn build(graph: &NodeGraph) -> Self {
        let mut points = vec![
            SpawnPoint {
                id: "CarParkStaticLeft".into(),
                position: Vec2::new(0.0, 404.0),
                allows_static: true,
                occupied: false,
            },
            SpawnPoint {
                id: "CarParkStaticMiddle".into(),
                position: Vec2::new(64.0, 404.0),
                allows_static: true,
                occupied: false,
            },
            SpawnPoint {
                id: "CarParkStaticRight".into(),
                position: Vec2::new(128.0, 404.0),
                allows_static: true,
                occupied: false,
            },
        ];

        for node in graph.nodes() {
            points.push(SpawnPoint {
                id: node.id.clone(),
                position: node.position,
                allows_static: false,
                occupied: false,
            });
        }

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, id: SpawnPointId) -> &SpawnPoint {
        &self.points[id]
    }

    /// Handles of every vacant point matching the filter
    pub fn vacant_where(&self, filter: impl Fn(&SpawnPoint) -> bool) -> Vec<SpawnPointId> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.occupied && filter(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Claim a point for a spawning actor. Returns false if it was already
    /// held; callers treat that as "no spawn this frame".
    pub fn claim(&mut self, id: SpawnPointId) -> bool {
        let point = &mut self.points[id];
        if point.occupied {
            log::warn!("spawn point {} double-claim refused", point.id);
            return false;
        }
        point.occupied = true;
        true
    }

    pub fn vacate(&mut self, id: SpawnPointId) {
        self.points[id].occupied = false;
    }

    #[cfg(test)]
    pub fn occupied_count(&self) -> usize {
        self.points.iter().filter(|p| p.occupied).count()
    }
}
