//! Waypoint node graph for pedestrian navigation
//!
//! Two authored loops (outer street, inner shop perimeter) are each closed
//! into a cycle, instantiated twice (North and South lanes, the South copy
//! reversed) and merged into one id-keyed table. A few park nodes are
//! spliced into the outer loop by hand to form shortcut paths.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::{LANE_OFFSET_NORTH, LANE_OFFSET_SOUTH, TILE_SIZE};

/// Stable handle into the graph's node table
pub type NodeIndex = usize;

/// Hops taken when deriving a walking route. Long enough that a walker will
/// have despawned before running out; not a cycle-closure guarantee.
pub const ROUTE_HOPS: usize = 20;

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub position: Vec2,
    /// Outgoing edges, in insertion order. The order matters: route
    /// derivation prefers the first edge and falls back to the last.
    pub connections: Vec<NodeIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    North,
    South,
}

impl Lane {
    fn suffix(self) -> &'static str {
        match self {
            Lane::North => "North",
            Lane::South => "South",
        }
    }

    fn offset(self) -> f32 {
        match self {
            Lane::North => LANE_OFFSET_NORTH,
            Lane::South => LANE_OFFSET_SOUTH,
        }
    }
}

/// The full navigation graph, built once at world start.
#[derive(Debug)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    by_id: HashMap<String, NodeIndex>,
}

/// Authored waypoint in 1-based grid coordinates
struct Waypoint(&'static str, f32, f32);

const OUTER_LOOP: &[Waypoint] = &[
    Waypoint("OffscreenTopLeft", 6.0, -1.0),
    Waypoint("CarParkTopRight", 6.0, 6.0),
    Waypoint("CarParkTopLeft", -1.0, 6.0),
    Waypoint("CarParkBottomLeft", -1.0, 15.0),
    Waypoint("CarParkBottomRight", 6.0, 15.0),
    Waypoint("BottomStreetLeft", 6.0, 18.0),
    Waypoint("LeftBeach", 8.0, 18.0),
    Waypoint("MiddleBeach", 16.0, 18.0),
    Waypoint("RightBeach", 25.0, 18.0),
    Waypoint("OffscreenBottomRight", 33.0, 18.0),
    Waypoint("OffscreenBottomLeft", 33.0, 16.0),
    Waypoint("ParkBottomRight", 30.0, 16.0),
    Waypoint("ParkBottomMiddle", 25.0, 16.0),
    Waypoint("ParkBottomLeft", 20.0, 16.0),
    Waypoint("ParkMiddleLeft", 20.0, 13.0),
    Waypoint("ParkTopLeft", 20.0, 9.0),
    Waypoint("TopStreetRight", 14.0, 9.0),
    Waypoint("TopStreetMiddleRight", 14.0, 8.0),
    Waypoint("TopStreetMiddleLeft", 13.0, 7.0),
    Waypoint("TopStreetMiddleTop", 12.0, 6.0),
    Waypoint("TopStreetLeft", 8.0, 6.0),
    Waypoint("OffscreenTopRight", 8.0, -1.0),
];

const INNER_LOOP: &[Waypoint] = &[
    Waypoint("ShopTopLeft", 8.0, 8.0),
    Waypoint("ShopBottomLeft", 8.0, 16.0),
    Waypoint("ShopBottomRight", 18.0, 16.0),
    Waypoint("ShopTopRight", 18.0, 11.0),
    Waypoint("ShopRightCorner", 12.0, 11.0),
    Waypoint("ShopCornerMiddle", 12.0, 9.0),
    Waypoint("ShopLeftCorner", 10.5, 9.0),
];

impl NodeGraph {
    pub fn build() -> Self {
        let mut graph = NodeGraph {
            nodes: Vec::new(),
            by_id: HashMap::new(),
        };

        for lane in [Lane::North, Lane::South] {
            graph.add_outer_loop(lane);
            graph.add_loop(INNER_LOOP, lane);
        }

        log::info!("node graph built: {} nodes", graph.nodes.len());
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Look a node up by id. Unknown ids are a miss, never a panic.
    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Derive a walking route starting at the node with the given id.
    ///
    /// From the most recently added node, take its first connection; if that
    /// would step straight back to the node two entries prior (junctions
    /// have 2+ edges, so naive "always first" oscillates between two
    /// neighbors), take the last connection instead. Always returns
    /// `ROUTE_HOPS + 1` entries for a valid id.
    pub fn route_from(&self, id: &str) -> Option<Vec<NodeIndex>> {
        let start = self.find_node(id)?;
        let mut route = Vec::with_capacity(ROUTE_HOPS + 1);
        route.push(start);

        for hop in 0..ROUTE_HOPS {
            let current = &self.nodes[*route.last().expect("route never empty")];
            let mut next = *current.connections.first()?;

            if hop > 0 && next == route[hop - 1] {
                next = *current.connections.last()?;
            }

            route.push(next);
        }

        Some(route)
    }

    /// Add a node and register its id. Duplicate ids would shadow each other
    /// in the lookup table, so they are rejected loudly in debug builds.
    fn push_node(&mut self, id: String, position: Vec2) -> NodeIndex {
        debug_assert!(!self.by_id.contains_key(&id), "duplicate node id {id}");
        let index = self.nodes.len();
        self.by_id.insert(id.clone(), index);
        self.nodes.push(Node {
            id,
            position,
            connections: Vec::new(),
        });
        index
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex) {
        self.nodes[from].connections.push(to);
    }

    /// Link `a -> b` and `b -> a`
    fn connect_both(&mut self, a: NodeIndex, b: NodeIndex) {
        self.connect(a, b);
        self.connect(b, a);
    }

    /// Map an authored grid coordinate to world units. The tables are
    /// 1-based because they were written against the tile map by eye.
    fn world_position(waypoint: &Waypoint, lane: Lane) -> Vec2 {
        Vec2::new(
            (waypoint.1 - 1.0) * TILE_SIZE + lane.offset(),
            (waypoint.2 - 1.0) * TILE_SIZE + lane.offset(),
        )
    }

    /// Instantiate a closed loop for one lane: sequential bidirectional
    /// edges plus a closing edge between last and first. The South copy is
    /// reversed so traffic runs the opposite way round.
    fn add_loop(&mut self, waypoints: &[Waypoint], lane: Lane) -> Vec<NodeIndex> {
        let ordered: Vec<&Waypoint> = match lane {
            Lane::North => waypoints.iter().collect(),
            Lane::South => waypoints.iter().rev().collect(),
        };

        let indices: Vec<NodeIndex> = ordered
            .iter()
            .map(|w| self.push_node(format!("{}{}", w.0, lane.suffix()), Self::world_position(w, lane)))
            .collect();

        for pair in indices.windows(2) {
            self.connect_both(pair[0], pair[1]);
        }
        if indices.len() > 1 {
            let (first, last) = (indices[0], *indices.last().expect("non-empty loop"));
            self.connect(last, first);
            self.connect(first, last);
        }

        indices
    }

    /// The outer loop plus the hand-spliced park shortcuts. The shortcut
    /// edges are intentionally asymmetric; only the loop itself guarantees
    /// A->B implies B->A.
    fn add_outer_loop(&mut self, lane: Lane) {
        let loop_indices = self.add_loop(OUTER_LOOP, lane);

        // Splice indices refer to the authored (North) ordering
        let authored = |i: usize| match lane {
            Lane::North => loop_indices[i],
            Lane::South => loop_indices[OUTER_LOOP.len() - 1 - i],
        };

        let park_middle_right = self.push_node(
            format!("ParkMiddleRight{}", lane.suffix()),
            Self::world_position(&Waypoint("ParkMiddleRight", 30.0, 12.0), lane),
        );
        let park_top_right = self.push_node(
            format!("ParkTopRight{}", lane.suffix()),
            Self::world_position(&Waypoint("ParkTopRight", 30.0, 9.0), lane),
        );
        let park_middle = self.push_node(
            format!("ParkMiddle{}", lane.suffix()),
            Self::world_position(&Waypoint("ParkMiddle", 25.0, 12.5), lane),
        );

        self.connect(park_middle_right, park_middle);
        self.connect(park_middle_right, park_top_right);
        self.connect(park_middle_right, authored(11));

        self.connect(park_top_right, park_middle_right);
        self.connect(park_top_right, authored(15));

        self.connect(park_middle, park_middle_right);
        self.connect(park_middle, authored(13));
        self.connect(park_middle, authored(14));
    }
}
