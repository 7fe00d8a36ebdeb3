//! Bounded continuous 2D environment with movement tracking.
//!
//! [`SmartcamEnvironment`] places nodes inside a `width x height` rectangle
//! centred on the origin. A node fits a position when its whole disc stays
//! strictly inside the rectangle. Every successful move adds the distance
//! travelled to one of two counters: one for nodes carrying the camera
//! filter molecule, one for everyone else. The counters reset when queried.
//!
//! [`SmartcamEnvironment::step`] executes the nodes' actions once:
//! `InitHeading` orients its node and removes itself from its reaction,
//! `RandomTarget` jumps its node to a random nearby target. Vision actions are
//! left to the renderers.

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smartcam_geom::kurbo::{Point, Vec2};
use tracing::debug;

use crate::host::{EuclideanPhysics2D, Environment, Molecule, Node, NodeId, ShapeFactory};
use crate::model::node::{SimAction, SimNode};
use crate::model::shape::CircleFactory;

/// Heading of a node nobody has oriented yet.
pub const DEFAULT_HEADING: Vec2 = Vec2::new(1.0, 0.0);

// ---------------------------------------------------------------------------
// EnvironmentError
// ---------------------------------------------------------------------------

/// Errors produced by environment mutations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EnvironmentError {
    /// Boundaries must be positive and finite.
    #[error("invalid boundaries {width} x {height}")]
    InvalidBoundaries { width: f64, height: f64 },

    /// A node with this id is already placed.
    #[error("{0} is already in the environment")]
    DuplicateNode(NodeId),

    /// No node with this id is placed.
    #[error("{0} is not in the environment")]
    UnknownNode(NodeId),

    /// The node's disc would not fit inside the boundaries at `position`.
    #[error("{node} of diameter {diameter} does not fit at {position:?}")]
    OutOfBounds {
        node: NodeId,
        position: Point,
        diameter: f64,
    },
}

// ---------------------------------------------------------------------------
// Random targets
// ---------------------------------------------------------------------------

/// Sample a Lévy-distributed distance: `location + scale / z^2` with `z`
/// standard normal (Box-Muller). Infinite when `z` is exactly zero.
pub fn sample_levy<R: Rng + ?Sized>(rng: &mut R, location: f64, scale: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    location + scale / (z * z)
}

/// A target `distance` away from `from` in a uniformly random direction.
pub fn random_target<R: Rng + ?Sized>(rng: &mut R, from: Point, distance: f64) -> Point {
    let angle = rng.gen_range(0.0..TAU);
    from + Vec2::from_angle(angle) * distance
}

/// What one [`SmartcamEnvironment::step`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// `InitHeading` actions executed and removed.
    pub headings_initialized: usize,
    /// Random-target moves that were accepted.
    pub moves: usize,
    /// Random-target moves refused by the boundaries or with a non-finite
    /// distance.
    pub refused_moves: usize,
}

// ---------------------------------------------------------------------------
// RectangularBoundaries
// ---------------------------------------------------------------------------

/// A `width x height` rectangle centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularBoundaries {
    pub width: f64,
    pub height: f64,
}

impl RectangularBoundaries {
    /// Whether a disc of `diameter` centred on `position` is strictly inside.
    pub fn fits(&self, position: Point, diameter: f64) -> bool {
        if !position.is_finite() {
            return false;
        }
        let r = diameter / 2.0;
        position.x.abs() + r < self.width / 2.0 && position.y.abs() + r < self.height / 2.0
    }
}

// ---------------------------------------------------------------------------
// SmartcamEnvironment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Placed {
    node: SimNode,
    position: Point,
    heading: Vec2,
}

/// Bounded 2D environment of cameras and objects.
#[derive(Debug, Clone)]
pub struct SmartcamEnvironment {
    boundaries: RectangularBoundaries,
    camera_filter: Molecule,
    placed: Vec<Placed>,
    index: HashMap<NodeId, usize>,
    shapes: CircleFactory,
    camera_movements: f64,
    object_movements: f64,
}

impl SmartcamEnvironment {
    /// Create an empty environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::InvalidBoundaries`] unless both extents
    /// are positive and finite.
    pub fn new(width: f64, height: f64, camera_filter: Molecule) -> Result<Self, EnvironmentError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(EnvironmentError::InvalidBoundaries { width, height });
        }
        Ok(Self {
            boundaries: RectangularBoundaries { width, height },
            camera_filter,
            placed: Vec::new(),
            index: HashMap::new(),
            shapes: CircleFactory,
            camera_movements: 0.0,
            object_movements: 0.0,
        })
    }

    /// The rectangle every node must fit in.
    pub fn boundaries(&self) -> RectangularBoundaries {
        self.boundaries
    }

    /// Molecule whose carriers count as cameras for movement tracking.
    pub fn camera_filter(&self) -> &Molecule {
        &self.camera_filter
    }

    /// Place `node` at `position` with the default heading.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::DuplicateNode`] if the id is taken,
    /// [`EnvironmentError::OutOfBounds`] if the node does not fit.
    pub fn add_node(&mut self, node: SimNode, position: Point) -> Result<(), EnvironmentError> {
        let id = node.id();
        if self.index.contains_key(&id) {
            return Err(EnvironmentError::DuplicateNode(id));
        }
        if !self.boundaries.fits(position, node.diameter()) {
            return Err(EnvironmentError::OutOfBounds {
                node: id,
                position,
                diameter: node.diameter(),
            });
        }
        self.index.insert(id, self.placed.len());
        self.placed.push(Placed {
            node,
            position,
            heading: DEFAULT_HEADING,
        });
        Ok(())
    }

    /// Remove a node, returning it if it was placed.
    pub fn remove_node(&mut self, id: NodeId) -> Option<SimNode> {
        let slot = self.index.remove(&id)?;
        let removed = self.placed.remove(slot);
        for idx in self.index.values_mut() {
            if *idx > slot {
                *idx -= 1;
            }
        }
        Some(removed.node)
    }

    /// The placed node with `id`, if any.
    pub fn node(&self, id: NodeId) -> Option<&SimNode> {
        self.slot(id).map(|p| &p.node)
    }

    /// Mutable access to a placed node. Position and heading stay with the
    /// environment.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
        let slot = *self.index.get(&id)?;
        Some(&mut self.placed[slot].node)
    }

    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.slot(id).map(|p| p.position)
    }

    pub fn heading_of(&self, id: NodeId) -> Option<Vec2> {
        self.slot(id).map(|p| p.heading)
    }

    /// Set the heading vector of a node.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::UnknownNode`] if the node is not placed.
    pub fn set_heading(&mut self, id: NodeId, heading: Vec2) -> Result<(), EnvironmentError> {
        let placed = self.slot_mut(id)?;
        placed.heading = heading;
        Ok(())
    }

    /// Orient a node at `angle` radians: heading `(cos angle, sin angle)`.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::UnknownNode`] if the node is not placed.
    pub fn init_heading(&mut self, id: NodeId, angle: f64) -> Result<(), EnvironmentError> {
        self.set_heading(id, Vec2::from_angle(angle))
    }

    /// Move a node and account the distance travelled.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::UnknownNode`] if the node is not placed,
    /// [`EnvironmentError::OutOfBounds`] if it does not fit at `position`.
    /// A refused move leaves the node and the counters untouched.
    pub fn move_node_to_position(
        &mut self,
        id: NodeId,
        position: Point,
    ) -> Result<(), EnvironmentError> {
        let boundaries = self.boundaries;
        let filter = self.camera_filter.clone();
        let placed = self.slot_mut(id)?;
        let diameter = placed.node.diameter();
        if !boundaries.fits(position, diameter) {
            debug!(node = %id, x = position.x, y = position.y, "move refused: out of bounds");
            return Err(EnvironmentError::OutOfBounds {
                node: id,
                position,
                diameter,
            });
        }
        let distance = placed.position.distance(position);
        placed.position = position;
        let is_camera = placed.node.contains(&filter);
        if is_camera {
            self.camera_movements += distance;
        } else {
            self.object_movements += distance;
        }
        Ok(())
    }

    /// Distance travelled by cameras since the last call.
    pub fn query_camera_movements_since_last_query(&mut self) -> f64 {
        std::mem::take(&mut self.camera_movements)
    }

    /// Distance travelled by non-camera nodes since the last call.
    pub fn query_object_movements_since_last_query(&mut self) -> f64 {
        std::mem::take(&mut self.object_movements)
    }

    /// Execute and remove every `InitHeading` action, leaving all other
    /// actions untouched. Returns how many were executed.
    pub fn initialize(&mut self) -> usize {
        (0..self.placed.len()).map(|slot| self.run_init_headings(slot)).sum()
    }

    /// Execute every node's actions once, in placement order.
    ///
    /// Within a node, `InitHeading` actions run first, then each
    /// `RandomTarget` moves the node through
    /// [`move_node_to_position`](Self::move_node_to_position), so accepted
    /// moves feed the movement counters.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepStats {
        let mut stats = StepStats::default();
        for slot in 0..self.placed.len() {
            stats.headings_initialized += self.run_init_headings(slot);

            let placed = &self.placed[slot];
            let id = placed.node.id();
            let moves: Vec<(f64, f64)> = placed
                .node
                .sim_reactions()
                .iter()
                .flat_map(|r| r.sim_actions())
                .filter_map(|a| match *a {
                    SimAction::RandomTarget { location, scale } => Some((location, scale)),
                    _ => None,
                })
                .collect();

            for (location, scale) in moves {
                let distance = sample_levy(rng, location, scale);
                if !distance.is_finite() {
                    debug!(node = %id, distance, "random target skipped: non-finite distance");
                    stats.refused_moves += 1;
                    continue;
                }
                let from = self.placed[slot].position;
                let target = random_target(rng, from, distance);
                match self.move_node_to_position(id, target) {
                    Ok(()) => stats.moves += 1,
                    Err(_) => stats.refused_moves += 1,
                }
            }
        }
        stats
    }

    fn run_init_headings(&mut self, slot: usize) -> usize {
        let placed = &mut self.placed[slot];
        let mut executed = 0;
        for reaction in placed.node.sim_reactions_mut() {
            for action in reaction.sim_actions() {
                if let SimAction::InitHeading { angle } = *action {
                    placed.heading = Vec2::from_angle(angle);
                    executed += 1;
                }
            }
            reaction.retain_actions(|a| !matches!(a, SimAction::InitHeading { .. }));
        }
        if executed > 0 {
            debug!(node = %placed.node.id(), executed, "heading initialized");
        }
        executed
    }

    fn slot(&self, id: NodeId) -> Option<&Placed> {
        self.index.get(&id).map(|&i| &self.placed[i])
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Placed, EnvironmentError> {
        let i = *self.index.get(&id).ok_or(EnvironmentError::UnknownNode(id))?;
        Ok(&mut self.placed[i])
    }
}

impl Environment for SmartcamEnvironment {
    fn dimensions(&self) -> usize {
        2
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_> {
        Box::new(self.placed.iter().map(|p| &p.node as &dyn Node))
    }

    fn node_count(&self) -> usize {
        self.placed.len()
    }

    fn as_euclidean_physics_2d(&self) -> Option<&dyn EuclideanPhysics2D> {
        Some(self)
    }
}

impl EuclideanPhysics2D for SmartcamEnvironment {
    fn position(&self, node: &dyn Node) -> Option<Point> {
        self.position_of(node.id())
    }

    fn heading(&self, node: &dyn Node) -> Vec2 {
        self.heading_of(node.id()).unwrap_or(DEFAULT_HEADING)
    }

    fn shape_factory(&self) -> &dyn ShapeFactory {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::model::node::{See, SimReaction};

    fn camera_filter() -> Molecule {
        Molecule::new("vision")
    }

    fn env() -> SmartcamEnvironment {
        SmartcamEnvironment::new(100.0, 50.0, camera_filter()).expect("valid boundaries")
    }

    #[test]
    fn rejects_degenerate_boundaries() {
        assert!(SmartcamEnvironment::new(0.0, 10.0, camera_filter()).is_err());
        assert!(SmartcamEnvironment::new(10.0, f64::NAN, camera_filter()).is_err());
    }

    #[test]
    fn add_respects_boundaries_and_diameter() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)).with_diameter(4.0), Point::new(47.0, 0.0))
            .expect("fits: 47 + 2 < 50");
        let err = env
            .add_node(SimNode::new(NodeId(2)).with_diameter(4.0), Point::new(0.0, 23.5))
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::OutOfBounds { node: NodeId(2), .. }));
        assert_eq!(env.node_count(), 1);
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)), Point::ORIGIN).unwrap();
        assert_eq!(
            env.add_node(SimNode::new(NodeId(1)), Point::new(1.0, 1.0)),
            Err(EnvironmentError::DuplicateNode(NodeId(1)))
        );
    }

    #[test]
    fn headings_default_and_init() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)), Point::ORIGIN).unwrap();
        assert_eq!(env.heading_of(NodeId(1)), Some(DEFAULT_HEADING));
        env.init_heading(NodeId(1), std::f64::consts::FRAC_PI_2).unwrap();
        let h = env.heading_of(NodeId(1)).unwrap();
        assert!((h - Vec2::new(0.0, 1.0)).hypot() < 1e-12);
        assert_eq!(
            env.set_heading(NodeId(9), Vec2::ZERO),
            Err(EnvironmentError::UnknownNode(NodeId(9)))
        );
    }

    #[test]
    fn movements_are_split_by_camera_filter_and_reset() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)).with_molecule(camera_filter()), Point::ORIGIN)
            .unwrap();
        env.add_node(SimNode::new(NodeId(2)), Point::ORIGIN).unwrap();

        env.move_node_to_position(NodeId(1), Point::new(3.0, 4.0)).unwrap();
        env.move_node_to_position(NodeId(2), Point::new(0.0, 2.0)).unwrap();
        env.move_node_to_position(NodeId(2), Point::new(0.0, -1.0)).unwrap();

        assert!((env.query_camera_movements_since_last_query() - 5.0).abs() < 1e-12);
        assert!((env.query_object_movements_since_last_query() - 5.0).abs() < 1e-12);
        assert_eq!(env.query_camera_movements_since_last_query(), 0.0);
        assert_eq!(env.query_object_movements_since_last_query(), 0.0);
    }

    #[test]
    fn refused_move_changes_nothing() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)), Point::ORIGIN).unwrap();
        assert!(env.move_node_to_position(NodeId(1), Point::new(60.0, 0.0)).is_err());
        assert_eq!(env.position_of(NodeId(1)), Some(Point::ORIGIN));
        assert_eq!(env.query_object_movements_since_last_query(), 0.0);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut env = env();
        for i in 0..3 {
            env.add_node(SimNode::new(NodeId(i)), Point::new(i as f64, 0.0)).unwrap();
        }
        assert!(env.remove_node(NodeId(0)).is_some());
        assert_eq!(env.position_of(NodeId(2)), Some(Point::new(2.0, 0.0)));
        assert!(env.remove_node(NodeId(0)).is_none());
        let ids: Vec<_> = env.nodes().map(|n| n.id()).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn exposes_physics_capability() {
        let mut env = env();
        env.add_node(SimNode::new(NodeId(1)), Point::new(1.0, 2.0)).unwrap();
        let physics = env.as_euclidean_physics_2d().expect("2D physical");
        let node = env.node(NodeId(1)).unwrap();
        assert_eq!(physics.position(node), Some(Point::new(1.0, 2.0)));
        assert_eq!(physics.heading(node), DEFAULT_HEADING);
        let stranger = SimNode::new(NodeId(42));
        assert_eq!(physics.position(&stranger), None);
    }

    #[test]
    fn non_finite_positions_never_fit() {
        let mut env = env();
        let err = env
            .add_node(SimNode::new(NodeId(1)), Point::new(f64::NAN, 0.0))
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::OutOfBounds { .. }));
    }

    fn init_heading_node(id: u64, angle: f64) -> SimNode {
        SimNode::new(NodeId(id)).with_reaction(
            SimReaction::new()
                .with_action(SimAction::InitHeading { angle })
                .with_action(SimAction::See(See::new(60.0, 10.0))),
        )
    }

    #[test]
    fn init_heading_runs_once_and_leaves_its_reaction() {
        let mut env = env();
        env.add_node(init_heading_node(1, std::f64::consts::PI), Point::ORIGIN)
            .unwrap();

        assert_eq!(env.initialize(), 1);
        let h = env.heading_of(NodeId(1)).unwrap();
        assert!((h - Vec2::new(-1.0, 0.0)).hypot() < 1e-12);
        let actions = env.node(NodeId(1)).unwrap().sim_reactions()[0].sim_actions();
        assert_eq!(actions, &[SimAction::See(See::new(60.0, 10.0))]);

        // Already consumed: a later step keeps the heading.
        env.set_heading(NodeId(1), DEFAULT_HEADING).unwrap();
        let stats = env.step(&mut Pcg64::seed_from_u64(1));
        assert_eq!(stats.headings_initialized, 0);
        assert_eq!(env.heading_of(NodeId(1)), Some(DEFAULT_HEADING));
    }

    #[test]
    fn step_executes_pending_init_heading() {
        let mut env = env();
        env.add_node(init_heading_node(1, std::f64::consts::FRAC_PI_2), Point::ORIGIN)
            .unwrap();
        let stats = env.step(&mut Pcg64::seed_from_u64(1));
        assert_eq!(stats.headings_initialized, 1);
        assert_eq!(stats.moves + stats.refused_moves, 0);
        let h = env.heading_of(NodeId(1)).unwrap();
        assert!((h - Vec2::new(0.0, 1.0)).hypot() < 1e-12);
    }

    #[test]
    fn levy_samples_never_fall_below_location() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..1_000 {
            let d = sample_levy(&mut rng, 2.0, 0.5);
            assert!(d >= 2.0, "got {d}");
        }
    }

    #[test]
    fn random_target_lies_at_the_requested_distance() {
        let mut rng = Pcg64::seed_from_u64(3);
        let from = Point::new(1.0, -2.0);
        for _ in 0..100 {
            let target = random_target(&mut rng, from, 5.0);
            assert!((target.distance(from) - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn random_target_moves_feed_object_counter() {
        let mut env = SmartcamEnvironment::new(1_000.0, 1_000.0, camera_filter()).unwrap();
        let mover = SimNode::new(NodeId(1)).with_reaction(SimReaction::new().with_action(
            SimAction::RandomTarget {
                location: 1.0,
                scale: 0.01,
            },
        ));
        env.add_node(mover, Point::ORIGIN).unwrap();

        let mut rng = Pcg64::seed_from_u64(11);
        let mut travelled = 0.0;
        let mut moves = 0;
        for _ in 0..20 {
            let before = env.position_of(NodeId(1)).unwrap();
            let stats = env.step(&mut rng);
            let after = env.position_of(NodeId(1)).unwrap();
            assert_eq!(stats.moves + stats.refused_moves, 1);
            if stats.moves == 1 {
                assert!(before.distance(after) >= 1.0);
            } else {
                assert_eq!(before, after);
            }
            travelled += before.distance(after);
            moves += stats.moves;
        }
        assert!(moves > 0);
        assert!((env.query_object_movements_since_last_query() - travelled).abs() < 1e-9);
        assert_eq!(env.query_camera_movements_since_last_query(), 0.0);
    }

    #[test]
    fn random_target_outside_boundaries_is_refused() {
        let mut env = env();
        let mover = SimNode::new(NodeId(1)).with_reaction(SimReaction::new().with_action(
            SimAction::RandomTarget {
                location: 1_000.0,
                scale: 1.0,
            },
        ));
        env.add_node(mover, Point::ORIGIN).unwrap();
        let stats = env.step(&mut Pcg64::seed_from_u64(5));
        assert_eq!(stats.refused_moves, 1);
        assert_eq!(env.position_of(NodeId(1)), Some(Point::ORIGIN));
        assert_eq!(env.query_object_movements_since_last_query(), 0.0);
    }
}
