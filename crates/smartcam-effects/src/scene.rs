//! Seeded scene construction.
//!
//! [`build_scene`] populates a [`SmartcamEnvironment`] with cameras and
//! objects, either at uniformly random positions or at explicitly listed
//! ones (see [`Displacement`]). Every node starts with an `InitHeading`
//! action at a random angle, executed before the scene is returned. Objects
//! also carry a `RandomTarget` move for later steps. The RNG is a seeded PCG,
//! so a given [`SceneConfig`] always yields the same scene.
//!
//! ```
//! use smartcam_effects::host::Environment;
//! use smartcam_effects::scene::{build_scene, SceneConfig};
//!
//! let config = SceneConfig { cameras: 3, objects: 5, wanted: 2, ..Default::default() };
//! let env = build_scene(&config).unwrap();
//! assert_eq!(env.node_count(), 8);
//! ```

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use smartcam_geom::kurbo::Point;
use tracing::debug;

use crate::host::{Molecule, NodeId};
use crate::model::{EnvironmentError, See, SimAction, SimNode, SimReaction, SmartcamEnvironment};
use crate::presentation::{VISION_MOLECULE, WANTED_MOLECULE};

/// Positions are drawn from this fraction of the free span so that nodes
/// stay strictly inside the boundaries.
const DISPLACEMENT_MARGIN: f64 = 0.999;

// ---------------------------------------------------------------------------
// Displacement
// ---------------------------------------------------------------------------

/// Where the nodes of one group are placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Displacement {
    /// The configured number of nodes, uniformly inside the arena.
    #[default]
    Uniform,
    /// One node per listed `(x, y)` world position. The configured count is
    /// ignored.
    SpecificPositions(Vec<(f64, f64)>),
}

impl Displacement {
    /// Number of nodes this displacement yields for a configured `count`.
    pub fn node_count(&self, count: usize) -> usize {
        match self {
            Displacement::Uniform => count,
            Displacement::SpecificPositions(positions) => positions.len(),
        }
    }

    fn positions(&self, count: usize, rng: &mut Pcg64, span_x: f64, span_y: f64) -> Vec<Point> {
        match self {
            Displacement::Uniform => (0..count)
                .map(|_| {
                    Point::new(
                        rng.gen_range(-span_x..span_x) * DISPLACEMENT_MARGIN,
                        rng.gen_range(-span_y..span_y) * DISPLACEMENT_MARGIN,
                    )
                })
                .collect(),
            Displacement::SpecificPositions(positions) => {
                positions.iter().map(|&(x, y)| Point::new(x, y)).collect()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Parameters of a generated scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// RNG seed.
    pub seed: u64,
    /// Environment width in world units.
    pub width: f64,
    /// Environment height in world units.
    pub height: f64,
    /// Number of camera nodes (carry `vision` and a `See` action).
    pub cameras: usize,
    /// Number of object nodes.
    pub objects: usize,
    /// How many of the objects carry `wanted`. At most the object count.
    pub wanted: usize,
    /// Placement of the cameras.
    #[serde(default)]
    pub camera_displacement: Displacement,
    /// Placement of the objects.
    #[serde(default)]
    pub object_displacement: Displacement,
    /// Aperture of every camera's field of view, in degrees.
    pub vision_angle_deg: f64,
    /// Visibility distance of every camera, in world units.
    pub vision_distance: f64,
    /// Physical diameter of every node, in world units.
    pub node_diameter: f64,
    /// Location of the Lévy distribution of object move distances.
    pub move_location: f64,
    /// Scale of the Lévy distribution of object move distances.
    pub move_scale: f64,
}

impl Default for SceneConfig {
    /// 10 cameras and 20 objects (5 wanted) placed uniformly in a 200x200
    /// arena, 60 degree cones of radius 30, standard Lévy moves.
    fn default() -> Self {
        Self {
            seed: 42,
            width: 200.0,
            height: 200.0,
            cameras: 10,
            objects: 20,
            wanted: 5,
            camera_displacement: Displacement::Uniform,
            object_displacement: Displacement::Uniform,
            vision_angle_deg: 60.0,
            vision_distance: 30.0,
            node_diameter: 1.0,
            move_location: 0.0,
            move_scale: 1.0,
        }
    }
}

/// Errors produced while building a scene.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    /// More wanted objects than objects.
    #[error("cannot mark {wanted} wanted objects out of {objects}")]
    TooManyWanted { wanted: usize, objects: usize },

    /// The arena is narrower than one node.
    #[error("nodes of diameter {diameter} do not fit in {width} x {height}")]
    NodesDoNotFit {
        diameter: f64,
        width: f64,
        height: f64,
    },

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

// ---------------------------------------------------------------------------
// build_scene
// ---------------------------------------------------------------------------

/// Build a scene from `config`.
///
/// Cameras get ids `0..cameras`, objects follow. Every node receives an
/// `InitHeading` action at a uniformly random angle, and the environment
/// executes those before returning, so each heading is `(cos a, sin a)`.
///
/// # Errors
///
/// [`SceneError::TooManyWanted`] if `wanted` exceeds the object count,
/// [`SceneError::NodesDoNotFit`] if a node is wider than the arena, and
/// [`SceneError::Environment`] for invalid boundaries or a listed position
/// where a node does not fit.
pub fn build_scene(config: &SceneConfig) -> Result<SmartcamEnvironment, SceneError> {
    let cameras = config.camera_displacement.node_count(config.cameras);
    let objects = config.object_displacement.node_count(config.objects);
    if config.wanted > objects {
        return Err(SceneError::TooManyWanted {
            wanted: config.wanted,
            objects,
        });
    }

    let vision = Molecule::new(VISION_MOLECULE);
    let wanted = Molecule::new(WANTED_MOLECULE);
    let mut env = SmartcamEnvironment::new(config.width, config.height, vision.clone())?;

    let span_x = (config.width - config.node_diameter) / 2.0;
    let span_y = (config.height - config.node_diameter) / 2.0;
    if !(span_x > 0.0 && span_y > 0.0) {
        return Err(SceneError::NodesDoNotFit {
            diameter: config.node_diameter,
            width: config.width,
            height: config.height,
        });
    }

    let mut rng = Pcg64::seed_from_u64(config.seed);
    let mut next_id = 0u64;

    let camera_positions = config
        .camera_displacement
        .positions(cameras, &mut rng, span_x, span_y);
    for position in camera_positions {
        let reaction = SimReaction::new()
            .with_action(init_heading(&mut rng))
            .with_action(SimAction::See(See::new(
                config.vision_angle_deg,
                config.vision_distance,
            )));
        let node = SimNode::new(NodeId(next_id))
            .with_diameter(config.node_diameter)
            .with_molecule(vision.clone())
            .with_reaction(reaction);
        env.add_node(node, position)?;
        next_id += 1;
    }

    let object_positions = config
        .object_displacement
        .positions(objects, &mut rng, span_x, span_y);
    for (i, position) in object_positions.into_iter().enumerate() {
        let reaction = SimReaction::new()
            .with_action(init_heading(&mut rng))
            .with_action(SimAction::RandomTarget {
                location: config.move_location,
                scale: config.move_scale,
            });
        let mut node = SimNode::new(NodeId(next_id))
            .with_diameter(config.node_diameter)
            .with_reaction(reaction);
        if i < config.wanted {
            node.insert_molecule(wanted.clone());
        }
        env.add_node(node, position)?;
        next_id += 1;
    }

    let oriented = env.initialize();
    debug!(
        seed = config.seed,
        cameras,
        objects,
        wanted = config.wanted,
        oriented,
        "scene built"
    );
    Ok(env)
}

fn init_heading(rng: &mut Pcg64) -> SimAction {
    SimAction::InitHeading {
        angle: rng.gen_range(0.0..TAU),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Environment, Node};

    #[test]
    fn same_seed_same_scene() {
        let config = SceneConfig::default();
        let a = build_scene(&config).unwrap();
        let b = build_scene(&config).unwrap();
        for id in 0..30 {
            assert_eq!(a.position_of(NodeId(id)), b.position_of(NodeId(id)));
            assert_eq!(a.heading_of(NodeId(id)), b.heading_of(NodeId(id)));
        }
    }

    #[test]
    fn different_seed_moves_nodes() {
        let a = build_scene(&SceneConfig::default()).unwrap();
        let b = build_scene(&SceneConfig {
            seed: 7,
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a.position_of(NodeId(0)), b.position_of(NodeId(0)));
    }

    #[test]
    fn roles_are_assigned() {
        let config = SceneConfig {
            cameras: 2,
            objects: 3,
            wanted: 1,
            ..Default::default()
        };
        let env = build_scene(&config).unwrap();
        let vision = Molecule::new(VISION_MOLECULE);
        let wanted = Molecule::new(WANTED_MOLECULE);

        let nodes: Vec<_> = env.nodes().collect();
        assert_eq!(nodes.len(), 5);
        assert!(nodes[..2].iter().all(|n| n.contains(&vision)));
        assert!(nodes[2].contains(&wanted));
        assert!(nodes[3..].iter().all(|n| !n.contains(&wanted) && !n.contains(&vision)));
    }

    #[test]
    fn headings_are_unit_vectors() {
        let env = build_scene(&SceneConfig::default()).unwrap();
        for node in env.nodes() {
            let h = env.heading_of(node.id()).unwrap();
            assert!((h.hypot() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn init_headings_are_consumed_while_moves_remain() {
        let env = build_scene(&SceneConfig {
            cameras: 1,
            objects: 1,
            wanted: 0,
            ..Default::default()
        })
        .unwrap();
        let camera = env.node(NodeId(0)).unwrap().sim_reactions()[0].sim_actions();
        assert_eq!(camera, &[SimAction::See(See::new(60.0, 30.0))]);
        let object = env.node(NodeId(1)).unwrap().sim_reactions()[0].sim_actions();
        assert_eq!(
            object,
            &[SimAction::RandomTarget {
                location: 0.0,
                scale: 1.0
            }]
        );
    }

    #[test]
    fn specific_positions_place_one_node_each() {
        let config = SceneConfig {
            cameras: 10,
            objects: 4,
            wanted: 1,
            camera_displacement: Displacement::SpecificPositions(vec![(10.0, -5.0), (0.0, 0.0)]),
            object_displacement: Displacement::SpecificPositions(vec![(-20.0, 30.0)]),
            ..Default::default()
        };
        let env = build_scene(&config).unwrap();
        assert_eq!(env.node_count(), 3);
        assert_eq!(env.position_of(NodeId(0)), Some(Point::new(10.0, -5.0)));
        assert_eq!(env.position_of(NodeId(1)), Some(Point::ORIGIN));
        assert_eq!(env.position_of(NodeId(2)), Some(Point::new(-20.0, 30.0)));
        assert!(env.node(NodeId(2)).unwrap().contains(&Molecule::new(WANTED_MOLECULE)));
    }

    #[test]
    fn specific_position_outside_the_arena_is_an_error() {
        let config = SceneConfig {
            camera_displacement: Displacement::SpecificPositions(vec![(500.0, 0.0)]),
            ..Default::default()
        };
        assert!(matches!(
            build_scene(&config),
            Err(SceneError::Environment(EnvironmentError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn wanted_is_checked_against_listed_objects() {
        let config = SceneConfig {
            objects: 20,
            wanted: 2,
            object_displacement: Displacement::SpecificPositions(vec![(0.0, 0.0)]),
            ..Default::default()
        };
        assert_eq!(
            build_scene(&config).unwrap_err(),
            SceneError::TooManyWanted {
                wanted: 2,
                objects: 1
            }
        );
    }

    #[test]
    fn stepping_a_scene_moves_only_objects() {
        let mut env = build_scene(&SceneConfig::default()).unwrap();
        let cameras_before: Vec<_> = (0..10).map(|id| env.position_of(NodeId(id))).collect();
        let mut rng = Pcg64::seed_from_u64(99);
        let stats = env.step(&mut rng);
        assert_eq!(stats.headings_initialized, 0);
        assert_eq!(stats.moves + stats.refused_moves, 20);
        let cameras_after: Vec<_> = (0..10).map(|id| env.position_of(NodeId(id))).collect();
        assert_eq!(cameras_before, cameras_after);
        assert_eq!(env.query_camera_movements_since_last_query(), 0.0);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let too_many = SceneConfig {
            objects: 1,
            wanted: 2,
            ..Default::default()
        };
        assert_eq!(
            build_scene(&too_many).unwrap_err(),
            SceneError::TooManyWanted {
                wanted: 2,
                objects: 1
            }
        );

        let cramped = SceneConfig {
            width: 1.0,
            node_diameter: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            build_scene(&cramped),
            Err(SceneError::NodesDoNotFit { .. })
        ));
    }
}
