//! Integration tests for whole-frame rendering and frame snapshots.

use smartcam_effects::prelude::*;

fn presentation_frame() -> FrameRenderer {
    let mut frame = FrameRenderer::new();
    frame.push(PresentationRenderer::new());
    frame
}

fn snapshot_of(config: &SceneConfig, wormhole: &WormholeConfig) -> FrameSnapshot {
    let env = build_scene(config).unwrap();
    let wormhole = Wormhole2D::new(wormhole.clone()).unwrap();
    let mut surface = RecordingSurface::new();
    presentation_frame()
        .render(&mut surface, &env, &wormhole)
        .unwrap();
    FrameSnapshot::capture(&surface).unwrap()
}

#[test]
fn frame_counts_match_scene() {
    let config = SceneConfig::default();
    let snapshot = snapshot_of(&config, &WormholeConfig::default());

    assert_eq!(snapshot.fill_count(), config.cameras + config.objects);
    // Every camera has exactly one cone.
    assert_eq!(snapshot.stroke_count(), config.cameras);
}

#[test]
fn same_inputs_same_hash() {
    let a = snapshot_of(&SceneConfig::default(), &WormholeConfig::default());
    let b = snapshot_of(&SceneConfig::default(), &WormholeConfig::default());
    assert_eq!(a.hash, b.hash);
    assert_eq!(a, b);
}

#[test]
fn zoom_and_seed_change_the_hash() {
    let base = snapshot_of(&SceneConfig::default(), &WormholeConfig::default());
    let zoomed = snapshot_of(
        &SceneConfig::default(),
        &WormholeConfig {
            zoom: 2.0,
            ..Default::default()
        },
    );
    let reseeded = snapshot_of(
        &SceneConfig {
            seed: 1,
            ..Default::default()
        },
        &WormholeConfig::default(),
    );
    assert_ne!(base.hash, zoomed.hash);
    assert_ne!(base.hash, reseeded.hash);
}

#[test]
fn snapshot_survives_json_round_trip() {
    let snapshot = snapshot_of(&SceneConfig::default(), &WormholeConfig::default());
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"op\":\"fill\""));
    assert!(json.contains("\"op\":\"stroke\""));

    let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
    assert!(back.verify());
    assert_eq!(back.hash, snapshot.hash);
}

#[test]
fn markers_are_drawn_before_cones_per_node() {
    let config = SceneConfig {
        cameras: 3,
        objects: 0,
        wanted: 0,
        ..Default::default()
    };
    let snapshot = snapshot_of(&config, &WormholeConfig::default());
    let ops: Vec<bool> = snapshot.commands.iter().map(DrawCommand::is_fill).collect();
    assert_eq!(ops, vec![true, false, true, false, true, false]);
}

#[test]
fn legend_shows_green_presentation_entry() {
    let legend = presentation_frame().legend();
    assert_eq!(
        legend,
        vec![("draw for presentation".to_owned(), Color::GREEN)]
    );
}

#[test]
fn moving_a_node_moves_its_marker() {
    let mut env = build_scene(&SceneConfig {
        cameras: 0,
        objects: 1,
        wanted: 0,
        ..Default::default()
    })
    .unwrap();
    let wormhole = Wormhole2D::new(WormholeConfig::default()).unwrap();
    let frame = presentation_frame();

    env.move_node_to_position(NodeId(0), Point::new(10.0, 10.0))
        .unwrap();
    let mut surface = RecordingSurface::new();
    frame.render(&mut surface, &env, &wormhole).unwrap();

    let origin = surface.commands()[0].shape().transform.translation();
    assert_eq!(origin, Vec2::new(410.0, 290.0));
}

#[test]
fn stepped_scene_redraws_moved_objects_only() {
    use rand::SeedableRng;

    let config = SceneConfig {
        cameras: 2,
        objects: 3,
        wanted: 1,
        ..Default::default()
    };
    let mut env = build_scene(&config).unwrap();
    let wormhole = Wormhole2D::new(WormholeConfig::default()).unwrap();
    let frame = presentation_frame();

    let mut before = RecordingSurface::new();
    frame.render(&mut before, &env, &wormhole).unwrap();

    let stats = env.step(&mut rand_pcg::Pcg64::seed_from_u64(4));
    let mut after = RecordingSurface::new();
    frame.render(&mut after, &env, &wormhole).unwrap();

    // Cameras draw a marker and a cone, objects a marker: 2 * 2 commands
    // precede the objects' markers.
    assert_eq!(before.commands()[..4], after.commands()[..4]);
    let moved = before.commands()[4..]
        .iter()
        .zip(&after.commands()[4..])
        .filter(|(b, a)| b != a)
        .count();
    assert!(moved <= stats.moves);
    assert_eq!(after.commands().len(), before.commands().len());
}
