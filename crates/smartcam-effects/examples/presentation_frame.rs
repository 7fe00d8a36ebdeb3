//! Headless presentation frame -- builds a seeded smartcam scene, renders one
//! frame with the presentation effect, and prints the frame snapshot.
//!
//! Run with:
//!   cargo run --example presentation_frame -p smartcam-effects
//!
//! Pass `--json` to print every draw command instead of a summary. Set
//! `RUST_LOG=smartcam_effects=trace` to see skipped nodes.

use rand::SeedableRng;
use smartcam_effects::prelude::*;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let print_json = std::env::args().any(|a| a == "--json");

    let config = SceneConfig::default();
    let mut env = build_scene(&config)?;
    let wormhole = Wormhole2D::new(WormholeConfig {
        zoom: 2.5,
        ..Default::default()
    })?;

    let mut frame = FrameRenderer::new();
    frame.push(PresentationRenderer::new());

    for (name, color) in frame.legend() {
        println!("effect: {name} [{color}]");
    }

    let mut surface = RecordingSurface::new();
    let stats = frame.render(&mut surface, &env, &wormhole)?;
    let snapshot = FrameSnapshot::capture(&surface)?;

    println!(
        "frame 0: {} nodes, {} fills, {} strokes, hash {}",
        stats.nodes,
        snapshot.fill_count(),
        snapshot.stroke_count(),
        snapshot.hash
    );
    if print_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    // Nudge every camera and render again: the hash changes, the object
    // movement counter does not.
    let cameras: Vec<NodeId> = env
        .nodes()
        .filter(|n| n.contains(env.camera_filter()))
        .map(|n| n.id())
        .collect();
    for id in cameras {
        if let Some(p) = env.position_of(id) {
            let target = Point::new(p.x * 0.9, p.y * 0.9);
            env.move_node_to_position(id, target)?;
        }
    }

    surface.clear();
    frame.render(&mut surface, &env, &wormhole)?;
    let moved = FrameSnapshot::capture(&surface)?;
    println!(
        "frame 1: hash {} (camera travel {:.3}, object travel {:.3})",
        moved.hash,
        env.query_camera_movements_since_last_query(),
        env.query_object_movements_since_last_query()
    );

    // One simulation step: objects follow their random targets.
    let mut rng = rand_pcg::Pcg64::seed_from_u64(config.seed);
    let step = env.step(&mut rng);
    surface.clear();
    frame.render(&mut surface, &env, &wormhole)?;
    let stepped = FrameSnapshot::capture(&surface)?;
    println!(
        "frame 2: hash {} ({} moves, {} refused, object travel {:.3})",
        stepped.hash,
        step.moves,
        step.refused_moves,
        env.query_object_movements_since_last_query()
    );

    Ok(())
}
