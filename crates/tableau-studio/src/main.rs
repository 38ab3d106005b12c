mod demo;

use std::time::Duration;

use anyhow::{Context, Result};
use tableau_engine::config::EngineConfig;
use tableau_engine::logging::{init_logging, LoggingConfig};
use tableau_engine::render::Recorder;
use tableau_engine::scene::Transition;
use tableau_engine::time::FrameClock;

/// Ticks to run when no count is given on the command line.
const DEFAULT_TICKS: u64 = 600;

/// Scene runs before the driver stops on its own.
const MAX_RESTARTS: u32 = 3;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid tick count {arg:?}"))?,
        None => DEFAULT_TICKS,
    };

    let config = EngineConfig::default();
    let mut scene = demo::new_scene(config.clone());
    let mut logic = demo::Meadow::new(demo::hero_animations()?);
    let mut clock = FrameClock::fixed(Duration::from_secs_f64(1.0 / 60.0));
    let mut backend = Recorder::new();

    log::info!(
        "running {} for {} ticks ({}x{} viewport)",
        scene.name(),
        ticks,
        config.viewport_width,
        config.viewport_height
    );
    scene.start(&mut logic);

    let mut uploads = 0;
    let mut quads = 0;
    for _ in 0..ticks {
        let ft = clock.tick();
        if !scene.tick(ft.dt, &mut logic) {
            log::warn!("scene requested quit at frame {}", ft.frame_index);
            break;
        }

        backend.clear();
        scene.draw(&mut backend);
        uploads += backend.upload_count();
        quads += backend.quad_count();

        match scene.next_transition() {
            Transition::None => {}
            Transition::Restart if logic.restarts < MAX_RESTARTS => {
                log::info!("restarting {}", scene.name());
                scene.end();
                clock.reset();
                scene.start(&mut logic);
            }
            Transition::Restart => {
                log::info!("restart limit reached");
                break;
            }
            Transition::Goto(index) => {
                log::info!("scene {} requested, only one scene is bundled", index);
                break;
            }
        }
    }

    log::info!(
        "done: {} coins collected, {} restarts, {} canvas uploads, {} quads drawn",
        logic.collected,
        logic.restarts,
        uploads,
        quads
    );
    Ok(())
}
