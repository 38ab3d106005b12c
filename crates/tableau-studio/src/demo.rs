//! Demo scene: a walker crosses a field of coins, stamps itself onto the
//! canvas as an obstacle, and restarts the scene when it leaves the
//! playfield.

use std::sync::Arc;

use anyhow::{Context, Result};
use tableau_engine::animation::{Active, AnimationId, AnimationSet, AnimationSetBuilder};
use tableau_engine::canvas::CollisionTag;
use tableau_engine::config::EngineConfig;
use tableau_engine::coords::Rect;
use tableau_engine::image::Image;
use tableau_engine::instance::{Body, ClassId, Instance, InstanceId, Movement};
use tableau_engine::paint::Color;
use tableau_engine::scene::{Scene, SceneEvents};

pub const HERO: ClassId = ClassId(1);
pub const COIN: ClassId = ClassId(2);
pub const FLOOR: ClassId = ClassId(3);

const WALK: AnimationId = AnimationId(1);
const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;

/// Walks right at a fixed pixel speed.
#[derive(Debug)]
struct Stride {
    speed: f32,
    carry: f32,
}

impl Movement for Stride {
    fn update(&mut self, body: &mut Body, dt: f32) {
        self.carry += self.speed * dt;
        let step = self.carry.trunc();
        self.carry -= step;
        body.x += step as i32;
    }
}

/// Two-frame walk cycle authored for directions 0 and 16 only.
pub fn hero_animations() -> Result<Arc<AnimationSet>> {
    let mut builder = AnimationSetBuilder::new();
    for dir in [0, 16] {
        builder
            .add_direction(WALK, dir, 0, 25, 0, 0)
            .with_context(|| format!("declaring walk direction {dir}"))?;
        for shade in [160u8, 220] {
            let frame = Image::filled(16, 24, Color::rgb(shade, 80, 40))
                .with_hotspot(8, 24)
                .with_action_point(16, 12);
            builder.add_frame(WALK, dir, Arc::new(frame))?;
        }
    }
    builder.build().context("building hero animations")
}

pub fn new_scene(config: EngineConfig) -> Scene {
    Scene::new("meadow", WIDTH, HEIGHT, Color::from_rgb_int(0x203040), 0, config)
}

/// Scene logic for the demo.
pub struct Meadow {
    animations: Arc<AnimationSet>,
    hero: Option<InstanceId>,
    pub collected: u32,
    pub restarts: u32,
}

impl Meadow {
    pub fn new(animations: Arc<AnimationSet>) -> Self {
        Self {
            animations,
            hero: None,
            collected: 0,
            restarts: 0,
        }
    }

    fn build(&mut self, scene: &mut Scene) -> Result<()> {
        scene.add_layer(0.5, 0.5, true);
        scene.add_layer(1.0, 1.0, true);

        let sky = Image::filled(WIDTH, 200, Color::rgb(90, 140, 220));
        scene.add_background(Instance::backdrop("sky", ClassId(0), 0, 0, Arc::new(sky)), 0)?;

        let floor = Instance::quick_backdrop("floor", FLOOR, Rect::new(0, 500, WIDTH, 100), Color::rgb(40, 120, 40));
        scene.add_instance(floor, 1)?;

        for i in 0..6 {
            let coin = Image::filled(8, 8, Color::rgb(250, 210, 40));
            scene.add_instance(Instance::backdrop(format!("coin{i}"), COIN, 120 + i * 110, 480, Arc::new(coin)), 1)?;
        }

        let mut hero = Instance::active("hero", HERO, 20, 500, Active::new(Arc::clone(&self.animations)));
        hero.set_movement(Box::new(Stride { speed: 240.0, carry: 0.0 }));
        let id = scene.add_instance(hero, 1)?;
        scene.move_to_front(id);
        self.hero = Some(id);
        Ok(())
    }
}

impl SceneEvents for Meadow {
    fn on_start(&mut self, scene: &mut Scene) {
        if let Err(err) = self.build(scene) {
            log::error!("building scene {}: {err:#}", scene.name());
            scene.quit();
        }
    }

    fn handle_events(&mut self, scene: &mut Scene) {
        let Some(hero) = self.hero.filter(|id| scene.is_live(*id)) else {
            return;
        };

        for coin in scene.lookup_by_class(COIN).to_vec() {
            if scene.is_live(coin) && scene.overlaps(hero, coin) {
                scene.destroy(coin);
                self.collected += 1;
                log::debug!("coin collected ({} total)", self.collected);
            }
        }

        if scene.loop_count() % 30 == 0 {
            scene.paste_instance(hero, CollisionTag::OBSTACLE);
        }

        if let Some(x) = scene.get(hero).map(|h| h.x) {
            scene.set_display_center(Some(x), None);
        }

        if scene.outside_playfield(hero) {
            log::info!("hero left the playfield after {} ticks", scene.loop_count());
            self.restarts += 1;
            self.hero = None;
            scene.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animations_cover_every_direction() {
        let set = hero_animations().unwrap();
        let walk = set.get(WALK).unwrap();
        assert!(walk.is_authored(16));
        assert_eq!(walk.direction(8).unwrap().index, 16);
        assert_eq!(walk.direction(7).unwrap().index, 0);
    }

    #[test]
    fn hero_collects_coins_and_restarts() {
        let mut scene = new_scene(EngineConfig::default());
        let mut logic = Meadow::new(hero_animations().unwrap());
        scene.start(&mut logic);
        assert_eq!(scene.lookup_by_class(COIN).len(), 6);

        let mut ticks = 0;
        while !scene.next_transition().is_pending() && ticks < 1000 {
            scene.tick(1.0 / 60.0, &mut logic);
            ticks += 1;
        }
        assert_eq!(logic.collected, 6);
        assert_eq!(logic.restarts, 1);
        assert!(scene.lookup_by_class(COIN).is_empty());
    }
}
