#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::error;

use crate::components::{Body, BoxColor, GameBox, GameState, Position, ScreenShake, Surface};
use crate::config::Config;
use crate::outcome;
use crate::physics::{BodyFrame, Physics, PhysicsEngine, RapierEngine};
use crate::sound::AudioState;
use crate::spawn::{self, SpawnController};
use crate::systems;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
}

impl App {
    /// Builds a session on `engine`, with the surface edges as its boundary.
    pub fn new(
        config: &Config,
        surface: Surface,
        mut engine: impl PhysicsEngine + 'static,
        audio_state: AudioState,
    ) -> Self {
        engine.set_boundary(surface.bounds);

        let spawn_controller = if config.game.seed == 0 {
            SpawnController::new()
        } else {
            SpawnController::with_seed(config.game.seed)
        };

        let mut world = World::new();
        world.insert_resource(GameState::default());
        world.insert_resource(ScreenShake::default());
        world.insert_resource(surface);
        world.insert_resource(spawn_controller);
        world.insert_resource(Physics::new(engine));
        world.insert_resource(audio_state);

        info!(
            "Surface is {}x{} points",
            surface.bounds.width, surface.bounds.height
        );

        Self {
            world,
            should_quit: false,
        }
    }

    /// A session simulated by rapier2d with live audio.
    #[must_use]
    pub fn with_rapier(config: &Config, surface: Surface) -> Self {
        Self::new(
            config,
            surface,
            RapierEngine::new(&config.physics),
            AudioState::new(&config.audio),
        )
    }

    /// Spawns a box under the tap. The game-over dialog swallows taps, so
    /// nothing is spawned while it is up. Taps outside the surface are
    /// dropped as well.
    pub fn tap(&mut self, point: Position) -> Option<GameBox> {
        if self.is_game_over_pending() {
            debug!("Tap at ({}, {}) ignored, game over pending", point.x, point.y);
            return None;
        }
        if !self.surface().contains(point) {
            debug!("Tap at ({}, {}) ignored, outside the surface", point.x, point.y);
            return None;
        }
        Some(spawn::spawn_box(&mut self.world, point))
    }

    /// Follows a terminal resize: the surface takes the new cell count and
    /// its edges become the new boundary.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        let current = self.surface();
        let surface = Surface::from_cells(columns, rows, current.cell_width, current.cell_height);
        if surface == current {
            return;
        }

        self.world.resource_mut::<Physics>().0.set_boundary(surface.bounds);
        self.world.insert_resource(surface);

        info!(
            "Surface resized to {}x{} points",
            surface.bounds.width, surface.bounds.height
        );
    }

    /// Dismisses the game-over dialog and resets the session.
    pub fn acknowledge(&mut self) -> bool {
        outcome::acknowledge_game_over(&mut self.world)
    }

    pub fn on_tick(&mut self, delta_seconds: f32) {
        systems::physics_system(&mut self.world, delta_seconds);
        systems::effects_system(&mut self.world, delta_seconds);
    }

    #[must_use]
    pub fn is_game_over_pending(&self) -> bool {
        self.world.resource::<GameState>().is_game_over_pending()
    }

    #[must_use]
    pub fn box_count(&self) -> u32 {
        self.world.resource::<SpawnController>().counter()
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        *self.world.resource::<Surface>()
    }

    /// Every box on screen with its current pose, oldest first.
    pub fn get_render_boxes(&mut self) -> Vec<(BodyFrame, BoxColor)> {
        let mut boxes: Vec<(u32, BodyFrame, BoxColor)> = self
            .world
            .query::<(&GameBox, &Body)>()
            .iter(&self.world)
            .map(|(game_box, body)| (game_box.id, body.frame, game_box.color))
            .collect();
        boxes.sort_by_key(|(id, _, _)| *id);
        boxes
            .into_iter()
            .map(|(_, frame, color)| (frame, color))
            .collect()
    }

    pub fn toggle_sound(&mut self) {
        let mut audio_state = self.world.resource_mut::<AudioState>();
        audio_state.toggle_sound();
        debug!("Sound enabled: {}", audio_state.is_sound_enabled());
    }

    pub fn change_volume(&mut self, delta: f32) {
        let mut audio_state = self.world.resource_mut::<AudioState>();
        let volume = audio_state.get_volume();
        audio_state.set_volume(volume + delta);
    }
}
