#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when casting box sizes to f32, they never exceed a few hundred points
    clippy::cast_precision_loss
)]

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::{Body, BoxColor, BoxSize, GameBox, PALETTE, Position};
use crate::game::{BOX_SIZE_SPAN, MIN_BOX_SIZE};
use crate::physics::{BodyFrame, BodyHandle, Physics};
use crate::sound::{AudioState, SoundEffect};

/// Session state for box creation: the running id counter, the random
/// source for sizes and colors, and which entity each engine body belongs to.
#[derive(Resource)]
pub struct SpawnController {
    counter: u32,
    rng: fastrand::Rng,
    bodies: HashMap<BodyHandle, Entity>,
}

impl SpawnController {
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            counter: 0,
            rng,
            bodies: HashMap::new(),
        }
    }

    /// Number of boxes spawned since the last reset, which is also the id of
    /// the newest box.
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn random_size(&mut self) -> BoxSize {
        BoxSize {
            width: self.rng.u32(0..BOX_SIZE_SPAN) + MIN_BOX_SIZE,
            height: self.rng.u32(0..BOX_SIZE_SPAN) + MIN_BOX_SIZE,
        }
    }

    pub fn random_color(&mut self) -> BoxColor {
        PALETTE[self.rng.usize(0..PALETTE.len())]
    }

    /// Describes the next box for a tap, consuming one id. The box is
    /// centered horizontally on the tap (half width rounded down) and hangs
    /// down from it.
    pub fn next_box(&mut self, tap_x: f32, tap_y: f32) -> GameBox {
        self.counter += 1;

        let color = self.random_color();
        let size = self.random_size();

        GameBox {
            id: self.counter,
            position: Position {
                x: tap_x - (size.width / 2) as f32,
                y: tap_y,
            },
            size,
            color,
        }
    }

    pub fn track(&mut self, handle: BodyHandle, entity: Entity) {
        self.bodies.insert(handle, entity);
    }

    #[must_use]
    pub fn entity_for(&self, handle: BodyHandle) -> Option<Entity> {
        self.bodies.get(&handle).copied()
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.bodies.len()
    }

    /// Forgets every tracked body and zeroes the counter, handing back what
    /// was tracked so the caller can remove it from the engine and the world.
    pub fn reset(&mut self) -> Vec<(BodyHandle, Entity)> {
        self.counter = 0;
        let mut removed: Vec<_> = self.bodies.drain().collect();
        removed.sort_by_key(|(handle, _)| *handle);
        removed
    }
}

impl Default for SpawnController {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns a box for a tap at `tap` and registers it with the physics engine
/// for both gravity and collision.
///
/// Taps are not validated: a point outside the surface still produces a box.
pub fn spawn_box(world: &mut World, tap: Position) -> GameBox {
    let game_box = world
        .resource_mut::<SpawnController>()
        .next_box(tap.x, tap.y);

    let center = game_box.center();
    let half_extents = game_box.size.half_extents();

    let handle = {
        let mut physics = world.resource_mut::<Physics>();
        let handle = physics.0.insert_body(center, half_extents);
        physics.0.register_gravity(handle);
        physics.0.register_collision(handle);
        handle
    };

    let frame = BodyFrame {
        center,
        half_extents,
        angle: 0.0,
    };
    let entity = world.spawn((game_box, Body { handle, frame })).id();
    world.resource_mut::<SpawnController>().track(handle, entity);

    if let Some(audio_state) = world.get_resource::<AudioState>() {
        audio_state.play_sound(SoundEffect::BoxSpawn);
    }

    debug!(
        "Spawned box {} ({}x{}, {:?}) at ({}, {})",
        game_box.id,
        game_box.size.width,
        game_box.size.height,
        game_box.color,
        game_box.position.x,
        game_box.position.y
    );

    game_box
}
