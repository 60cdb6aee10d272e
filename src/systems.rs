#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::Body;
use crate::outcome::{self, ContactOutcome};
use crate::physics::{BodyFrame, BodyHandle, Physics};
use crate::screenshake;

/// Advances the simulation and feeds every boundary contact that ended
/// during the step to the outcome evaluator.
pub fn physics_system(world: &mut World, delta_seconds: f32) -> Vec<ContactOutcome> {
    let ended = {
        let mut physics = world.resource_mut::<Physics>();
        physics.0.step(delta_seconds);
        physics.0.take_boundary_contacts_ended()
    };

    if !ended.is_empty() {
        trace!("{} boundary contacts ended this tick", ended.len());
    }

    let outcomes = ended
        .into_iter()
        .map(|handle| outcome::on_boundary_contact(world, handle))
        .collect();

    sync_body_frames(world);
    outcomes
}

/// Copies the engine's current pose of every body into its box entity.
pub fn sync_body_frames(world: &mut World) {
    let bodies: Vec<(Entity, BodyHandle)> = world
        .query::<(Entity, &Body)>()
        .iter(world)
        .map(|(entity, body)| (entity, body.handle))
        .collect();

    let frames: Vec<(Entity, BodyFrame)> = {
        let physics = world.resource::<Physics>();
        bodies
            .into_iter()
            .filter_map(|(entity, handle)| {
                physics.0.body_frame(handle).map(|frame| (entity, frame))
            })
            .collect()
    };

    for (entity, frame) in frames {
        if let Some(mut body) = world.get_mut::<Body>(entity) {
            body.frame = frame;
        }
    }
}

pub fn effects_system(world: &mut World, delta_seconds: f32) {
    screenshake::update_screen_shake(world, delta_seconds);
}
