#![warn(clippy::all, clippy::pedantic)]

use std::collections::BTreeSet;

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::{Body, GameBox, GamePhase, GameState};
use crate::game::{GAME_OVER_SHAKE_DURATION, GAME_OVER_SHAKE_INTENSITY};
use crate::physics::{BodyHandle, Physics};
use crate::screenshake;
use crate::sound::{AudioState, SoundEffect};
use crate::spawn::SpawnController;

/// What a boundary contact meant for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The body is not one of ours (never tracked, or already reset)
    Ignored,
    /// The first box is allowed to touch the bounds while it settles
    FirstBox,
    GameOver { culprit: u32 },
    /// A game over is already waiting for acknowledgment
    Debounced,
}

/// Decides what a boundary contact by `game_box` means in `phase`.
#[must_use]
pub fn evaluate_contact(phase: GamePhase, game_box: Option<&GameBox>) -> ContactOutcome {
    let Some(game_box) = game_box else {
        return ContactOutcome::Ignored;
    };

    match phase {
        GamePhase::GameOverPending { .. } => ContactOutcome::Debounced,
        GamePhase::Playing if game_box.is_first() => ContactOutcome::FirstBox,
        GamePhase::Playing => ContactOutcome::GameOver {
            culprit: game_box.id,
        },
    }
}

/// Handles a body that ended a contact with the surface bounds.
pub fn on_boundary_contact(world: &mut World, handle: BodyHandle) -> ContactOutcome {
    let game_box = world
        .resource::<SpawnController>()
        .entity_for(handle)
        .and_then(|entity| world.get::<GameBox>(entity))
        .copied();

    let phase = world.resource::<GameState>().phase;
    let outcome = evaluate_contact(phase, game_box.as_ref());

    match outcome {
        ContactOutcome::GameOver { culprit } => {
            let count = world.resource::<SpawnController>().counter();
            {
                let mut game_state = world.resource_mut::<GameState>();
                game_state.phase = GamePhase::GameOverPending { culprit };
                game_state.losses += 1;
                game_state.record_count(count);
            }

            if let Some(audio_state) = world.get_resource::<AudioState>() {
                audio_state.play_sound(SoundEffect::GameOver);
            }
            screenshake::trigger_screen_shake(
                world,
                GAME_OVER_SHAKE_INTENSITY,
                GAME_OVER_SHAKE_DURATION,
            );

            info!("Game over: box {culprit} touched the bounds with {count} boxes on screen");
        }
        ContactOutcome::Debounced => {
            debug!("Ignoring contact for {handle:?}, game over already pending");
        }
        ContactOutcome::FirstBox | ContactOutcome::Ignored => {}
    }

    outcome
}

/// Dismisses a pending game over and starts a fresh session. Returns false
/// when there was nothing to acknowledge.
pub fn acknowledge_game_over(world: &mut World) -> bool {
    if !world.resource::<GameState>().is_game_over_pending() {
        return false;
    }

    let removed = reset_session(world);
    world.resource_mut::<GameState>().phase = GamePhase::Playing;

    if let Some(audio_state) = world.get_resource::<AudioState>() {
        audio_state.play_sound(SoundEffect::Reset);
    }

    info!("Session reset, removed {removed} boxes");
    true
}

/// Removes every box from the engine and the world and zeroes the counter.
/// Returns how many boxes were removed.
pub fn reset_session(world: &mut World) -> usize {
    let tracked = world.resource_mut::<SpawnController>().reset();

    let boxes: Vec<(Entity, BodyHandle)> = world
        .query_filtered::<(Entity, &Body), With<GameBox>>()
        .iter(world)
        .map(|(entity, body)| (entity, body.handle))
        .collect();

    let handles: BTreeSet<BodyHandle> = tracked
        .iter()
        .map(|(handle, _)| *handle)
        .chain(boxes.iter().map(|(_, handle)| *handle))
        .collect();

    {
        let mut physics = world.resource_mut::<Physics>();
        for handle in handles {
            physics.0.unregister(handle);
        }
    }

    for (entity, _) in &boxes {
        world.despawn(*entity);
    }

    boxes.len()
}
