use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use bevy_ecs::prelude::*;

use crate::app::App;
use crate::components::{GameState, ScreenShake, Surface};
use crate::config::Config;
use crate::physics::{BodyFrame, BodyHandle, Bounds, Physics, PhysicsEngine};
use crate::sound::AudioState;
use crate::spawn::SpawnController;

pub const TEST_SEED: u64 = 42;

#[derive(Debug, Default)]
pub struct ScriptedState {
    pub boundary: Option<Bounds>,
    pub bodies: HashMap<BodyHandle, BodyFrame>,
    pub gravity: HashSet<BodyHandle>,
    pub collision: HashSet<BodyHandle>,
    pub unregistered: Vec<BodyHandle>,
    pub pending_contacts: Vec<BodyHandle>,
    pub steps: u32,
    next_handle: u64,
}

/// A physics engine that never moves anything. Tests keep a clone to inspect
/// registrations and to inject boundary contacts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap()
    }

    pub fn push_contact_ended(&self, handle: BodyHandle) {
        self.state().pending_contacts.push(handle);
    }

    pub fn is_registered(&self, handle: BodyHandle) -> bool {
        let state = self.state();
        state.bodies.contains_key(&handle)
            && state.gravity.contains(&handle)
            && state.collision.contains(&handle)
    }
}

impl PhysicsEngine for ScriptedEngine {
    fn set_boundary(&mut self, bounds: Bounds) {
        self.state().boundary = Some(bounds);
    }

    fn insert_body(&mut self, center: (f32, f32), half_extents: (f32, f32)) -> BodyHandle {
        let mut state = self.state();
        state.next_handle += 1;
        let handle = BodyHandle(state.next_handle);
        state.bodies.insert(
            handle,
            BodyFrame {
                center,
                half_extents,
                angle: 0.0,
            },
        );
        handle
    }

    fn register_gravity(&mut self, handle: BodyHandle) {
        self.state().gravity.insert(handle);
    }

    fn register_collision(&mut self, handle: BodyHandle) {
        self.state().collision.insert(handle);
    }

    fn unregister(&mut self, handle: BodyHandle) {
        let mut state = self.state();
        if state.bodies.remove(&handle).is_some() {
            state.gravity.remove(&handle);
            state.collision.remove(&handle);
            state.unregistered.push(handle);
        }
    }

    fn step(&mut self, _dt: f32) {
        self.state().steps += 1;
    }

    fn take_boundary_contacts_ended(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.state().pending_contacts)
    }

    fn body_frame(&self, handle: BodyHandle) -> Option<BodyFrame> {
        self.state().bodies.get(&handle).copied()
    }

    fn body_count(&self) -> usize {
        self.state().bodies.len()
    }
}

pub fn test_surface() -> Surface {
    Surface::from_cells(60, 30, 8.0, 16.0)
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.game.seed = TEST_SEED;
    config
}

/// A silent app on a scripted engine, plus the handle to script it.
pub fn create_test_app() -> (App, ScriptedEngine) {
    let engine = ScriptedEngine::new();
    let app = App::new(
        &test_config(),
        test_surface(),
        engine.clone(),
        AudioState::silent(),
    );
    (app, engine)
}

/// A bare world with just what spawning and outcome evaluation need.
pub fn create_test_world() -> (World, ScriptedEngine) {
    let engine = ScriptedEngine::new();
    let mut world = World::new();
    world.insert_resource(GameState::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(SpawnController::with_seed(TEST_SEED));
    world.insert_resource(Physics::new(engine.clone()));
    (world, engine)
}
