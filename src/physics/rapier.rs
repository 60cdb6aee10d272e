#![warn(clippy::all, clippy::pedantic)]

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use rapier2d::crossbeam::channel::{Receiver, unbounded};
use rapier2d::prelude::*;

use super::{BodyFrame, BodyHandle, Bounds, PhysicsEngine};
use crate::config::PhysicsConfig;
use crate::game::{BOUNDARY_THICKNESS, MAX_STEPS_PER_TICK, PHYSICS_TIMESTEP};

/// `PhysicsEngine` backed by a rapier2d pipeline.
///
/// Surface coordinates are used directly as world coordinates: y grows down
/// the screen and gravity points toward +y.
pub struct RapierEngine {
    gravity: Vector<Real>,
    restitution: Real,
    friction: Real,
    integration_params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    event_collector: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    // Contact forces are never requested, the receiver only keeps the channel open
    _contact_force_events: Receiver<ContactForceEvent>,
    boundary_colliders: HashSet<ColliderHandle>,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    half_extents: HashMap<BodyHandle, (f32, f32)>,
    collider_owners: HashMap<ColliderHandle, BodyHandle>,
    ended_contacts: Vec<BodyHandle>,
    accumulator: f32,
    next_handle: u64,
}

impl RapierEngine {
    #[must_use]
    pub fn new(config: &PhysicsConfig) -> Self {
        let (collision_send, collision_events) = unbounded();
        let (contact_force_send, contact_force_events) = unbounded();

        let integration_params = IntegrationParameters {
            dt: PHYSICS_TIMESTEP,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![0.0, config.gravity],
            restitution: config.restitution,
            friction: config.friction,
            integration_params,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            event_collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_events,
            _contact_force_events: contact_force_events,
            boundary_colliders: HashSet::new(),
            handles: HashMap::new(),
            half_extents: HashMap::new(),
            collider_owners: HashMap::new(),
            ended_contacts: Vec::new(),
            accumulator: 0.0,
            next_handle: 0,
        }
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.event_collector,
        );
    }

    // Keeps only "stopped touching a wall" events for bodies we still own
    fn collect_boundary_events(&mut self) {
        while let Ok(event) = self.collision_events.try_recv() {
            let CollisionEvent::Stopped(first, second, flags) = event else {
                continue;
            };
            if flags.contains(CollisionEventFlags::REMOVED) {
                continue;
            }

            let owner = if self.boundary_colliders.contains(&first) {
                self.collider_owners.get(&second)
            } else if self.boundary_colliders.contains(&second) {
                self.collider_owners.get(&first)
            } else {
                None
            };

            if let Some(&handle) = owner {
                trace!("Body {handle:?} ended contact with a boundary");
                self.ended_contacts.push(handle);
            }
        }
    }
}

impl PhysicsEngine for RapierEngine {
    fn set_boundary(&mut self, bounds: Bounds) {
        for handle in self.boundary_colliders.drain() {
            self.colliders
                .remove(handle, &mut self.island_manager, &mut self.bodies, true);
        }

        let half = BOUNDARY_THICKNESS / 2.0;
        let (w, h) = (bounds.width, bounds.height);
        let walls = [
            // Floor and ceiling extend past the corners so nothing slips through
            (vector![w / 2.0, h + half], w / 2.0 + BOUNDARY_THICKNESS, half),
            (vector![w / 2.0, -half], w / 2.0 + BOUNDARY_THICKNESS, half),
            (vector![-half, h / 2.0], half, h / 2.0 + BOUNDARY_THICKNESS),
            (vector![w + half, h / 2.0], half, h / 2.0 + BOUNDARY_THICKNESS),
        ];

        for (translation, hx, hy) in walls {
            let wall = ColliderBuilder::cuboid(hx, hy)
                .translation(translation)
                .restitution(self.restitution)
                .friction(self.friction)
                .build();
            let handle = self.colliders.insert(wall);
            self.boundary_colliders.insert(handle);
        }

        debug!("Boundary set to {w}x{h} points");
    }

    fn insert_body(&mut self, center: (f32, f32), half_extents: (f32, f32)) -> BodyHandle {
        // The body carries all of the mass, its collider adds none
        let mass = MassProperties::from_cuboid(1.0, vector![half_extents.0, half_extents.1]);
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.0, center.1])
            .additional_mass_properties(mass)
            .gravity_scale(0.0)
            .build();
        let rigid_body = self.bodies.insert(body);

        self.next_handle += 1;
        let handle = BodyHandle(self.next_handle);
        self.handles.insert(handle, rigid_body);
        self.half_extents.insert(handle, half_extents);
        handle
    }

    fn register_gravity(&mut self, handle: BodyHandle) {
        if let Some(body) = self
            .handles
            .get(&handle)
            .and_then(|rigid_body| self.bodies.get_mut(*rigid_body))
        {
            body.set_gravity_scale(1.0, true);
        }
    }

    fn register_collision(&mut self, handle: BodyHandle) {
        let (Some(&rigid_body), Some(&(hx, hy))) =
            (self.handles.get(&handle), self.half_extents.get(&handle))
        else {
            return;
        };

        // A body only ever gets one collider
        if self.collider_owners.values().any(|owner| *owner == handle) {
            return;
        }

        let collider = ColliderBuilder::cuboid(hx, hy)
            .density(0.0)
            .restitution(self.restitution)
            .friction(self.friction)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, rigid_body, &mut self.bodies);
        self.collider_owners.insert(collider_handle, handle);
    }

    fn unregister(&mut self, handle: BodyHandle) {
        let Some(rigid_body) = self.handles.remove(&handle) else {
            return;
        };
        self.half_extents.remove(&handle);
        self.collider_owners.retain(|_, owner| *owner != handle);
        self.ended_contacts.retain(|ended| *ended != handle);
        self.bodies.remove(
            rigid_body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn step(&mut self, dt: f32) {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= PHYSICS_TIMESTEP && steps < MAX_STEPS_PER_TICK {
            self.step_once();
            self.collect_boundary_events();
            self.accumulator -= PHYSICS_TIMESTEP;
            steps += 1;
        }

        if steps == MAX_STEPS_PER_TICK {
            // Drop the backlog instead of trying to catch up
            self.accumulator = 0.0;
        }
    }

    fn take_boundary_contacts_ended(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.ended_contacts)
    }

    fn body_frame(&self, handle: BodyHandle) -> Option<BodyFrame> {
        let body = self.bodies.get(*self.handles.get(&handle)?)?;
        let half_extents = *self.half_extents.get(&handle)?;
        let translation = body.translation();

        Some(BodyFrame {
            center: (translation.x, translation.y),
            half_extents,
            angle: body.rotation().angle(),
        })
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }
}
