//! Contract between the game and the physics engine that simulates the boxes.
//!
//! The game never moves bodies itself. It creates a body, opts it into
//! gravity and collision, steps the engine, and listens for bodies that stop
//! touching the surface bounds.

pub mod rapier;

use bevy_ecs::prelude::*;

pub use rapier::RapierEngine;

/// Opaque handle the engine hands out for each body it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Axis-aligned rectangle of the play surface, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pose of a simulated body as last reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub center: (f32, f32),
    pub half_extents: (f32, f32),
    /// Rotation in radians
    pub angle: f32,
}

impl BodyFrame {
    /// Returns true when the point lies inside the rotated rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.center.0, y - self.center.1);
        let (sin, cos) = self.angle.sin_cos();
        // Rotate the point into the body's local frame
        let local_x = dx * cos + dy * sin;
        let local_y = -dx * sin + dy * cos;
        local_x.abs() <= self.half_extents.0 && local_y.abs() <= self.half_extents.1
    }

    /// Axis-aligned bounding box as (min_x, min_y, max_x, max_y).
    #[must_use]
    pub fn aabb(&self) -> (f32, f32, f32, f32) {
        let (sin, cos) = self.angle.sin_cos();
        let ex = self.half_extents.0 * cos.abs() + self.half_extents.1 * sin.abs();
        let ey = self.half_extents.0 * sin.abs() + self.half_extents.1 * cos.abs();
        (
            self.center.0 - ex,
            self.center.1 - ey,
            self.center.0 + ex,
            self.center.1 + ey,
        )
    }
}

pub trait PhysicsEngine: Send + Sync {
    /// Turns the edges of the surface into collision boundaries.
    fn set_boundary(&mut self, bounds: Bounds);

    /// Creates a body that is neither affected by gravity nor colliding yet.
    fn insert_body(&mut self, center: (f32, f32), half_extents: (f32, f32)) -> BodyHandle;

    fn register_gravity(&mut self, handle: BodyHandle);

    fn register_collision(&mut self, handle: BodyHandle);

    /// Removes the body from every behaviour and from the world. Unknown
    /// handles are ignored.
    fn unregister(&mut self, handle: BodyHandle);

    fn step(&mut self, dt: f32);

    /// Drains the bodies that ended a contact with a boundary since the last call.
    fn take_boundary_contacts_ended(&mut self) -> Vec<BodyHandle>;

    fn body_frame(&self, handle: BodyHandle) -> Option<BodyFrame>;

    fn body_count(&self) -> usize;
}

/// The engine driving the current session, stored in the world.
#[derive(Resource)]
pub struct Physics(pub Box<dyn PhysicsEngine>);

impl Physics {
    pub fn new(engine: impl PhysicsEngine + 'static) -> Self {
        Self(Box::new(engine))
    }
}
