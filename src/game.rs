#![warn(clippy::all, clippy::pedantic)]

// Box dimensions, in surface points
pub const MIN_BOX_SIZE: u32 = 30;
pub const BOX_SIZE_SPAN: u32 = 100; // sizes are drawn from MIN_BOX_SIZE..MIN_BOX_SIZE + BOX_SIZE_SPAN
pub const MAX_BOX_SIZE: u32 = MIN_BOX_SIZE + BOX_SIZE_SPAN - 1;

// The first box of a session is allowed to touch the bounds while settling
pub const FIRST_BOX_ID: u32 = 1;

// Surface scale: how many points one terminal cell covers
pub const DEFAULT_CELL_WIDTH: f32 = 8.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 16.0;

// Physics defaults
pub const DEFAULT_GRAVITY: f32 = 980.0; // points / s^2, pointing down the screen
pub const DEFAULT_RESTITUTION: f32 = 0.3;
pub const DEFAULT_FRICTION: f32 = 0.6;
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 60.0;
pub const MAX_STEPS_PER_TICK: u32 = 8; // avoid a spiral of death after a long stall

// Thickness of the walls placed just outside the surface bounds
pub const BOUNDARY_THICKNESS: f32 = 200.0;

// Game over feedback
pub const GAME_OVER_SHAKE_INTENSITY: f32 = 1.5;
pub const GAME_OVER_SHAKE_DURATION: f32 = 0.4;

// Width of the info panel next to the play surface, in columns
pub const INFO_PANEL_WIDTH: u16 = 24;
