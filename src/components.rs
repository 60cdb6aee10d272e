#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from f32 to u16 since surface cells always fit the terminal
    clippy::cast_possible_truncation,
    // Allow sign loss when going from f32 to unsigned types since we clamp values first
    clippy::cast_sign_loss,
    // Allow precision loss when casting box sizes to f32, they are far below 2^24
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;

use crate::game::FIRST_BOX_ID;
use crate::physics::{BodyFrame, BodyHandle, Bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxColor {
    Blue,
    Green,
    Red,
    Orange,
    Yellow,
}

/// Every color a box can take, indexed by a uniform draw in `0..PALETTE.len()`.
pub const PALETTE: [BoxColor; 5] = [
    BoxColor::Blue,
    BoxColor::Green,
    BoxColor::Red,
    BoxColor::Orange,
    BoxColor::Yellow,
];

impl BoxColor {
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            BoxColor::Blue => (52, 152, 219),
            BoxColor::Green => (46, 204, 113),
            BoxColor::Red => (231, 76, 60),
            BoxColor::Orange => (230, 126, 34),
            BoxColor::Yellow => (241, 196, 15),
        }
    }

    #[must_use]
    pub fn get_color(self) -> ratatui::style::Color {
        let (r, g, b) = self.rgb();
        ratatui::style::Color::Rgb(r, g, b)
    }
}

/// Point on the play surface, in points. y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

impl BoxSize {
    #[must_use]
    pub fn half_extents(self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// A spawned box as it was created. `position` is its top-left corner at
/// spawn time; the engine owns where it is afterwards.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GameBox {
    pub id: u32,
    pub position: Position,
    pub size: BoxSize,
    pub color: BoxColor,
}

impl GameBox {
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        let (hx, hy) = self.size.half_extents();
        (self.position.x + hx, self.position.y + hy)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.id <= FIRST_BOX_ID
    }
}

/// Link from a box entity to its simulated body.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub handle: BodyHandle,
    /// Last pose reported by the engine, refreshed every tick
    pub frame: BodyFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    /// A box other than the first ended a contact with the bounds; the dialog
    /// is up until the player acknowledges it.
    GameOverPending { culprit: u32 },
}

#[derive(Debug, Resource, Clone, Default)]
pub struct GameState {
    pub phase: GamePhase,
    pub losses: u32,
    /// Highest box count reached in any session
    pub best_count: u32,
}

impl GameState {
    #[must_use]
    pub fn is_game_over_pending(&self) -> bool {
        matches!(self.phase, GamePhase::GameOverPending { .. })
    }

    pub fn record_count(&mut self, count: u32) {
        self.best_count = self.best_count.max(count);
    }
}

/// The play surface and how it maps onto terminal cells.
#[derive(Debug, Resource, Clone, Copy, PartialEq)]
pub struct Surface {
    pub bounds: Bounds,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Surface {
    #[must_use]
    pub fn from_cells(columns: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self {
            bounds: Bounds::new(
                f32::from(columns) * cell_width,
                f32::from(rows) * cell_height,
            ),
            cell_width,
            cell_height,
        }
    }

    /// Surface point under a terminal cell, relative to the surface origin.
    /// A tap lands in the middle of the column and at the top of the row.
    #[must_use]
    pub fn cell_to_point(&self, column: u16, row: u16) -> Position {
        Position {
            x: (f32::from(column) + 0.5) * self.cell_width,
            y: f32::from(row) * self.cell_height,
        }
    }

    /// Returns true when the point lies on the surface, edges included.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        (0.0..=self.bounds.width).contains(&point.x)
            && (0.0..=self.bounds.height).contains(&point.y)
    }

    /// Center of a terminal cell in surface points.
    #[must_use]
    pub fn cell_center(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (f32::from(column) + 0.5) * self.cell_width,
            (f32::from(row) + 0.5) * self.cell_height,
        )
    }

    /// Column range covering a span of points, clamped to the surface.
    #[must_use]
    pub fn columns_between(&self, min_x: f32, max_x: f32) -> std::ops::Range<u16> {
        let columns = (self.bounds.width / self.cell_width).round();
        let start = (min_x / self.cell_width).floor().clamp(0.0, columns) as u16;
        let end = (max_x / self.cell_width).ceil().clamp(0.0, columns) as u16;
        start..end
    }

    #[must_use]
    pub fn rows_between(&self, min_y: f32, max_y: f32) -> std::ops::Range<u16> {
        let rows = (self.bounds.height / self.cell_height).round();
        let start = (min_y / self.cell_height).floor().clamp(0.0, rows) as u16;
        let end = (max_y / self.cell_height).ceil().clamp(0.0, rows) as u16;
        start..end
    }
}

// Screen shake effect
#[derive(Debug, Clone, Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub current_offset: (i16, i16),
    pub is_active: bool,
}
