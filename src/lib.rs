pub mod app;
pub mod components;
pub mod config;
pub mod game;
pub mod outcome;
pub mod physics;
pub mod screenshake;
pub mod sound;
pub mod spawn;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;
