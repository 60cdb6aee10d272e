#![warn(clippy::all, clippy::pedantic)]

pub mod screenshake_tests;
pub mod systems_tests;
pub mod ui_tests;

pub mod test_utils;
