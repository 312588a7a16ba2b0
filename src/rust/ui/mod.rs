//! egui front end: a side panel to pick the input method, the form itself, and
//! the results area. All state lives in [`FormController`], which has no egui
//! dependency and is what the tests drive.

mod app;
pub mod controller;

pub use app::{LaunchError, MushroomApp, MIN_VIEWPORT_SIZE};
pub use controller::{FormController, InputMode, Status, StatusTone, Upload};
