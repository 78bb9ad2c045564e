//! Function and derivative visualizer core.
//!
//! `derivative_engine` turns a normalized expression into a symbolic derivative label and
//! two numeric evaluators, `render_controller` holds the plotted session and drives a
//! [`render_controller::PlotSurface`], and `visualizer` binds the controller to the input
//! widgets (text field, slope slider) and to user-facing alerts.
pub mod derivative_engine;
pub mod errors;
pub mod render_controller;
pub mod visualizer;
mod controller_tests;
