//! HTTP API handlers for chordbot-api

pub mod health;
pub mod predict;
pub mod ui;

pub use health::health_routes;
pub use predict::{predict_chord, predict_chord_query, predict_routes};
pub use ui::{serve_index, ui_routes};
