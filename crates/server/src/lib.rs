//! HTTP control surface for the trailer monitor.

pub mod api;
pub mod metrics;
pub mod state;
