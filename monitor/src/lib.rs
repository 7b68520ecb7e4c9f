//! Console front-ends for the FloodNet flood and traffic monitoring
//! service.
//!
//! Every surface runs the same pipeline: resolve where the user is, poll
//! the backend on the surface's period, correlate what came back, and
//! present it as text. The `monitor` binary runs the pipeline continuously
//! until interrupted; `report` runs every surface once and exits.

pub mod config;
pub mod context;
pub mod geo;
pub mod geocode;
pub mod location;
pub mod poll;
pub mod render;
pub mod risk;
pub mod screens;
pub mod telemetry;
