//! Stream decoded video frames from GStreamer pipelines to a
//! caller-supplied callback.
//!
//! A [`PlayerRegistry`] hands out [`Player`] instances keyed by a
//! host-chosen id. Each player runs one pipeline built from a textual
//! description; the pipeline must contain an `appsink` named `"sink"`,
//! from which decoded frames are forwarded synchronously, on a pipeline
//! streaming thread, as borrowed [`Frame`] views.

pub mod error;
pub mod frame;
pub mod player;
pub mod registry;

mod sink;

// Re-exports
pub use error::*;
pub use frame::*;
pub use player::*;
pub use registry::*;
