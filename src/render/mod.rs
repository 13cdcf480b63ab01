//! Page applications shipped with the server.

pub mod debug;

pub use debug::{DebugApp, RenderedPage};
