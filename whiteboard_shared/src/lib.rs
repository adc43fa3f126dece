//! Types and client logic shared by every part of the whiteboard.

pub mod error;
pub mod render;
pub mod shared_types;
pub mod surface;

pub use error::WireError;
pub use shared_types::{EventKind, Point, Stroke, Tool, WsMessage};
pub use surface::DrawingSurface;
