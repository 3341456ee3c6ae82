//! WebGPU rendering module
//!
//! Flat vertex-colour triangles built from a [`Snapshot`](crate::sim::Snapshot).

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use shapes::scene;
pub use vertex::Vertex;
