//! WebGPU rendering module
//!
//! Flat-colored triangles in pixel space: the scene is rebuilt from the
//! game state every frame and converted to NDC using the current surface size.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
