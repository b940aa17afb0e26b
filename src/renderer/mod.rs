//! WebGPU rendering module
//!
//! The renderer is a pure consumer of simulation state: it turns a
//! `GameState` into triangles and never writes back.

pub mod effects;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use effects::FrameEffects;
pub use pipeline::RenderState;
pub use shapes::build_frame;
pub use vertex::Vertex;
