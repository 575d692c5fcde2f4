//! An in-memory object model for the copy engine.
//!
//! [`RigTree`] stands in for a host editor's scene graph, [`TypeRegistry`]
//! for its type lookup and [`JsonFieldSerializer`] for its component
//! serialization. Scenes can be loaded from and saved to JSON files.

mod registry;
mod scene;
mod serializer;
mod tree;

pub use registry::TypeRegistry;
pub use scene::{SceneComponent, SceneError, SceneNode};
pub use serializer::JsonFieldSerializer;
pub use tree::*;
