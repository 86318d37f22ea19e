//! Asset loading: format parsers behind a registry, plus the asynchronous
//! request that reads a file off the event-loop thread.
//!
//! - glTF 2.0 (`.gltf`, `.glb`) with node hierarchy and animation clips.
//! - Wavefront OBJ (`.obj`), single mesh.

pub mod gltf_loader;
pub mod loader;
pub mod obj;
pub mod request;
pub mod texture;

pub use loader::{AssetLoader, LoadedAsset, LoadedMesh, LoadedNode, LoaderRegistry};
pub use request::{AssetRequest, LoadEvent, LoadOutcome, Progress};
