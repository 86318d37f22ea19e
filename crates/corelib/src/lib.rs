//! Core types: math re-exports, transforms, camera, scene graph, animation.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod animation;
pub mod camera;
pub mod clock;
pub mod error;
pub mod geometry;
pub mod light;
pub mod material;
pub mod model;
pub mod render;
pub mod scene;
pub mod texture;
pub mod transform;

pub use error::{CoreError, CoreResult};
