//! The model viewer: scene setup, placeholder content, asset attachment,
//! drag rotation and the per-frame update.
//!
//! Everything here runs on the host's event-loop thread. The only other
//! threads are the asset request's, which hand results over as
//! [`asset::LoadEvent`]s; no viewer state is shared, so nothing is locked.

pub mod config;
pub mod host;
pub mod interaction;
mod viewer;

pub use config::ViewerConfig;
pub use host::{Container, ViewerHooks};
pub use interaction::{InteractionState, PointerInput};
pub use viewer::Viewer;

pub use corelib::render::ShadowMode;
