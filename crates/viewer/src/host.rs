//! What the embedding host hands to the viewer.

/// Drawing area in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Container {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

/// Callbacks into the host. All run on the viewer's thread.
#[derive(Default)]
pub struct ViewerHooks {
    /// Fired once, when the real asset has been attached.
    pub on_loaded: Option<Box<dyn FnMut()>>,
}

impl ViewerHooks {
    pub fn on_loaded(f: impl FnMut() + 'static) -> Self {
        Self {
            on_loaded: Some(Box::new(f)),
        }
    }
}
