//! Window input to viewer pointer input.

use std::time::{Duration, Instant};

use viewer::PointerInput;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase, WindowEvent};

/// Last cursor position plus the touch that currently drives rotation.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: (f32, f32),
    active_touch: Option<u64>,
}

impl PointerTracker {
    /// Pointer input carried by a window event, in logical pixels.
    /// Non-pointer events and ignored touches give `None`.
    pub fn translate(&mut self, event: &WindowEvent, scale: f64) -> Option<PointerInput> {
        let logical = |p: PhysicalPosition<f64>| {
            let l = p.to_logical::<f32>(scale);
            (l.x, l.y)
        };
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = logical(*position);
                Some(self.cursor_moved(x, y))
            }
            WindowEvent::MouseInput { state, .. } => Some(self.mouse_button(*state)),
            WindowEvent::Touch(touch) => {
                let (x, y) = logical(touch.location);
                self.touch(touch.id, touch.phase, x, y)
            }
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) -> PointerInput {
        self.cursor = (x, y);
        PointerInput::Move { x, y }
    }

    /// Any button counts; winit reports no position with button events.
    pub fn mouse_button(&mut self, state: ElementState) -> PointerInput {
        match state {
            ElementState::Pressed => PointerInput::Press {
                x: self.cursor.0,
                y: self.cursor.1,
            },
            ElementState::Released => PointerInput::Release,
        }
    }

    /// Only the first active touch is followed; others are dropped.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<PointerInput> {
        match phase {
            TouchPhase::Started if self.active_touch.is_none() => {
                self.active_touch = Some(id);
                Some(PointerInput::Press { x, y })
            }
            TouchPhase::Moved if self.active_touch == Some(id) => Some(PointerInput::Move { x, y }),
            TouchPhase::Ended | TouchPhase::Cancelled if self.active_touch == Some(id) => {
                self.active_touch = None;
                Some(PointerInput::Release)
            }
            _ => None,
        }
    }
}

/// Frames per second, sampled once per second.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self { frames: 0, since: now }
    }

    /// Counts one frame; returns the rate when a full second has elapsed.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed < Self::WINDOW {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}
