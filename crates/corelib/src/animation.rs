//! Keyframe clips and the controller that plays them on a model.

use crate::error::{CoreError, CoreResult};
use crate::model::{Model, Pose};
use crate::scene::NodeId;
use crate::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Values come as (in-tangent, value, out-tangent) triples.
    /// Sampled linearly between the value keys.
    CubicSpline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl ChannelValues {
    fn len(&self) -> usize {
        match self {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        }
    }
}

/// One animated property of one model part.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    target: usize,
    times: Vec<f32>,
    values: ChannelValues,
    interpolation: Interpolation,
}

impl Channel {
    pub fn new(
        target: usize,
        times: Vec<f32>,
        values: ChannelValues,
        interpolation: Interpolation,
    ) -> CoreResult<Self> {
        if times.is_empty() {
            return Err(CoreError::InvalidChannel("no keyframes".into()));
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(CoreError::InvalidChannel("keyframe times are not sorted".into()));
        }
        let per_key = match interpolation {
            Interpolation::CubicSpline => 3,
            _ => 1,
        };
        if values.len() != times.len() * per_key {
            return Err(CoreError::InvalidChannel(format!(
                "{} values for {} keyframes",
                values.len(),
                times.len()
            )));
        }
        Ok(Self {
            target,
            times,
            values,
            interpolation,
        })
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Keyframe pair around `t` and the blend factor between them.
    fn locate(&self, t: f32) -> (usize, usize, f32) {
        let last = self.times.len() - 1;
        let next = self.times.partition_point(|&k| k <= t);
        if next == 0 {
            return (0, 0, 0.0);
        }
        if next > last {
            return (last, last, 0.0);
        }
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let f = if span > 0.0 {
            (t - self.times[prev]) / span
        } else {
            0.0
        };
        match self.interpolation {
            Interpolation::Step => (prev, prev, 0.0),
            _ => (prev, next, f),
        }
    }

    fn key(&self, i: usize) -> usize {
        match self.interpolation {
            Interpolation::CubicSpline => i * 3 + 1,
            _ => i,
        }
    }

    /// Writes the sampled value at `t` into `pose`.
    pub fn apply(&self, t: f32, pose: &mut Pose) {
        let (a, b, f) = self.locate(t);
        let (a, b) = (self.key(a), self.key(b));
        match &self.values {
            ChannelValues::Translation(v) => pose.translation = v[a].lerp(v[b], f),
            ChannelValues::Scale(v) => pose.scale = v[a].lerp(v[b], f),
            ChannelValues::Rotation(v) => pose.rotation = v[a].slerp(v[b], f).normalize(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels.iter().map(Channel::end_time).fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }

    /// Poses every targeted part at time `t`. Out-of-range targets are skipped.
    pub fn apply(&self, t: f32, model_parts: &mut [crate::model::ModelPart]) {
        for ch in &self.channels {
            if let Some(part) = model_parts.get_mut(ch.target) {
                ch.apply(t, &mut part.pose);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

#[derive(Clone, Copy, Debug)]
struct Action {
    clip: usize,
    time: f32,
    playing: bool,
}

/// Plays clips of one model node. Actions loop forever.
#[derive(Clone, Debug)]
pub struct AnimationController {
    target: NodeId,
    actions: Vec<Action>,
}

impl AnimationController {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            actions: Vec::new(),
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Action for a clip index; repeated calls return the same action.
    pub fn clip_action(&mut self, clip: usize) -> ActionId {
        if let Some(i) = self.actions.iter().position(|a| a.clip == clip) {
            return ActionId(i);
        }
        self.actions.push(Action {
            clip,
            time: 0.0,
            playing: false,
        });
        ActionId(self.actions.len() - 1)
    }

    pub fn play(&mut self, id: ActionId) {
        if let Some(a) = self.actions.get_mut(id.0) {
            a.playing = true;
        }
    }

    pub fn stop(&mut self, id: ActionId) {
        if let Some(a) = self.actions.get_mut(id.0) {
            a.playing = false;
            a.time = 0.0;
        }
    }

    pub fn is_playing(&self, id: ActionId) -> bool {
        self.actions.get(id.0).is_some_and(|a| a.playing)
    }

    /// Clip indices currently playing.
    pub fn playing_clips(&self) -> Vec<usize> {
        self.actions
            .iter()
            .filter(|a| a.playing)
            .map(|a| a.clip)
            .collect()
    }

    pub fn time(&self, id: ActionId) -> Option<f32> {
        self.actions.get(id.0).map(|a| a.time)
    }

    /// Advances playing actions by `dt` seconds and poses `model`.
    pub fn update(&mut self, dt: f32, model: &mut Model) {
        for action in self.actions.iter_mut().filter(|a| a.playing) {
            let Some(clip) = model.clips.get(action.clip) else {
                continue;
            };
            action.time += dt.max(0.0);
            if clip.duration > 0.0 {
                action.time %= clip.duration;
            } else {
                action.time = 0.0;
            }
            clip.apply(action.time, &mut model.parts);
        }
    }
}
