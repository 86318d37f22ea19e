//! Loaded asset hierarchy attached to the scene as one node.

use crate::animation::AnimationClip;
use crate::material::Material;
use crate::scene::GeometryId;
use crate::{Mat4, Quat, Vec3};

/// Local transform of a model part (quaternion rotation, as asset formats store it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartMesh {
    pub geometry: GeometryId,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelPart {
    pub name: String,
    pub parent: Option<usize>,
    pub pose: Pose,
    pub meshes: Vec<PartMesh>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub parts: Vec<ModelPart>,
    pub clips: Vec<AnimationClip>,
}

impl Model {
    pub fn mesh_count(&self) -> usize {
        self.parts.iter().map(|p| p.meshes.len()).sum()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &PartMesh> {
        self.parts.iter().flat_map(|p| p.meshes.iter())
    }

    /// World matrix of every part, `root` applied on top.
    ///
    /// Parts may be listed in any order. A parent index that is out of
    /// range or closes a cycle is treated as a root.
    pub fn world_matrices(&self, root: Mat4) -> Vec<Mat4> {
        let n = self.parts.len();
        let mut world: Vec<Option<Mat4>> = vec![None; n];
        let mut chain = Vec::new();

        for start in 0..n {
            if world[start].is_some() {
                continue;
            }
            chain.clear();
            let mut cur = Some(start);
            while let Some(i) = cur {
                if world[i].is_some() || chain.contains(&i) {
                    break;
                }
                chain.push(i);
                cur = self.parts[i].parent.filter(|&p| p < n);
            }
            // Resolve from the top of the chain downwards.
            for &i in chain.iter().rev() {
                let parent = self.parts[i]
                    .parent
                    .filter(|&p| p < n)
                    .and_then(|p| world[p])
                    .unwrap_or(root);
                world[i] = Some(parent * self.parts[i].pose.matrix());
            }
        }
        world.into_iter().map(|m| m.unwrap_or(root)).collect()
    }
}
