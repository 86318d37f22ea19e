//! Format-agnostic asset description and the loader registry.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use corelib::animation::AnimationClip;
use corelib::geometry::MeshData;
use corelib::material::Material;
use corelib::model::Pose;
use corelib::texture::TextureData;

/// One drawable primitive of an asset.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedMesh {
    pub data: MeshData,
    pub material: Material,
    /// Index into [`LoadedAsset::textures`]; the scene handle in
    /// `material` is only set once the asset is attached.
    pub base_color_texture: Option<usize>,
}

/// Node of the asset hierarchy. `meshes` index into [`LoadedAsset::meshes`].
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedNode {
    pub name: String,
    pub parent: Option<usize>,
    pub pose: Pose,
    pub meshes: Vec<usize>,
}

/// Parsed asset, not yet attached to any scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedAsset {
    pub name: String,
    pub meshes: Vec<LoadedMesh>,
    pub nodes: Vec<LoadedNode>,
    pub clips: Vec<AnimationClip>,
    pub textures: Vec<TextureData>,
}

impl LoadedAsset {
    /// Unnamed asset made of one node holding one mesh.
    pub fn single_mesh(data: MeshData, material: Material) -> Self {
        Self {
            name: String::new(),
            nodes: vec![LoadedNode {
                name: "mesh".into(),
                parent: None,
                pose: Pose::IDENTITY,
                meshes: vec![0],
            }],
            meshes: vec![LoadedMesh {
                data,
                material,
                base_color_texture: None,
            }],
            clips: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub fn has_animations(&self) -> bool {
        !self.clips.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.data.vertices.len()).sum()
    }
}

/// Parser for one family of mesh formats.
pub trait AssetLoader: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower-case file extensions without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// `base_dir` resolves external references such as `.bin` buffers.
    fn parse(&self, bytes: &[u8], base_dir: Option<&Path>) -> Result<LoadedAsset>;
}

/// Maps file extensions to loaders. First registration wins.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: Vec<Arc<dyn AssetLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// glTF 2.0 and OBJ.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::gltf_loader::GltfLoader));
        registry.register(Arc::new(crate::obj::ObjLoader));
        registry
    }

    pub fn register(&mut self, loader: Arc<dyn AssetLoader>) {
        log::debug!("Registered asset loader {} {:?}", loader.name(), loader.extensions());
        self.loaders.push(loader);
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn for_extension(&self, ext: &str) -> Option<Arc<dyn AssetLoader>> {
        let ext = ext.to_ascii_lowercase();
        self.loaders
            .iter()
            .find(|l| l.extensions().iter().any(|e| *e == ext))
            .cloned()
    }

    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn AssetLoader>> {
        let ext = path.extension()?.to_str()?;
        self.for_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = LoaderRegistry::with_defaults();
        assert_eq!(registry.for_path(Path::new("a/b/model.GLB")).unwrap().name(), "glTF");
        assert_eq!(registry.for_path(Path::new("cube.obj")).unwrap().name(), "OBJ");
        assert!(registry.for_path(Path::new("hero.fbx")).is_none());
        assert!(registry.for_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn empty_registry_has_no_capability() {
        let registry = LoaderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.for_path(Path::new("model.glb")).is_none());
    }

    #[test]
    fn single_mesh_asset_shape() {
        let asset =
            LoadedAsset::single_mesh(corelib::geometry::box_mesh(1.0, 1.0, 1.0), Material::default());
        assert_eq!(asset.nodes.len(), 1);
        assert_eq!(asset.nodes[0].meshes, vec![0]);
        assert_eq!(asset.vertex_count(), 24);
        assert!(!asset.has_animations());
    }
}
