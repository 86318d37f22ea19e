//! Scene graph: geometry store + nodes in insertion order.

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::geometry::MeshData;
use crate::light::Light;
use crate::material::{Color, Material};
use crate::model::Model;
use crate::texture::TextureData;
use crate::transform::Transform;
use crate::{Mat4, Vec3};

/// Node handle (dense index, never reused).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry handle; meshes sharing a handle share GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) u32);

impl GeometryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Texture handle, referenced from [`Material::base_color_map`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Primitive mesh with its own material.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub geometry: GeometryId,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Light(Light),
    Mesh(MeshNode),
    /// Loaded asset; a group, not a mesh.
    Model(Box<Model>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }
}

/// One mesh to draw this frame, already in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub world: Mat4,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Light with its world position resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightItem {
    pub position: Vec3,
    pub light: Light,
}

pub struct Scene {
    pub background: Color,
    geometries: Vec<MeshData>,
    textures: Vec<TextureData>,
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            geometries: Vec::new(),
            textures: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn add_geometry(&mut self, mesh: MeshData) -> GeometryId {
        let id = GeometryId(self.geometries.len() as u32);
        self.geometries.push(mesh);
        id
    }

    #[inline]
    pub fn geometry(&self, id: GeometryId) -> Option<&MeshData> {
        self.geometries.get(id.index())
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    #[inline]
    pub fn texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id.index())
    }

    /// Appends a node; it is visited after every node added before it.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn add_light(&mut self, name: &str, light: Light, transform: Transform) -> NodeId {
        self.add(Node {
            name: name.to_owned(),
            transform,
            kind: NodeKind::Light(light),
        })
    }

    pub fn add_mesh(
        &mut self,
        name: &str,
        geometry: GeometryId,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.add(Node {
            name: name.to_owned(),
            transform,
            kind: NodeKind::Mesh(MeshNode {
                geometry,
                material,
                cast_shadow: false,
                receive_shadow: false,
            }),
        })
    }

    /// Attaches a loaded hierarchy. Every geometry and texture it refers to
    /// must already be in this scene.
    pub fn add_model(&mut self, model: Model, transform: Transform) -> CoreResult<NodeId> {
        for mesh in model.meshes() {
            if self.geometry(mesh.geometry).is_none() {
                return Err(CoreError::UnknownGeometry(mesh.geometry.0));
            }
            if let Some(map) = mesh.material.base_color_map {
                if self.texture(map).is_none() {
                    return Err(CoreError::UnknownTexture(map.0));
                }
            }
        }
        Ok(self.add(Node {
            name: model.name.clone(),
            transform,
            kind: NodeKind::Model(Box::new(model)),
        }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    #[inline]
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).map(|n| &n.transform)
    }

    /// Mutable access to a transform (for animation).
    #[inline]
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn model(&self, id: NodeId) -> Option<&Model> {
        match &self.node(id)?.kind {
            NodeKind::Model(m) => Some(&**m),
            _ => None,
        }
    }

    pub fn model_mut(&mut self, id: NodeId) -> Option<&mut Model> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Model(m) => Some(&mut **m),
            _ => None,
        }
    }

    /// Nodes in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_mesh()).count()
    }

    pub fn light_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_light()).count()
    }

    /// Rotates every mesh node except `skip` by the given yaw/pitch increments.
    pub fn spin_meshes(&mut self, skip: Option<NodeId>, d_yaw: f32, d_pitch: f32) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if node.is_mesh() && skip != Some(NodeId(i as u32)) {
                node.transform.rotate(d_yaw, d_pitch);
            }
        }
    }

    pub fn lights(&self) -> impl Iterator<Item = LightItem> + '_ {
        self.nodes.iter().filter_map(|n| match n.kind {
            NodeKind::Light(light) => Some(LightItem {
                position: n.transform.translation,
                light,
            }),
            _ => None,
        })
    }

    /// Flattens meshes and model parts into world-space draw items.
    pub fn draw_items(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        for node in &self.nodes {
            match &node.kind {
                NodeKind::Mesh(m) => items.push(DrawItem {
                    geometry: m.geometry,
                    world: node.transform.matrix(),
                    material: m.material,
                    cast_shadow: m.cast_shadow,
                    receive_shadow: m.receive_shadow,
                }),
                NodeKind::Model(model) => {
                    let world = model.world_matrices(node.transform.matrix());
                    for (part, m) in model.parts.iter().zip(world) {
                        items.extend(part.meshes.iter().map(|pm| DrawItem {
                            geometry: pm.geometry,
                            world: m,
                            material: pm.material,
                            cast_shadow: pm.cast_shadow,
                            receive_shadow: pm.receive_shadow,
                        }));
                    }
                }
                NodeKind::Light(_) => {}
            }
        }
        items
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::box_mesh;
    use crate::model::{ModelPart, PartMesh, Pose};

    #[test]
    fn insertion_order_and_kinds() {
        let mut scene = Scene::default();
        let g = scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        let l = scene.add_light("sun", Light::ambient(Color::WHITE, 0.4), Transform::identity());
        let a = scene.add_mesh("a", g, Material::default(), Transform::identity());
        let b = scene.add_mesh("b", g, Material::default(), Transform::identity());
        let order: Vec<NodeId> = scene.children().map(|(id, _)| id).collect();
        assert_eq!(order, vec![l, a, b]);
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.lights().count(), 1);
    }

    #[test]
    fn spin_skips_requested_node() {
        let mut scene = Scene::default();
        let g = scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        let a = scene.add_mesh("a", g, Material::default(), Transform::identity());
        let b = scene.add_mesh("b", g, Material::default(), Transform::identity());
        scene.spin_meshes(Some(a), 0.01, 0.005);
        assert_eq!(scene.transform(a).unwrap().yaw(), 0.0);
        assert_eq!(scene.transform(b).unwrap().yaw(), 0.01);
        assert_eq!(scene.transform(b).unwrap().pitch(), 0.005);
    }

    #[test]
    fn model_parts_become_draw_items() {
        let mut scene = Scene::default();
        let g = scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        let model = Model {
            name: "asset".into(),
            parts: vec![ModelPart {
                name: "body".into(),
                parent: None,
                pose: Pose::IDENTITY,
                meshes: vec![PartMesh {
                    geometry: g,
                    material: Material::default(),
                    cast_shadow: true,
                    receive_shadow: true,
                }],
            }],
            clips: Vec::new(),
        };
        let mut t = Transform::identity();
        t.set_uniform_scale(0.01);
        let id = scene.add_model(model, t).unwrap();
        assert!(!scene.node(id).unwrap().is_mesh());
        assert!(scene.model(id).is_some());

        let items = scene.draw_items();
        assert_eq!(items.len(), 1);
        assert!(items[0].cast_shadow);
        assert!((items[0].world.x_axis.x - 0.01).abs() < 1e-6);
    }

    fn single_part(mesh: PartMesh) -> Model {
        Model {
            name: "asset".into(),
            parts: vec![ModelPart {
                name: "body".into(),
                parent: None,
                pose: Pose::IDENTITY,
                meshes: vec![mesh],
            }],
            clips: Vec::new(),
        }
    }

    #[test]
    fn model_with_dangling_references_is_rejected() {
        let mut scene = Scene::default();
        let g = scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        let mesh = PartMesh {
            geometry: GeometryId(7),
            material: Material::default(),
            cast_shadow: false,
            receive_shadow: false,
        };
        assert!(matches!(
            scene.add_model(single_part(mesh.clone()), Transform::identity()),
            Err(CoreError::UnknownGeometry(7))
        ));

        let mut textured = Material::default();
        textured.base_color_map = Some(TextureId(3));
        let mesh = PartMesh {
            geometry: g,
            material: textured,
            ..mesh
        };
        assert!(matches!(
            scene.add_model(single_part(mesh), Transform::identity()),
            Err(CoreError::UnknownTexture(3))
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn textured_model_keeps_its_map() {
        let mut scene = Scene::default();
        let g = scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        let tex = scene.add_texture(TextureData::solid([10, 20, 30, 255]));
        let mut material = Material::default();
        material.base_color_map = Some(tex);
        let mesh = PartMesh {
            geometry: g,
            material,
            cast_shadow: false,
            receive_shadow: false,
        };
        scene
            .add_model(single_part(mesh), Transform::identity())
            .unwrap();

        let items = scene.draw_items();
        assert_eq!(items[0].material.base_color_map, Some(tex));
        assert_eq!(scene.texture(tex).unwrap().pixel(0, 0), Some([10, 20, 30, 255]));
    }
}
