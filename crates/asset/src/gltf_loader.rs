//! glTF 2.0 loader (`.gltf` with external or embedded buffers, `.glb`).

use std::path::Path;

use anyhow::{Context, Result, bail};
use corelib::animation::{AnimationClip, Channel, ChannelValues, Interpolation};
use corelib::geometry::{MeshData, MeshVertex};
use corelib::material::{Color, Material, Side};
use corelib::model::Pose;
use corelib::texture::TextureData;
use corelib::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::buffer::Data as BufferData;

use crate::loader::{AssetLoader, LoadedAsset, LoadedMesh, LoadedNode};
use crate::texture;

pub struct GltfLoader;

impl AssetLoader for GltfLoader {
    fn name(&self) -> &'static str {
        "glTF"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gltf", "glb"]
    }

    fn parse(&self, bytes: &[u8], base_dir: Option<&Path>) -> Result<LoadedAsset> {
        let gltf::Gltf { document, blob } =
            gltf::Gltf::from_slice(bytes).context("Failed to parse glTF document")?;
        let buffers = gltf::import_buffers(&document, base_dir, blob)
            .context("Failed to load glTF buffers")?;
        let textures = read_textures(&document, base_dir, &buffers);
        convert(&document, &buffers, textures)
    }
}

/// One texture per glTF image, in image order. An image that cannot be
/// read becomes plain white so material references stay valid.
fn read_textures(
    doc: &gltf::Document,
    base_dir: Option<&Path>,
    buffers: &[BufferData],
) -> Vec<TextureData> {
    if doc.images().len() == 0 {
        return Vec::new();
    }
    let images = match gltf::import_images(doc, base_dir, buffers) {
        Ok(images) => images,
        Err(e) => {
            log::warn!("glTF images unavailable, drawing untextured: {e}");
            return vec![TextureData::solid([255; 4]); doc.images().len()];
        }
    };
    images
        .into_iter()
        .enumerate()
        .map(|(i, image)| {
            texture::from_gltf(image).unwrap_or_else(|e| {
                log::warn!("glTF image {i} skipped: {e:#}");
                TextureData::solid([255; 4])
            })
        })
        .collect()
}

fn convert(
    doc: &gltf::Document,
    buffers: &[BufferData],
    textures: Vec<TextureData>,
) -> Result<LoadedAsset> {
    // One entry per glTF mesh: indices of its primitives in `meshes`.
    let mut meshes = Vec::new();
    let mut primitive_map: Vec<Vec<usize>> = Vec::with_capacity(doc.meshes().len());
    for mesh in doc.meshes() {
        let mut slots = Vec::new();
        for (p, primitive) in mesh.primitives().enumerate() {
            if !matches!(primitive.mode(), gltf::mesh::Mode::Triangles) {
                log::warn!(
                    "Skipping primitive {} of mesh {}: mode {:?} is not supported",
                    p,
                    mesh.index(),
                    primitive.mode()
                );
                continue;
            }
            let data = read_primitive(&primitive, buffers)
                .with_context(|| format!("mesh {} primitive {}", mesh.index(), p))?;
            let material = primitive.material();
            slots.push(meshes.len());
            meshes.push(LoadedMesh {
                data,
                material: convert_material(&material),
                base_color_texture: base_color_texture(&material, textures.len()),
            });
        }
        primitive_map.push(slots);
    }

    let scene = doc.default_scene().or_else(|| doc.scenes().next());
    let (nodes, part_of) = scene_parts(doc, scene.as_ref(), &primitive_map);

    let clips = doc
        .animations()
        .map(|anim| read_clip(&anim, buffers, &part_of))
        .collect::<Result<Vec<_>>>()?;

    let name = scene
        .and_then(|s| s.name().map(str::to_owned))
        .unwrap_or_default();

    log::debug!(
        "glTF: {} of {} nodes in scene, {} primitives, {} clips, {} textures",
        nodes.len(),
        doc.nodes().len(),
        meshes.len(),
        clips.len(),
        textures.len()
    );
    Ok(LoadedAsset {
        name,
        meshes,
        nodes,
        clips,
        textures,
    })
}

/// Flattens the scene's node trees, parents first. The second value maps
/// a glTF node index to its part index; nodes outside the scene map to
/// `None`. Without any scene, every node that is nobody's child is a root.
fn scene_parts(
    doc: &gltf::Document,
    scene: Option<&gltf::Scene<'_>>,
    primitive_map: &[Vec<usize>],
) -> (Vec<LoadedNode>, Vec<Option<usize>>) {
    let roots: Vec<gltf::Node<'_>> = match scene {
        Some(scene) => scene.nodes().collect(),
        None => {
            let mut is_child = vec![false; doc.nodes().len()];
            for child in doc.nodes().flat_map(|n| n.children()) {
                is_child[child.index()] = true;
            }
            doc.nodes().filter(|n| !is_child[n.index()]).collect()
        }
    };

    let mut part_of: Vec<Option<usize>> = vec![None; doc.nodes().len()];
    let mut nodes = Vec::new();
    let mut stack: Vec<(gltf::Node<'_>, Option<usize>)> =
        roots.into_iter().rev().map(|n| (n, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        if part_of[node.index()].is_some() {
            log::warn!("glTF node {} is reachable twice; keeping the first", node.index());
            continue;
        }
        let slot = nodes.len();
        part_of[node.index()] = Some(slot);

        let (t, r, s) = node.transform().decomposed();
        nodes.push(LoadedNode {
            name: node
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("node{}", node.index())),
            parent,
            pose: Pose {
                translation: Vec3::from(t),
                rotation: Quat::from_array(r).normalize(),
                scale: Vec3::from(s),
            },
            meshes: node
                .mesh()
                .and_then(|m| primitive_map.get(m.index()).cloned())
                .unwrap_or_default(),
        });
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|c| (c, Some(slot))));
    }
    (nodes, part_of)
}

fn read_primitive(primitive: &gltf::Primitive<'_>, buffers: &[BufferData]) -> Result<MeshData> {
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = match reader.read_positions() {
        Some(it) => it.collect(),
        None => bail!("primitive has no POSITION attribute"),
    };
    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
    let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|t| t.into_f32().collect());

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let n = normals.as_ref().and_then(|n| n.get(i).copied()).unwrap_or([0.0; 3]);
            let uv = uvs.as_ref().and_then(|t| t.get(i).copied()).unwrap_or([0.0; 2]);
            MeshVertex::new(p, n, uv)
        })
        .collect();
    let indices = match reader.read_indices() {
        Some(ix) => ix.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut mesh = MeshData::new(vertices, indices);
    if normals.is_none() {
        mesh.compute_vertex_normals();
    }
    mesh.validate()?;
    Ok(mesh)
}

fn convert_material(m: &gltf::Material<'_>) -> Material {
    let [r, g, b, a] = m.pbr_metallic_roughness().base_color_factor();
    let mut material = Material::phong(Color::rgb(r, g, b));
    if matches!(m.alpha_mode(), gltf::material::AlphaMode::Blend) {
        material = material.with_opacity(a);
    }
    if m.double_sided() {
        material.side = Side::Double;
    }
    material
}

fn base_color_texture(m: &gltf::Material<'_>, texture_count: usize) -> Option<usize> {
    let info = m.pbr_metallic_roughness().base_color_texture()?;
    if info.tex_coord() != 0 {
        log::warn!(
            "Base colour texture uses TEXCOORD_{}; sampling TEXCOORD_0 instead",
            info.tex_coord()
        );
    }
    let image = info.texture().source().index();
    (image < texture_count).then_some(image)
}

fn read_clip(
    anim: &gltf::Animation<'_>,
    buffers: &[BufferData],
    part_of: &[Option<usize>],
) -> Result<AnimationClip> {
    let name = anim
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("clip{}", anim.index()));

    let mut channels = Vec::new();
    for ch in anim.channels() {
        let node = ch.target().node().index();
        let Some(target) = part_of.get(node).copied().flatten() else {
            log::debug!("Animation '{}': node {} is not in the scene", name, node);
            continue;
        };
        let reader = ch.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            log::warn!("Animation '{}': channel without keyframe times", name);
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        let values = match reader.read_outputs() {
            Some(ReadOutputs::Translations(it)) => {
                ChannelValues::Translation(it.map(Vec3::from).collect())
            }
            Some(ReadOutputs::Rotations(it)) => {
                ChannelValues::Rotation(it.into_f32().map(Quat::from_array).collect())
            }
            Some(ReadOutputs::Scales(it)) => ChannelValues::Scale(it.map(Vec3::from).collect()),
            // Morph targets are not animated.
            Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
        };
        let interpolation = match ch.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };
        let channel = Channel::new(target, times, values, interpolation)
            .with_context(|| format!("animation '{name}'"))?;
        channels.push(channel);
    }
    Ok(AnimationClip::new(name, channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// One triangle (no normals) under a parent node, plus a two-key
    /// translation clip on the child. Node 0 is not part of the scene and
    /// has its own channel. The material samples a 2x1 PNG (opaque red,
    /// half-transparent blue). Buffer layout: 3 positions (36 bytes),
    /// 2 times (8 bytes), 2 translations (24 bytes).
    const ANIMATED_TRIANGLE: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "name": "hero", "nodes": [1] } ],
        "nodes": [
            { "name": "stray", "mesh": 0 },
            { "name": "root", "children": [2], "scale": [2.0, 2.0, 2.0] },
            { "name": "tri", "mesh": 0 }
        ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "material": 0 } ] } ],
        "materials": [ {
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 0.5, 0.0, 0.25],
                "baseColorTexture": { "index": 0 }
            },
            "alphaMode": "BLEND",
            "doubleSided": true
        } ],
        "textures": [ { "source": 0 } ],
        "images": [ {
            "uri": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAIAAAABCAYAAAD0In+KAAAADklEQVR4nGP4z8AAQg0AD3oDfnfpf5cAAAAASUVORK5CYII="
        } ],
        "animations": [ {
            "name": "wave",
            "channels": [
                { "sampler": 0, "target": { "node": 0, "path": "translation" } },
                { "sampler": 0, "target": { "node": 2, "path": "translation" } }
            ],
            "samplers": [ { "input": 1, "output": 2, "interpolation": "LINEAR" } ]
        } ],
        "buffers": [ {
            "byteLength": 68,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAAAAAAAAQAAAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ]
    }"#;

    #[test]
    fn parses_hierarchy_material_and_clip() {
        let asset = GltfLoader
            .parse(ANIMATED_TRIANGLE.as_bytes(), None)
            .expect("parse embedded glTF");

        assert_eq!(asset.name, "hero");
        assert_eq!(asset.nodes.len(), 2);
        assert_eq!(asset.nodes[0].name, "root");
        assert_eq!(asset.nodes[0].parent, None);
        assert_eq!(asset.nodes[1].name, "tri");
        assert_eq!(asset.nodes[1].parent, Some(0));
        assert_eq!(asset.nodes[1].meshes, vec![0]);
        assert_relative_eq!(asset.nodes[0].pose.scale.x, 2.0);

        let mesh = &asset.meshes[0];
        assert_eq!(mesh.data.indices, vec![0, 1, 2]);
        assert_eq!(mesh.data.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.material.side, Side::Double);
        assert!(mesh.material.transparent);
        assert_relative_eq!(mesh.material.opacity, 0.25);

        assert_eq!(asset.clips.len(), 1);
        let clip = &asset.clips[0];
        assert_eq!(clip.name, "wave");
        assert_relative_eq!(clip.duration, 1.0);
        // The channel on the stray node is dropped; "tri" is part 1.
        assert_eq!(clip.channels.len(), 1);
        assert_eq!(clip.channels[0].target(), 1);
        let mut pose = Pose::IDENTITY;
        clip.channels[0].apply(0.5, &mut pose);
        assert_relative_eq!(pose.translation.y, 1.0);
    }

    #[test]
    fn base_color_texture_is_decoded() {
        let asset = GltfLoader
            .parse(ANIMATED_TRIANGLE.as_bytes(), None)
            .expect("parse embedded glTF");

        assert_eq!(asset.textures.len(), 1);
        let tex = &asset.textures[0];
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(tex.pixel(1, 0), Some([0, 0, 255, 128]));

        let mesh = &asset.meshes[0];
        assert_eq!(mesh.base_color_texture, Some(0));
        // The scene handle is assigned on attach, not by the loader.
        assert_eq!(mesh.material.base_color_map, None);
    }

    #[test]
    fn nodes_without_a_scene_use_top_level_roots() {
        let doc = r#"{
            "asset": { "version": "2.0" },
            "nodes": [
                { "name": "leaf" },
                { "name": "top", "children": [0] },
                { "name": "other" }
            ]
        }"#;
        let asset = GltfLoader.parse(doc.as_bytes(), None).unwrap();
        let names: Vec<&str> = asset.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["top", "leaf", "other"]);
        assert_eq!(asset.nodes[1].parent, Some(0));
        assert_eq!(asset.nodes[2].parent, None);
        assert!(asset.textures.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(GltfLoader.parse(b"not a gltf", None).is_err());
    }
}
