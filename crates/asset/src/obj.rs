//! Wavefront OBJ reader: positions, normals and texture coordinates.
//! Materials (`mtllib`/`usemtl`) are ignored; the mesh gets a neutral Phong material.

use std::{
    collections::HashMap,
    io::{self, BufRead},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use corelib::geometry::{MeshData, MeshVertex};
use corelib::material::Material;

use crate::loader::{AssetLoader, LoadedAsset};

pub struct ObjLoader;

impl AssetLoader for ObjLoader {
    fn name(&self) -> &'static str {
        "OBJ"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn parse(&self, bytes: &[u8], _base_dir: Option<&Path>) -> Result<LoadedAsset> {
        let mesh = parse_obj(io::Cursor::new(bytes))?;
        Ok(LoadedAsset::single_mesh(mesh, Material::default()))
    }
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    parse_obj(io::Cursor::new(contents))
}

/// Accumulates OBJ attribute streams and welds face corners into unique vertices.
#[derive(Default)]
struct ObjBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    welded: HashMap<Corner, u32>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

/// Face corner as (position, texcoord, normal) indices, already 0-based.
type Corner = (usize, Option<usize>, Option<usize>);

impl ObjBuilder {
    fn corner_index(&mut self, corner: Corner, line_no: usize) -> Result<u32> {
        if let Some(&idx) = self.welded.get(&corner) {
            return Ok(idx);
        }
        let (vi, vti, vni) = corner;
        let position = self
            .positions
            .get(vi)
            .copied()
            .ok_or_else(|| anyhow!("Position index out of bounds on line {}", line_no + 1))?;
        let uv = vti.and_then(|i| self.texcoords.get(i).copied()).unwrap_or([0.0, 0.0]);
        let normal = vni.and_then(|i| self.normals.get(i).copied()).unwrap_or([0.0; 3]);

        let idx = u32::try_from(self.vertices.len())
            .map_err(|_| anyhow!("Too many vertices in OBJ (>{})", u32::MAX))?;
        self.vertices.push(MeshVertex::new(position, normal, uv));
        self.welded.insert(corner, idx);
        Ok(idx)
    }

    fn face<'a>(&mut self, tokens: impl Iterator<Item = &'a str>, line_no: usize) -> Result<()> {
        let mut polygon = Vec::new();
        for token in tokens {
            let corner = parse_face_vertex(
                token,
                self.positions.len(),
                self.texcoords.len(),
                self.normals.len(),
                line_no,
            )?;
            polygon.push(self.corner_index(corner, line_no)?);
        }
        // Fan triangulation; degenerate faces are dropped.
        for pair in polygon.windows(2).skip(1) {
            self.indices.extend_from_slice(&[polygon[0], pair[0], pair[1]]);
        }
        Ok(())
    }

    fn finish(self) -> Result<MeshData> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            anyhow::bail!("OBJ contained no triangles");
        }
        let has_normals = !self.normals.is_empty();
        let mut mesh = MeshData::new(self.vertices, self.indices);
        if !has_normals {
            mesh.compute_vertex_normals();
        }
        Ok(mesh)
    }
}

fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut obj = ObjBuilder::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_vec::<3>(&mut parts, line_no, "vertex position")?;
                obj.positions.push([x, y, z]);
            }
            "vt" => {
                let [u, v] = parse_vec::<2>(&mut parts, line_no, "texture coordinate")?;
                obj.texcoords.push([u, v]);
            }
            "vn" => {
                let n = parse_vec::<3>(&mut parts, line_no, "normal")?;
                obj.normals.push(n);
            }
            "f" => obj.face(parts, line_no)?,
            // Comments, groups, smoothing and material directives.
            _ => {}
        }
    }

    obj.finish()
}

fn parse_vec<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    what: &str,
) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for (axis, slot) in out.iter_mut().enumerate() {
        *slot = parse_f32(parts.next(), line_no, what)
            .with_context(|| format!("component {axis} of {what}"))?;
    }
    Ok(out)
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<Corner> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let pos_idx = resolve_index(pos, pos_count, line_no)?;

    let mut optional = |count: usize| -> Result<Option<usize>> {
        match split.next() {
            Some(value) if !value.is_empty() => Ok(Some(resolve_index(value, count, line_no)?)),
            _ => Ok(None),
        }
    };
    let tex_idx = optional(tex_count)?;
    let norm_idx = optional(norm_count)?;

    Ok((pos_idx, tex_idx, norm_idx))
}

/// OBJ indices are 1-based; negative values count back from the latest element.
fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    let idx = match raw {
        0 => anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    usize::try_from(idx)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| {
            anyhow!(
                "OBJ index {} resolved out of bounds (len={}) on line {}",
                raw,
                len,
                line_no + 1
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_are_fan_triangulated_with_negative_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf -4 -3 -2 -1\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_zero_index_and_empty_files() {
        assert!(load_obj_from_str("v 0 0 0\nf 0 0 0\n").is_err());
        assert!(load_obj_from_str("# only a comment\n").is_err());
    }

    #[test]
    fn loader_wraps_mesh_in_asset() {
        let bytes = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let asset = ObjLoader.parse(bytes, None).unwrap();
        assert_eq!(asset.meshes.len(), 1);
        assert_eq!(asset.meshes[0].data.indices.len(), 3);
        assert!(!asset.has_animations());
    }

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.is_valid());
    }
}
