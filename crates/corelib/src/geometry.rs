//! CPU-side mesh representation and primitive builders.

use std::f32::consts::{PI, TAU};

use crate::Vec3;
use crate::error::{CoreError, CoreResult};

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the index list forms whole triangles inside the vertex range.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.is_valid() {
            return Err(CoreError::InvalidGeometry("empty vertex or index buffer".into()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(CoreError::InvalidGeometry(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let n = self.vertices.len() as u32;
        if let Some(bad) = self.indices.iter().find(|&&i| i >= n) {
            return Err(CoreError::InvalidGeometry(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        Ok(())
    }

    /// Replaces normals with area-weighted vertex normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.normal = n.try_normalize().unwrap_or(Vec3::Z).to_array();
        }
    }
}

/// Axis-aligned box centred on the origin, 4 vertices per face.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u x v = normal so faces wind CCW from outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in corners {
            let p = (normal + u * su + v * sv) * half;
            let uv = [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5];
            vertices.push(MeshVertex::new(p.to_array(), normal.to_array(), uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(vertices, indices)
}

/// UV sphere. Segment counts are clamped to the smallest sensible values.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let n = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(MeshVertex::new((n * radius).to_array(), n.to_array(), [u, 1.0 - v]));
        }
    }

    let row = ws + 1;
    let mut indices = Vec::new();
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    MeshData::new(vertices, indices)
}

/// Torus in the XY plane around the Z axis.
pub fn torus_mesh(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let rs = radial_segments.max(3);
    let ts = tubular_segments.max(3);

    let mut vertices = Vec::with_capacity(((rs + 1) * (ts + 1)) as usize);
    for j in 0..=rs {
        let v = j as f32 / rs as f32 * TAU;
        for i in 0..=ts {
            let u = i as f32 / ts as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let n = (p - center).normalize_or_zero();
            vertices.push(MeshVertex::new(
                p.to_array(),
                n.to_array(),
                [i as f32 / ts as f32, j as f32 / rs as f32],
            ));
        }
    }

    let row = ts + 1;
    let mut indices = Vec::with_capacity((rs * ts * 6) as usize);
    for j in 1..=rs {
        for i in 1..=ts {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    MeshData::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(data.validate().is_err());
    }

    #[test]
    fn box_has_outward_ccw_faces() {
        let mesh = box_mesh(2.0, 2.0, 2.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        mesh.validate().unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from(mesh.vertices[i as usize].position))
                .collect();
            let face_n = (p[1] - p[0]).cross(p[2] - p[0]).normalize();
            let vert_n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face_n.dot(vert_n) > 0.99);
            assert!(p.iter().all(|q| q.abs().max_element() <= 1.0 + 1e-6));
        }
    }

    #[test]
    fn sphere_and_torus_counts() {
        let sphere = sphere_mesh(0.5, 16, 16);
        assert_eq!(sphere.vertices.len(), 17 * 17);
        assert_eq!(sphere.triangle_count(), 16 * 30);
        sphere.validate().unwrap();
        assert!(sphere
            .vertices
            .iter()
            .all(|v| (Vec3::from(v.position).length() - 0.5).abs() < 1e-5));

        let torus = torus_mesh(0.3, 0.1, 8, 16);
        assert_eq!(torus.vertices.len(), 9 * 17);
        assert_eq!(torus.indices.len(), 8 * 16 * 6);
        torus.validate().unwrap();
    }

    #[test]
    fn computed_normals_follow_winding() {
        let mut tri = MeshData::new(
            vec![
                MeshVertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0; 2]),
            ],
            vec![0, 1, 2],
        );
        tri.compute_vertex_normals();
        assert!(tri.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
