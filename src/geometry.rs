use crate::masks::Color;
use serde::{Deserialize, Serialize};

/// Triangle soup with flat per-triangle colors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex3D>,
    pub triangles: Vec<Triangle>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Three indices into [`Mesh::vertices`] plus one flat color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32, color: Color) -> Self {
        Self {
            indices: [a, b, c],
            color,
        }
    }
}

impl Vertex3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, other: &Vertex3D) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(&self, other: &Vertex3D) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn cross(&self, other: &Vertex3D) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Linear interpolation towards `other` (`alpha = 0` is `self`)
    pub fn lerp(&self, other: &Vertex3D, alpha: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * alpha,
            y: self.y + (other.y - self.y) * alpha,
            z: self.z + (other.z - self.z) * alpha,
        }
    }

    pub fn normalize(&self) -> Normal3D {
        let length = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if length > 0.0001 {
            Normal3D {
                x: self.x / length,
                y: self.y / length,
                z: self.z / length,
            }
        } else {
            Normal3D {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            }
        }
    }
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of one triangle
    pub fn positions(&self, triangle: &Triangle) -> [Vertex3D; 3] {
        triangle.indices.map(|i| self.vertices[i as usize])
    }

    pub fn face_normal(&self, triangle: &Triangle) -> Normal3D {
        let [v0, v1, v2] = self.positions(triangle);
        let edge1 = v1.sub(&v0);
        let edge2 = v2.sub(&v0);
        edge1.cross(&edge2).normalize()
    }

    /// Smooth per-vertex normals: each vertex sums the faces touching it,
    /// weighted by face area
    pub fn vertex_normals(&self) -> Vec<Normal3D> {
        let mut normal_accumulators: Vec<(f32, f32, f32)> = vec![(0.0, 0.0, 0.0); self.vertices.len()];

        for triangle in &self.triangles {
            let [v0, v1, v2] = self.positions(triangle);
            // Unnormalized cross product, its length is twice the face area
            let face_normal = v1.sub(&v0).cross(&v2.sub(&v0));
            for &i in &triangle.indices {
                let acc = &mut normal_accumulators[i as usize];
                acc.0 += face_normal.x;
                acc.1 += face_normal.y;
                acc.2 += face_normal.z;
            }
        }

        normal_accumulators
            .iter()
            .map(|acc| Vertex3D::new(acc.0, acc.1, acc.2).normalize())
            .collect()
    }

    /// Per-corner positions, nine floats per triangle
    pub fn flat_positions(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| self.positions(t))
            .flat_map(|v| [v.x, v.y, v.z])
            .collect()
    }

    /// Per-corner colors, the triangle's color repeated for each corner
    pub fn flat_colors(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| {
                let c = t.color;
                [c.r, c.g, c.b, c.r, c.g, c.b, c.r, c.g, c.b]
            })
            .collect()
    }

    pub fn translate(&mut self, offset: &Vertex3D) {
        for vertex in &mut self.vertices {
            *vertex = vertex.add(offset);
        }
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vertex3D, Vertex3D)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = Vertex3D::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vertex3D::new(f32::MIN, f32::MIN, f32::MIN);

        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Some((min, max))
    }
}
