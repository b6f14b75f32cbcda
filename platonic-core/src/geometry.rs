/// Buffer geometry and bounding boxes
use nalgebra::{Matrix4, Point3, Vector3};

/// A triangle face defined by three corner positions
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Calculate the face normal from the triangle's vertices.
    /// Counter-clockwise winding faces the viewer.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0];
        let v1 = self.vertices[1];
        let v2 = self.vertices[2];

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            vertices: self.vertices.map(|v| matrix.transform_point(&v)),
        }
    }
}

/// Flat vertex buffer (stride 3) with an optional index buffer.
///
/// Layout mirrors what WebGL scene graphs upload: a geometry without a
/// position attribute is legal and simply draws nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub position: Option<Vec<f32>>,
    pub index: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(position: Vec<f32>, index: Option<Vec<u32>>) -> Self {
        Self {
            position: Some(position),
            index,
        }
    }

    /// A geometry with no position attribute
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries in the position buffer divided by the stride
    pub fn vertex_count(&self) -> usize {
        self.position.as_ref().map_or(0, |p| p.len() / 3)
    }

    /// Iterate the raw vertex triplets in buffer order, duplicates included
    pub fn vertices(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.position
            .iter()
            .flat_map(|p| p.chunks_exact(3))
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }

    fn vertex(&self, i: usize) -> Option<Point3<f32>> {
        let p = self.position.as_ref()?;
        let base = i * 3;
        if base + 2 >= p.len() {
            return None;
        }
        Some(Point3::new(p[base], p[base + 1], p[base + 2]))
    }

    /// Triangles in local space, following the index buffer when present
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut out = Vec::new();
        match &self.index {
            Some(index) => {
                for face in index.chunks_exact(3) {
                    if let (Some(a), Some(b), Some(c)) = (
                        self.vertex(face[0] as usize),
                        self.vertex(face[1] as usize),
                        self.vertex(face[2] as usize),
                    ) {
                        out.push(Triangle::new(a, b, c));
                    }
                }
            }
            None => {
                let vertices: Vec<_> = self.vertices().collect();
                for face in vertices.chunks_exact(3) {
                    out.push(Triangle::new(face[0], face[1], face[2]));
                }
            }
        }
        out
    }

    /// Local-space bounding box, `None` without positions
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut aabb = Aabb::empty();
        for v in self.vertices() {
            aabb.expand_by_point(&v);
        }
        (!aabb.is_empty()).then_some(aabb)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_by_point(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }
}
