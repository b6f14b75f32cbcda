/// Ray casting against the scene graph
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Triangle;
use crate::scene::{Mesh, Side};

const EPSILON: f32 = 1e-8;

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to a triangle (Möller–Trumbore).
    ///
    /// With `cull_back` set, triangles whose counter-clockwise front faces
    /// away from the ray origin are skipped.
    pub fn intersect_triangle(&self, triangle: &Triangle, cull_back: bool) -> Option<f32> {
        let [v0, v1, v2] = triangle.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        if cull_back && self.direction.dot(&edge1.cross(&edge2)) > 0.0 {
            return None;
        }

        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > EPSILON).then_some(t)
    }

    /// Distance to the plane through `point` with `normal`
    pub fn intersect_plane(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> Option<f32> {
        let denom = normal.dot(&self.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// One ray/triangle hit
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub distance: f32,
    pub point: Point3<f32>,
    /// The mesh whose triangle was hit
    pub object: &'a Mesh,
    /// Index of the top-level object the hit mesh descends from
    pub root: usize,
}

/// Picks meshes along a ray
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Every hit on `objects` (and, if `recursive`, their descendants),
    /// nearest first. A mesh hit by several triangles appears once per
    /// triangle.
    pub fn intersect_objects<'a, I>(&self, objects: I, recursive: bool) -> Vec<Intersection<'a>>
    where
        I: IntoIterator<Item = &'a Mesh>,
    {
        let mut hits = Vec::new();
        for (root, object) in objects.into_iter().enumerate() {
            if recursive {
                object.visit(&Matrix4::identity(), &mut |mesh, world| {
                    self.intersect_mesh(mesh, world, root, &mut hits);
                });
            } else {
                self.intersect_mesh(object, &object.local_matrix(), root, &mut hits);
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn intersect_mesh<'a>(
        &self,
        mesh: &'a Mesh,
        world: &Matrix4<f32>,
        root: usize,
        hits: &mut Vec<Intersection<'a>>,
    ) {
        let side = mesh.material.side;
        for triangle in mesh.geometry.triangles() {
            let mut triangle = triangle.transformed(world);
            if side == Side::Back {
                triangle.vertices.swap(1, 2);
            }
            let Some(distance) = self.ray.intersect_triangle(&triangle, side != Side::Double)
            else {
                continue;
            };
            if distance < self.near || distance > self.far {
                continue;
            }
            hits.push(Intersection {
                distance,
                point: self.ray.at(distance),
                object: mesh,
                root,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::primitives;
    use crate::scene::Material;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn unit_cube(x: f32) -> Mesh {
        let mut mesh = Mesh::new(
            Rc::new(primitives::cuboid(2.0, 2.0, 2.0)),
            Rc::new(Material::phong(Rgb::WHITE)),
        );
        mesh.position = Vector3::new(x, 0.0, 0.0);
        mesh
    }

    fn down_z(x: f32) -> Raycaster {
        Raycaster::new(Ray::new(Point3::new(x, 0.25, 10.0), -Vector3::z()))
    }

    #[test]
    fn test_front_face_hit_only() {
        let cube = unit_cube(0.0);
        let hits = down_z(0.0).intersect_objects([&cube], false);
        // Back face of the far side is culled
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].distance, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn test_double_sided_sees_both_faces() {
        let mut cube = unit_cube(0.0);
        Rc::make_mut(&mut cube.material).side = Side::Double;
        let hits = down_z(0.0).intersect_objects([&cube], false);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_recursive_reaches_children_and_reports_root() {
        let mut parent = unit_cube(-7.0);
        let mut child = unit_cube(0.0);
        child.name = "child".into();
        child.position = Vector3::new(0.0, 0.0, 3.0);
        parent.add(child);
        let other = unit_cube(7.0);

        let objects = [&other, &parent];
        let hits = down_z(-7.0).intersect_objects(objects, true);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object.name, "child");
        assert_eq!(hits[0].root, 1);

        let flat = down_z(-7.0).intersect_objects(objects, false);
        assert_eq!(flat.len(), 1);
        assert_relative_eq!(flat[0].distance, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn test_miss() {
        let cube = unit_cube(0.0);
        assert!(down_z(5.0).intersect_objects([&cube], true).is_empty());
    }

    #[test]
    fn test_plane_intersection() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 12.0), Vector3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_plane(&Point3::origin(), &Vector3::z()).unwrap();
        assert_relative_eq!(t, 12.0);
        assert!(ray
            .intersect_plane(&Point3::new(0.0, 0.0, 20.0), &Vector3::z())
            .is_none());
    }
}
