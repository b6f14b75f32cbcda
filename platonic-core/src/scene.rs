/// Scene graph: materials, meshes with children, lights
use nalgebra::{Matrix4, Vector3};
use std::rc::Rc;

use crate::color::Rgb;
use crate::geometry::{Aabb, Geometry};

/// Which faces take part in rendering and picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Unlit, flat color
    Basic,
    /// Lit by the environment's lights
    Phong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub specular: Rgb,
    pub shininess: f32,
    pub wireframe: bool,
    pub side: Side,
    pub shading: Shading,
}

impl Material {
    pub fn basic(color: Rgb) -> Self {
        Self {
            color,
            specular: Rgb::BLACK,
            shininess: 0.0,
            wireframe: false,
            side: Side::Front,
            shading: Shading::Basic,
        }
    }

    pub fn phong(color: Rgb) -> Self {
        Self {
            color,
            specular: Rgb(0x111111),
            shininess: 30.0,
            wireframe: false,
            side: Side::Front,
            shading: Shading::Phong,
        }
    }
}

/// A renderable node. Children inherit the parent's transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub position: Vector3<f32>,
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
    pub children: Vec<Mesh>,
}

impl Mesh {
    pub fn new(geometry: Rc<Geometry>, material: Rc<Material>) -> Self {
        Self {
            name: String::new(),
            position: Vector3::zeros(),
            geometry,
            material,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add(&mut self, child: Mesh) {
        self.children.push(child);
    }

    /// Nodes only carry a translation relative to their parent
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
    }

    /// Depth-first walk yielding every node with its world matrix
    pub fn visit<'a>(&'a self, parent: &Matrix4<f32>, f: &mut dyn FnMut(&'a Mesh, &Matrix4<f32>)) {
        let world = parent * self.local_matrix();
        f(self, &world);
        for child in &self.children {
            child.visit(&world, f);
        }
    }

    /// Copy with geometry and material duplicated instead of shared.
    /// Children are dropped.
    pub fn deep_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            position: self.position,
            geometry: Rc::new(Geometry::clone(&self.geometry)),
            material: Rc::new(Material::clone(&self.material)),
            children: Vec::new(),
        }
    }

    /// World-space box over this node and all descendants
    pub fn world_bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        self.visit(&Matrix4::identity(), &mut |mesh, world| {
            for v in mesh.geometry.vertices() {
                aabb.expand_by_point(&world.transform_point(&v));
            }
        });
        aabb
    }

    /// Toggle wireframe on this mesh's material only
    pub fn toggle_wireframe(&mut self) {
        let material = Rc::make_mut(&mut self.material);
        material.wireframe = !material.wireframe;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    /// Light travelling from `position` towards the origin
    Directional {
        color: Rgb,
        intensity: f32,
        position: Vector3<f32>,
    },
}

/// Everything in a scene that is not an object: background and lights
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub background: Rgb,
    pub lights: Vec<Light>,
}

impl Environment {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            lights: Vec::new(),
        }
    }

    /// Black backdrop, dim ambient fill and four frontal key lights
    pub fn studio() -> Self {
        let mut env = Self::new(Rgb::BLACK);
        env.lights.push(Light::Ambient {
            color: Rgb(0x404040),
            intensity: 1.0,
        });
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            env.lights.push(Light::Directional {
                color: Rgb::WHITE,
                intensity: 0.5,
                position: Vector3::new(x, y, 1.0),
            });
        }
        env
    }

    /// Diffuse factor for a world-space face normal, in `[0, 1]`.
    /// Without lights a surface is shown at full strength.
    pub fn irradiance(&self, normal: &Vector3<f32>) -> f32 {
        if self.lights.is_empty() {
            return 1.0;
        }
        let mut total = 0.0;
        for light in &self.lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let [r, g, b] = color.to_linear();
                    total += intensity * (r + g + b) / 3.0;
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } => {
                    let [r, g, b] = color.to_linear();
                    let dir = position.normalize();
                    total += intensity * (r + g + b) / 3.0 * normal.dot(&dir).max(0.0);
                }
            }
        }
        total.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;
    use nalgebra::Point3;

    fn cube() -> Mesh {
        Mesh::new(
            Rc::new(primitives::cuboid(2.0, 2.0, 2.0)),
            Rc::new(Material::phong(Rgb(0x8b4513))),
        )
    }

    #[test]
    fn test_children_follow_parent() {
        let mut parent = cube();
        parent.position = Vector3::new(-7.0, 0.0, 0.0);
        let mut child = cube();
        child.position = Vector3::new(1.0, 1.0, 1.0);
        parent.add(child);

        let mut origins = Vec::new();
        parent.visit(&Matrix4::identity(), &mut |_, world| {
            origins.push(world.transform_point(&Point3::origin()));
        });
        assert_eq!(origins[0], Point3::new(-7.0, 0.0, 0.0));
        assert_eq!(origins[1], Point3::new(-6.0, 1.0, 1.0));
    }

    #[test]
    fn test_local_matrix_only_translates() {
        let mut mesh = cube();
        mesh.position = Vector3::new(3.0, 2.0, 0.0);
        let local = mesh.local_matrix();
        assert_eq!(local, Matrix4::new_translation(&Vector3::new(3.0, 2.0, 0.0)));
        // Directions are unaffected
        assert_eq!(local.transform_vector(&Vector3::x()), Vector3::x());
    }

    #[test]
    fn test_world_bounding_box_includes_position() {
        let mut mesh = cube();
        mesh.position = Vector3::new(7.0, 0.0, 0.0);
        let aabb = mesh.world_bounding_box();
        assert_eq!(aabb.min, Point3::new(6.0, -1.0, -1.0));
        assert_eq!(aabb.max, Point3::new(8.0, 1.0, 1.0));
    }

    #[test]
    fn test_deep_clone_does_not_alias() {
        let original = cube();
        let mut copy = original.deep_clone();
        assert!(!Rc::ptr_eq(&original.geometry, &copy.geometry));
        copy.toggle_wireframe();
        assert!(copy.material.wireframe);
        assert!(!original.material.wireframe);
    }

    #[test]
    fn test_irradiance_facing_lights() {
        let env = Environment::studio();
        let front = env.irradiance(&Vector3::z());
        let back = env.irradiance(&-Vector3::z());
        assert!(front > back);
        assert!(back > 0.0);
        assert_eq!(Environment::new(Rgb::BLACK).irradiance(&Vector3::z()), 1.0);
    }
}
