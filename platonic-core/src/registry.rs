/// The table of solids shown in the scene
use serde::Deserialize;

use crate::color::Rgb;
use crate::geometry::Geometry;
use crate::primitives;
use crate::scene::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidKind {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl SolidKind {
    pub const ALL: [SolidKind; 5] = [
        SolidKind::Tetrahedron,
        SolidKind::Cube,
        SolidKind::Octahedron,
        SolidKind::Dodecahedron,
        SolidKind::Icosahedron,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SolidKind::Tetrahedron => "tetrahedron",
            SolidKind::Cube => "cube",
            SolidKind::Octahedron => "octahedron",
            SolidKind::Dodecahedron => "dodecahedron",
            SolidKind::Icosahedron => "icosahedron",
        }
    }

    /// Geometry for this kind. `size` is the circumradius, except for the
    /// cube where it is the edge length.
    pub fn geometry(self, size: f32) -> Geometry {
        match self {
            SolidKind::Tetrahedron => primitives::tetrahedron(size),
            SolidKind::Cube => primitives::cuboid(size, size, size),
            SolidKind::Octahedron => primitives::octahedron(size),
            SolidKind::Dodecahedron => primitives::dodecahedron(size),
            SolidKind::Icosahedron => primitives::icosahedron(size),
        }
    }
}

impl std::fmt::Display for SolidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One named entry of the registry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolidSpec {
    pub name: String,
    pub kind: SolidKind,
    pub size: f32,
    pub color: Rgb,
}

impl SolidSpec {
    pub fn new(name: impl Into<String>, kind: SolidKind, size: f32, color: Rgb) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            color,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.kind.geometry(self.size)
    }

    /// Shiny wireframe in the display color
    pub fn material(&self) -> Material {
        Material {
            specular: Rgb::WHITE,
            shininess: 100.0,
            wireframe: true,
            ..Material::phong(self.color)
        }
    }
}

/// The five solids in display order, left to right
pub fn default_registry() -> Vec<SolidSpec> {
    vec![
        SolidSpec::new("icosahedron", SolidKind::Icosahedron, 3.5, Rgb(0x0000ff)),
        SolidSpec::new("octahedron", SolidKind::Octahedron, 2.5, Rgb(0xffd700)),
        SolidSpec::new("tetrahedron", SolidKind::Tetrahedron, 1.5, Rgb(0xff0000)),
        SolidSpec::new("cube", SolidKind::Cube, 2.0, Rgb(0x8b4513)),
        SolidSpec::new("dodecahedron", SolidKind::Dodecahedron, 3.0, Rgb(0x9400d3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let registry = default_registry();
        let names: HashSet<_> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), registry.len());
        let kinds: HashSet<_> = registry.iter().map(|s| s.kind).collect();
        assert_eq!(kinds.len(), SolidKind::ALL.len());
    }

    #[test]
    fn test_geometry_is_deterministic() {
        for spec in default_registry() {
            assert_eq!(spec.geometry(), spec.geometry());
            assert_eq!(spec.material(), spec.material());
        }
    }

    #[test]
    fn test_material_uses_display_color() {
        let cube = &default_registry()[3];
        let material = cube.material();
        assert_eq!(material.color, Rgb(0x8b4513));
        assert!(material.wireframe);
        assert_eq!(material.shininess, 100.0);
    }
}
