/// Built-in geometries: the five Platonic solids and the marker sphere
///
/// Buffer layouts follow the usual WebGL scene-graph conventions so that
/// vertex counts match what a browser renderer would hold: polyhedra are
/// non-indexed (three vertices per face), the box and the sphere are indexed.
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

use crate::geometry::Geometry;

const PHI: f32 = 1.618_034; // (1 + sqrt 5) / 2

/// Project every corner of every face onto a sphere of `radius`
fn polyhedron(vertices: &[f32], faces: &[u32], radius: f32) -> Geometry {
    let mut position = Vec::with_capacity(faces.len() * 3);
    for &i in faces {
        let base = i as usize * 3;
        let v = Vector3::new(vertices[base], vertices[base + 1], vertices[base + 2]).normalize()
            * radius;
        position.extend_from_slice(&[v.x, v.y, v.z]);
    }
    Geometry::new(position, None)
}

pub fn tetrahedron(radius: f32) -> Geometry {
    #[rustfmt::skip]
    let vertices = [
        1.0, 1.0, 1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   1.0, -1.0, -1.0,
    ];
    #[rustfmt::skip]
    let faces = [
        2, 1, 0,   0, 3, 2,   1, 3, 0,   2, 3, 1,
    ];
    polyhedron(&vertices, &faces, radius)
}

pub fn octahedron(radius: f32) -> Geometry {
    #[rustfmt::skip]
    let vertices = [
        1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,   0.0, 1.0, 0.0,
        0.0, -1.0, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0, -1.0,
    ];
    #[rustfmt::skip]
    let faces = [
        0, 2, 4,   0, 4, 3,   0, 3, 5,   0, 5, 2,
        1, 2, 5,   1, 5, 3,   1, 3, 4,   1, 4, 2,
    ];
    polyhedron(&vertices, &faces, radius)
}

pub fn icosahedron(radius: f32) -> Geometry {
    let t = PHI;
    #[rustfmt::skip]
    let vertices = [
        -1.0, t, 0.0,   1.0, t, 0.0,   -1.0, -t, 0.0,   1.0, -t, 0.0,
        0.0, -1.0, t,   0.0, 1.0, t,   0.0, -1.0, -t,   0.0, 1.0, -t,
        t, 0.0, -1.0,   t, 0.0, 1.0,   -t, 0.0, -1.0,   -t, 0.0, 1.0,
    ];
    #[rustfmt::skip]
    let faces = [
        0, 11, 5,   0, 5, 1,   0, 1, 7,   0, 7, 10,   0, 10, 11,
        1, 5, 9,   5, 11, 4,   11, 10, 2,   10, 7, 6,   7, 1, 8,
        3, 9, 4,   3, 4, 2,   3, 2, 6,   3, 6, 8,   3, 8, 9,
        4, 9, 5,   2, 4, 11,   6, 2, 10,   8, 6, 7,   9, 8, 1,
    ];
    polyhedron(&vertices, &faces, radius)
}

pub fn dodecahedron(radius: f32) -> Geometry {
    let t = PHI;
    let r = 1.0 / PHI;
    #[rustfmt::skip]
    let vertices = [
        // (±1, ±1, ±1)
        -1.0, -1.0, -1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   -1.0, 1.0, 1.0,
        1.0, -1.0, -1.0,   1.0, -1.0, 1.0,   1.0, 1.0, -1.0,   1.0, 1.0, 1.0,
        // (0, ±1/φ, ±φ)
        0.0, -r, -t,   0.0, -r, t,   0.0, r, -t,   0.0, r, t,
        // (±1/φ, ±φ, 0)
        -r, -t, 0.0,   -r, t, 0.0,   r, -t, 0.0,   r, t, 0.0,
        // (±φ, 0, ±1/φ)
        -t, 0.0, -r,   t, 0.0, -r,   -t, 0.0, r,   t, 0.0, r,
    ];
    #[rustfmt::skip]
    let faces = [
        3, 11, 7,   3, 7, 15,   3, 15, 13,
        7, 19, 17,   7, 17, 6,   7, 6, 15,
        17, 4, 8,   17, 8, 10,   17, 10, 6,
        8, 0, 16,   8, 16, 2,   8, 2, 10,
        0, 12, 1,   0, 1, 18,   0, 18, 16,
        6, 10, 2,   6, 2, 13,   6, 13, 15,
        2, 16, 18,   2, 18, 3,   2, 3, 13,
        18, 1, 9,   18, 9, 11,   18, 11, 3,
        4, 14, 12,   4, 12, 0,   4, 0, 8,
        11, 9, 5,   11, 5, 19,   11, 19, 7,
        19, 5, 14,   19, 14, 4,   19, 4, 17,
        1, 12, 14,   1, 14, 5,   1, 5, 9,
    ];
    polyhedron(&vertices, &faces, radius)
}

/// Axis-aligned box centered at the origin: four vertices per face, indexed
pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let mut position = Vec::with_capacity(24 * 3);
    let mut index = Vec::with_capacity(36);

    // (u axis, v axis, w axis, u direction, v direction, extent along u, v, w)
    let planes = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),  // +x
        (2, 1, 0, 1.0, -1.0, depth, height, -width),  // -x
        (0, 2, 1, 1.0, 1.0, width, depth, height),    // +y
        (0, 2, 1, 1.0, -1.0, width, depth, -height),  // -y
        (0, 1, 2, 1.0, -1.0, width, height, depth),   // +z
        (0, 1, 2, -1.0, -1.0, width, height, -depth), // -z
    ];

    for (u, v, w, udir, vdir, plane_w, plane_h, plane_d) in planes {
        let base = (position.len() / 3) as u32;
        for iy in 0..2 {
            let y = iy as f32 * plane_h - plane_h / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * plane_w - plane_w / 2.0;
                let mut corner = [0.0f32; 3];
                corner[u] = x * udir;
                corner[v] = y * vdir;
                corner[w] = plane_d / 2.0;
                position.extend_from_slice(&corner);
            }
        }
        let (a, b, c, d) = (base, base + 2, base + 3, base + 1);
        index.extend_from_slice(&[a, b, d, b, c, d]);
    }

    Geometry::new(position, Some(index))
}

/// UV sphere, indexed, poles collapsed to degenerate-free fans
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut position = Vec::new();
    let mut grid = Vec::with_capacity(height_segments as usize + 1);
    let mut next = 0u32;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let p = Point3::new(
                -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            position.extend_from_slice(&[p.x, p.y, p.z]);
            row.push(next);
            next += 1;
        }
        grid.push(row);
    }

    let mut index = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                index.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                index.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Geometry::new(position, Some(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_outward(geometry: &Geometry) {
        for triangle in geometry.triangles() {
            let centroid = (triangle.vertices[0].coords
                + triangle.vertices[1].coords
                + triangle.vertices[2].coords)
                / 3.0;
            if centroid.norm() < 1e-4 {
                continue;
            }
            assert!(
                triangle.calculate_normal().dot(&centroid) > 0.0,
                "face at {centroid:?} winds inward"
            );
        }
    }

    #[test]
    fn test_polyhedron_vertex_counts() {
        assert_eq!(tetrahedron(1.5).vertex_count(), 12);
        assert_eq!(octahedron(2.5).vertex_count(), 24);
        assert_eq!(icosahedron(3.5).vertex_count(), 60);
        assert_eq!(dodecahedron(3.0).vertex_count(), 108);
        assert_eq!(cuboid(2.0, 2.0, 2.0).vertex_count(), 24);
    }

    #[test]
    fn test_polyhedra_lie_on_sphere() {
        for v in dodecahedron(3.0).vertices() {
            assert_relative_eq!(v.coords.norm(), 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        assert_outward(&tetrahedron(1.0));
        assert_outward(&octahedron(1.0));
        assert_outward(&icosahedron(1.0));
        assert_outward(&dodecahedron(1.0));
        assert_outward(&cuboid(2.0, 2.0, 2.0));
        assert_outward(&sphere(1.0, 16, 16));
    }

    #[test]
    fn test_cuboid_extent() {
        let size = cuboid(2.0, 4.0, 6.0).bounding_box().unwrap().size();
        assert_relative_eq!(size, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(cuboid(2.0, 2.0, 2.0).triangles().len(), 12);
    }

    #[test]
    fn test_sphere_layout() {
        let geometry = sphere(0.1, 16, 16);
        assert_eq!(geometry.vertex_count(), 17 * 17);
        // Pole rows contribute one triangle per segment, the rest two
        assert_eq!(geometry.triangles().len(), 16 * 2 * 16 - 2 * 16);
    }
}
