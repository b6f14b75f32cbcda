/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use platonic_core::{Camera, Environment, Mesh, Renderer, Rgb, Shading, Side, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Wireframe edges never go darker than this ramp index
const MIN_EDGE_RAMP: usize = 3;

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    background: Rgb,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            background: Rgb::BLACK,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::WHITE; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, background: Rgb) {
        self.background = background;
        for i in 0..self.depth_buffer.len() {
            self.depth_buffer[i] = f32::INFINITY;
            self.char_buffer[i] = ' ';
            self.color_buffer[i] = Rgb::WHITE;
        }
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        environment: &Environment,
    ) {
        for triangle in mesh.geometry.triangles() {
            self.render_triangle(&triangle, mesh, model_matrix, camera, environment);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        environment: &Environment,
    ) {
        let material = &mesh.material;
        let world = triangle.transformed(model_matrix);
        let normal = world.calculate_normal();
        if !normal.iter().all(|c| c.is_finite()) {
            return;
        }

        // Project vertices to screen space
        let screen: Vec<Option<(f32, f32, f32)>> = triangle
            .vertices
            .iter()
            .map(|v| {
                camera.project_to_screen(v, model_matrix, self.width as u32, self.height as u32)
            })
            .collect();

        let brightness = match material.shading {
            Shading::Basic => 1.0,
            Shading::Phong => environment.irradiance(&normal),
        };
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let color = material.color.scale(0.4 + 0.6 * brightness);

        if material.wireframe {
            let character = LUMINOSITY_RAMP[char_index.max(MIN_EDGE_RAMP)];
            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                if let (Some(p0), Some(p1)) = (screen[a], screen[b]) {
                    self.rasterize_line(p0, p1, character, color);
                }
            }
            return;
        }

        let centroid = Point3::from(
            (world.vertices[0].coords + world.vertices[1].coords + world.vertices[2].coords) / 3.0,
        );
        let facing = normal.dot(&(camera.position - centroid)) > 0.0;
        let visible = match material.side {
            Side::Front => facing,
            Side::Back => !facing,
            Side::Double => true,
        };
        if !visible {
            return;
        }

        let coords: Option<Vec<(f32, f32, f32)>> = screen.into_iter().collect();
        let Some(coords) = coords else {
            return; // Triangle is clipped
        };

        // Rasterize triangle using scanline algorithm
        self.rasterize_triangle(&coords, LUMINOSITY_RAMP[char_index], color);
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    fn rasterize_line(&mut self, p0: (f32, f32, f32), p1: (f32, f32, f32), character: char, color: Rgb) {
        let dx = p1.0 - p0.0;
        let dy = p1.1 - p0.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = p0.0 + dx * t;
            let y = p0.1 + dy * t;
            // Edges win depth ties against the faces they bound
            let depth = p0.2 + (p1.2 - p0.2) * t - 1e-4;
            self.plot(x.floor() as i32, y.floor() as i32, depth, character, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32)], character: char, color: Rgb) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    /// Write the buffer with its top-left corner at terminal cell `(col, row)`
    pub fn draw<W: Write>(&self, writer: &mut W, col: u16, row: u16) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(col, row + y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(to_color(self.color_buffer[idx])))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn render(&mut self, environment: &Environment, objects: &[&Mesh], camera: &Camera) {
        self.clear(environment.background);
        for object in objects {
            object.visit(&Matrix4::identity(), &mut |mesh, world| {
                self.render_mesh(mesh, world, camera, environment);
            });
        }
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r(),
        g: rgb.g(),
        b: rgb.b(),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platonic_core::{primitives, Geometry, Material};
    use std::rc::Rc;

    fn camera() -> Camera {
        let mut camera = Camera::perspective(75.0, 40.0 / (20.0 * 2.0), 0.1, 1000.0);
        camera.position = Point3::new(0.0, 0.0, 6.0);
        camera.target = Point3::origin();
        camera
    }

    fn cube(wireframe: bool) -> Mesh {
        let mut material = Material::basic(Rgb(0x8b4513));
        material.wireframe = wireframe;
        Mesh::new(Rc::new(primitives::cuboid(2.0, 2.0, 2.0)), Rc::new(material))
    }

    #[test]
    fn test_solid_cube_fills_center() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let mesh = cube(false);
        renderer.render(&Environment::new(Rgb::BLACK), &[&mesh], &camera());
        assert_eq!(renderer.cell(20, 10), Some('@'));
        assert_eq!(renderer.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_wireframe_leaves_interior_empty() {
        let env = Environment::new(Rgb::BLACK);
        let triangle = Rc::new(Geometry::new(
            vec![-2.0, -2.0, 0.0, 2.0, -2.0, 0.0, 0.0, 2.0, 0.0],
            None,
        ));
        let render = |wireframe: bool| {
            let mut material = Material::basic(Rgb::WHITE);
            material.wireframe = wireframe;
            let mesh = Mesh::new(Rc::clone(&triangle), Rc::new(material));
            let mut renderer = AsciiRenderer::new(40, 20);
            renderer.render(&env, &[&mesh], &camera());
            renderer
        };

        let filled = render(false);
        let outline = render(true);
        // Cell under the centroid
        assert_eq!(filled.cell(20, 11), Some('@'));
        assert_eq!(outline.cell(20, 11), Some(' '));
        assert!(outline.char_buffer.iter().any(|&c| c != ' '));
    }

    #[test]
    fn test_background_follows_environment() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.render(&Environment::new(Rgb(0x0000ff)), &[], &camera());
        assert_eq!(renderer.background, Rgb(0x0000ff));
        let mut out = Vec::new();
        renderer.draw(&mut out, 0, 0).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
