/// 2D canvas back end: projects triangles and paints them back to front
use nalgebra::{Matrix4, Point3};
use platonic_core::{Camera, Environment, Mesh, Renderer, Rgb, Shading, Side};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A projected triangle ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: [(f64, f64); 3],
    /// Mean normalized depth, larger is farther
    pub depth: f32,
    pub color: Rgb,
    pub wireframe: bool,
}

/// Project every visible triangle of `objects`, farthest first
pub fn collect_faces(
    environment: &Environment,
    objects: &[&Mesh],
    camera: &Camera,
    width: u32,
    height: u32,
) -> Vec<Face> {
    let mut faces = Vec::new();
    for object in objects {
        object.visit(&Matrix4::identity(), &mut |mesh, world| {
            let material = &mesh.material;
            for triangle in mesh.geometry.triangles() {
                let world_triangle = triangle.transformed(world);
                let normal = world_triangle.calculate_normal();
                if !normal.iter().all(|c| c.is_finite()) {
                    continue;
                }

                if !material.wireframe {
                    let centroid = Point3::from(
                        (world_triangle.vertices[0].coords
                            + world_triangle.vertices[1].coords
                            + world_triangle.vertices[2].coords)
                            / 3.0,
                    );
                    let facing = normal.dot(&(camera.position - centroid)) > 0.0;
                    let visible = match material.side {
                        Side::Front => facing,
                        Side::Back => !facing,
                        Side::Double => true,
                    };
                    if !visible {
                        continue;
                    }
                }

                let mut points = [(0.0, 0.0); 3];
                let mut depth = 0.0;
                let mut clipped = false;
                for (slot, vertex) in points.iter_mut().zip(&triangle.vertices) {
                    match camera.project_to_screen(vertex, world, width, height) {
                        Some((x, y, z)) => {
                            *slot = (x as f64, y as f64);
                            depth += z / 3.0;
                        }
                        None => clipped = true,
                    }
                }
                if clipped {
                    continue;
                }

                let brightness = match material.shading {
                    Shading::Basic => 1.0,
                    Shading::Phong => environment.irradiance(&normal),
                };
                faces.push(Face {
                    points,
                    depth,
                    color: material.color.scale(0.4 + 0.6 * brightness),
                    wireframe: material.wireframe,
                });
            }
        });
    }
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces
}

pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            context,
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn paint(&self, face: &Face) {
        let ctx = &self.context;
        let css = JsValue::from_str(&face.color.to_css());
        ctx.begin_path();
        ctx.move_to(face.points[0].0, face.points[0].1);
        ctx.line_to(face.points[1].0, face.points[1].1);
        ctx.line_to(face.points[2].0, face.points[2].1);
        ctx.close_path();
        if face.wireframe {
            ctx.set_stroke_style(&css);
            ctx.stroke();
        } else {
            ctx.set_fill_style(&css);
            ctx.fill();
        }
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, environment: &Environment, objects: &[&Mesh], camera: &Camera) {
        self.context
            .set_fill_style(&JsValue::from_str(&environment.background.to_css()));
        self.context
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);

        for face in collect_faces(environment, objects, camera, self.width, self.height) {
            self.paint(&face);
        }
    }
}
