/// One frame driver for the main view and every icon view
use tracing::trace;

use crate::projection::Camera;
use crate::scene::{Environment, Mesh};
use crate::session::SceneSession;

/// A back end that can draw a scene from a camera
pub trait Renderer {
    fn render(&mut self, environment: &Environment, objects: &[&Mesh], camera: &Camera);
}

/// Drives all views from a single per-frame callback.
///
/// Each tick updates the main camera, renders the main view, then renders
/// every icon in registry order. Icons are redrawn every tick whether or
/// not anything moved.
#[derive(Debug, Default)]
pub struct FrameDriver {
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render one frame. `icons[i]` draws `session.icons()[i]`; surplus
    /// views on either side are skipped.
    pub fn tick<R: Renderer>(&mut self, session: &mut SceneSession, main: &mut R, icons: &mut [R]) {
        session.update();
        main.render(session.environment(), &session.objects(), session.camera());

        for (renderer, icon) in icons.iter_mut().zip(session.icons()) {
            renderer.render(&icon.environment, &icon.objects(), &icon.camera);
        }

        self.frames += 1;
        trace!(frame = self.frames, "frame rendered");
    }
}
