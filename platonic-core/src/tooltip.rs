/// Hover tooltip over vertex markers
use crate::composer::MarkerStyle;
use crate::config::HoverPolicy;
use crate::raycast::Intersection;

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    /// Pointer position in pixels when last shown
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl Tooltip {
    pub fn new() -> Self {
        Self {
            visible: false,
            x: 0.0,
            y: 0.0,
            text: String::new(),
        }
    }

    pub fn show(&mut self, x: f32, y: f32, text: &str) {
        self.visible = true;
        self.x = x;
        self.y = y;
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the hit that counts as a hovered marker, if any.
/// `hits` must be sorted nearest first.
pub fn hovered_marker(
    hits: &[Intersection<'_>],
    markers: &MarkerStyle,
    policy: HoverPolicy,
) -> Option<usize> {
    match policy {
        HoverPolicy::NearestHit => hits
            .first()
            .filter(|hit| markers.is_marker(hit.object))
            .map(|_| 0),
        HoverPolicy::FirstMarker => hits.iter().position(|hit| markers.is_marker(hit.object)),
    }
}
