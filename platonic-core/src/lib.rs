/// Platonic Core - Scene composition and interaction for the Platonic solids viewer
///
/// This library holds everything that does not depend on a display: the
/// solid registry, the scene graph and its ray caster, main-scene and icon
/// composition, orbit/drag controls, the hover tooltip and the frame driver
/// that back ends plug into through [`Renderer`].

pub mod color;
pub mod composer;
pub mod config;
pub mod controls;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod icon;
pub mod navigation;
pub mod primitives;
pub mod projection;
pub mod raycast;
pub mod registry;
pub mod scene;
pub mod session;
pub mod tooltip;

// Re-export commonly used types
pub use color::Rgb;
pub use composer::{MarkerStyle, PlacedSolid};
pub use config::{HoverPolicy, SceneConfig};
pub use controls::OrbitState;
pub use error::{ConfigError, LinkError};
pub use frame::{FrameDriver, Renderer};
pub use geometry::{Aabb, Geometry, Triangle};
pub use icon::IconView;
pub use navigation::SolidLink;
pub use projection::Camera;
pub use registry::{default_registry, SolidKind, SolidSpec};
pub use scene::{Environment, Light, Material, Mesh, Shading, Side};
pub use session::{PointerState, SceneSession};
pub use tooltip::Tooltip;
