/// Scene configuration with built-in defaults, loadable from JSON
use serde::Deserialize;
use std::collections::HashSet;

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::registry::{default_registry, SolidSpec};

/// Where solids go along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub start_x: f32,
    pub step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: -14.0,
            step: 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub color: Rgb,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            width_segments: 16,
            height_segments: 16,
            color: Rgb(0xffff00),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance of the main camera along +z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Side of the square icon viewport in pixels
    pub size: u32,
    /// Page that renders a single solid
    pub page: String,
    /// Query parameter carrying the solid name
    pub param: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            size: 100,
            page: "solido.html".to_string(),
            param: "nome".to_string(),
        }
    }
}

/// How the hover test treats non-marker hits in front of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoverPolicy {
    /// Only the nearest hit counts: a marker hidden behind a face is not hovered
    #[default]
    NearestHit,
    /// Scan past non-marker hits to the first marker along the ray
    FirstMarker,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub text: String,
    pub policy: HoverPolicy,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            text: "Inserir aqui".to_string(),
            policy: HoverPolicy::NearestHit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: LayoutConfig,
    pub markers: MarkerConfig,
    pub camera: CameraConfig,
    pub icons: IconConfig,
    pub tooltip: TooltipConfig,
    /// Overrides the built-in registry when present
    pub solids: Option<Vec<SolidSpec>>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            markers: MarkerConfig::default(),
            camera: CameraConfig::default(),
            icons: IconConfig::default(),
            tooltip: TooltipConfig::default(),
            solids: None,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("markers.radius", self.markers.radius),
            ("camera.fov", self.camera.fov),
            ("camera.near", self.camera.near),
            ("camera.far", self.camera.far),
            ("icons.size", self.icons.size as f32),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if let Some(solids) = &self.solids {
            if solids.is_empty() {
                return Err(ConfigError::EmptyRegistry);
            }
            let mut seen = HashSet::new();
            for spec in solids {
                if spec.size <= 0.0 {
                    return Err(ConfigError::NonPositive {
                        field: "solids.size",
                        value: spec.size,
                    });
                }
                if !seen.insert(spec.name.as_str()) {
                    return Err(ConfigError::DuplicateSolid(spec.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// The configured solids, or the built-in registry
    pub fn registry(&self) -> Vec<SolidSpec> {
        self.solids.clone().unwrap_or_else(default_registry)
    }
}
